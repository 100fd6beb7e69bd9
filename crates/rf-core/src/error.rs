//! # Errors
//!
//! `StoreError` is what the persistence ports return; `AppError` is the
//! unexpected-failure channel of every service operation. Expected failures
//! (not found, conflict, bad input) are not errors here, they are variants of
//! [`crate::outcome::Outcome`].

use thiserror::Error;

/// Failure reported by a store port.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The query matched no row.
    #[error("not found in the database")]
    NotFound,

    /// A unique constraint rejected the write. Callers that pre-check for
    /// duplicates see this when a concurrent writer won the race.
    #[error("duplicate key")]
    Duplicate,

    /// Infrastructure failure (e.g., DB down, constraint violation)
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Turns a `NotFound` into `None` so callers can branch on absence.
pub trait OptionalExt<T> {
    fn optional(self) -> StoreResult<Option<T>>;
}

impl<T> OptionalExt<T> for StoreResult<T> {
    fn optional(self) -> StoreResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Turns a `Duplicate` into `None` so a lost insert race can be reported as
/// a conflict.
pub trait DuplicateExt<T> {
    fn unless_duplicate(self) -> StoreResult<Option<T>>;
}

impl<T> DuplicateExt<T> for StoreResult<T> {
    fn unless_duplicate(self) -> StoreResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::Duplicate) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// The primary error type for all rf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// The store failed in a way this layer cannot recover from.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// A specialized Result type for Rusty-Forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
