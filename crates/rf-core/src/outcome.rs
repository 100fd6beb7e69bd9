//! # Outcome
//!
//! Every service operation returns `Result<Outcome<T, C>, AppError>`.
//! The transport matches on the variant to pick a status line; the core
//! never deals in status codes.

use serde::Serialize;

use crate::error::AppError;

/// Error taxonomy shared by the core and the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    ValidationFailure,
    Unexpected,
}

/// Human-readable error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Result of a service operation that completed without an unexpected failure.
///
/// `C` is the payload attached to a conflict: the clashing entity for create
/// operations, a [`Message`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, C = Message> {
    Ok(T),
    Created(T),
    NotFound(Message),
    Conflict(C),
    Invalid(Message),
}

impl<T, C> Outcome<T, C> {
    pub fn not_found(message: impl Into<String>) -> Self {
        Outcome::NotFound(Message::new(message))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Outcome::Invalid(Message::new(message))
    }

    /// `None` for the success variants.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Ok(_) | Outcome::Created(_) => None,
            Outcome::NotFound(_) => Some(ErrorKind::NotFound),
            Outcome::Conflict(_) => Some(ErrorKind::Conflict),
            Outcome::Invalid(_) => Some(ErrorKind::ValidationFailure),
        }
    }

    /// The success payload, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Ok(value) | Outcome::Created(value) => Some(value),
            _ => None,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unexpected
    }
}

/// What every service method returns.
pub type Reply<T, C = Message> = Result<Outcome<T, C>, AppError>;
