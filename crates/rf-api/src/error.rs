//! Transport-side errors and the status table.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rf_core::error::AppError;
use rf_core::outcome::{ErrorKind, Message};
use thiserror::Error;

/// The only place an `ErrorKind` turns into a status code.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ValidationFailure => StatusCode::BAD_REQUEST,
        ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    /// The request outlived its deadline and its work was dropped.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// Malformed body, query string or path segment.
    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::App(err) => status_for(err.kind()),
            ApiError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            ApiError::BadRequest(_) => status_for(ErrorKind::ValidationFailure),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::App(err) => {
                log::error!("request failed: {err}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(Message::new(message))
    }
}
