//!
//! # Error Handling
//!
//! This module defines `AppError`, the single error type carried from the
//! persistence layer, through the services, up to the HTTP handlers.
//!
//! The two failure kinds a lookup or mutation can produce are kept apart:
//! a missing row is `NotFound` (404) and anything that went wrong while talking
//! to storage is `PersistenceFailure` (500). The mapping is the same on every
//! route, and no other status codes are produced.

use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::{Method, StatusCode},
    HttpRequest, HttpResponse,
};
use serde_json::json;
use std::fmt;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A lookup by id or name matched no row (HTTP 404).
    NotFound(String),
    /// Connectivity problems, constraint violations and any other storage
    /// error (HTTP 500).
    PersistenceFailure(String),
}

impl AppError {
    /// Builds the `NotFound` error for an entity looked up by id.
    pub fn missing_id(label: &str, id: impl fmt::Display) -> Self {
        AppError::NotFound(format!("{} with id {} not found", label, id))
    }

    /// Builds the `NotFound` error for an entity looked up by name.
    pub fn missing_name(label: &str, name: &str) -> Self {
        AppError::NotFound(format!("{} named '{}' not found", label, name))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::PersistenceFailure(msg) => write!(f, "Persistence Failure: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Failures are logged here, at the only place they are translated into a
/// status code.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let msg = match self {
            AppError::NotFound(msg) | AppError::PersistenceFailure(msg) => msg,
        };

        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        HttpResponse::build(status).json(json!({
            "error": msg
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` becomes `AppError::NotFound`; every other
/// database error is a `PersistenceFailure`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::PersistenceFailure(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::PersistenceFailure(format!("migration failed: {}", error))
    }
}

/// Error handler installed on `web::JsonConfig`.
///
/// A create body that cannot be decoded is missing columns the table requires,
/// so it fails like a rejected insert. Update and delete bodies identify a row
/// by `id`; without a usable id there is no row to find.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    body_error(req.method(), err).into()
}

fn body_error(method: &Method, err: JsonPayloadError) -> AppError {
    if method == Method::POST {
        AppError::PersistenceFailure(format!("cannot store request body: {}", err))
    } else {
        AppError::NotFound(format!("request body does not identify a record: {}", err))
    }
}
