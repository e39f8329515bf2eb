//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the HTTP-facing error type returned by every handler.
//! Domain errors (`AuthError`, `StoreError`) are converted into it with `From`, so
//! handlers can use the `?` operator throughout.
//!
//! Client errors carry a human-readable message. Server-side failures are logged with
//! full detail and rendered to the client as an opaque 500, so internal error text
//! never leaves the process.

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Body sent for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Represents all possible errors that can surface from a request handler.
///
/// Each variant maps to exactly one HTTP status code.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    /// The message must never reveal which part of a credential was wrong.
    Unauthorized(String),
    /// Malformed or rejected request (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist for this user (HTTP 404).
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the backing store (HTTP 500).
    DatabaseError(String),
    /// Request body failed schema validation (HTTP 422 Unprocessable Entity).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "error": msg })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": INTERNAL_ERROR_MESSAGE
                }))
            }
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
        }
    }
}

/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::BadRequest(error.to_string()),
            StoreError::Unavailable(_) | StoreError::Backend(_) => {
                AppError::DatabaseError(error.to_string())
            }
        }
    }
}

/// Token failures of any kind collapse into one 401 so callers cannot tell an
/// expired token from a forged one or from a deleted account.
impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::WeakPassword(_) | AuthError::DuplicateEmail => {
                AppError::BadRequest(error.to_string())
            }
            AuthError::InvalidCredentials => AppError::Unauthorized(error.to_string()),
            AuthError::InvalidToken | AuthError::UnknownSubject => {
                log::debug!("rejecting bearer token: {:?}", error);
                AppError::Unauthorized(AuthError::InvalidToken.to_string())
            }
            AuthError::Store(store_error) => store_error.into(),
            AuthError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}
