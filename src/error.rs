//!
//! # Custom Error Handling
//!
//! Defines `AppError`, the single error type threaded through the service
//! layer, stores, and route handlers. Each variant maps to a fixed HTTP
//! status through `actix_web::error::ResponseError`, and the JSON bodies
//! keep the `{"status": "error", "message": ...}` shape the clients of this
//! API already expect.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` let handlers and
//! services bubble failures up with `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use validator::ValidationErrors;

/// All failure modes the service layer can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Per-field validation failures (HTTP 400). Keys are field names.
    Validation(HashMap<String, String>),
    /// Registration with a username that is already taken (HTTP 400).
    DuplicateUsername,
    /// Registration with an email that is already in use (HTTP 400).
    DuplicateEmail,
    /// Login failure. Unknown user, wrong password, and disabled accounts
    /// all surface as this one variant (HTTP 400).
    InvalidCredentials,
    /// Malformed request data outside DTO validation, e.g. an unknown
    /// status string in a path segment (HTTP 400).
    BadRequest(String),
    /// No credentials were presented where some are required (HTTP 401).
    Unauthenticated,
    /// A token was presented but failed verification for any reason:
    /// bad signature, malformed, expired, unsupported algorithm (HTTP 401).
    InvalidToken,
    /// The caller is authenticated but does not own the resource (HTTP 403).
    AccessDenied,
    /// The requested record does not exist (HTTP 404).
    NotFound(String),
    /// Errors from the backing store (HTTP 500, message not exposed).
    Database(String),
    /// Any other unexpected failure (HTTP 500, message not exposed).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(errors) => write!(f, "Validation failed: {:?}", errors),
            AppError::DuplicateUsername => write!(f, "Username is already taken"),
            AppError::DuplicateEmail => write!(f, "Email is already in use"),
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthenticated => write!(f, "Authentication required"),
            AppError::InvalidToken => write!(f, "Invalid or expired token"),
            AppError::AccessDenied => {
                write!(f, "You do not have permission to access this task")
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateUsername
            | AppError::DuplicateEmail
            | AppError::InvalidCredentials
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(errors) => HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": "Validation failed",
                "errors": errors,
            })),
            AppError::DuplicateUsername => HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": "Username is already taken",
            })),
            AppError::DuplicateEmail => HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": "Email is already in use",
            })),
            AppError::InvalidCredentials => HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": "Invalid username or password",
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": msg,
            })),
            AppError::Unauthenticated => HttpResponse::Unauthorized().json(json!({
                "status": "error",
                "message": "Authentication required",
            })),
            AppError::InvalidToken => HttpResponse::Unauthorized().json(json!({
                "status": "error",
                "message": "Invalid or expired token",
            })),
            AppError::AccessDenied => HttpResponse::Forbidden().json(json!({
                "status": "error",
                "message": "You do not have permission to access this task",
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": msg,
            })),
            // Store and internal errors are never leaked to the client.
            AppError::Database(_) | AppError::Internal(_) => {
                HttpResponse::InternalServerError().json(json!({
                    "status": "error",
                    "message": "An unexpected error occurred",
                }))
            }
        }
    }
}

/// `sqlx::Error::RowNotFound` becomes `NotFound`; everything else is a
/// generic store failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Flattens `validator::ValidationErrors` into one message per field.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let map = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
            .collect();
        AppError::Validation(map)
    }
}

/// Every JWT processing failure collapses to the single invalid-token
/// outcome; callers never see the decomposed cause.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidToken
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}
