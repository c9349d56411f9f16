//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use thiserror::Error;

use circle_core::error::{DomainError, RepoError};
use circle_core::ports::{AuthError, MediaError};
use circle_shared::{ErrorResponse, FieldError};

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not the owner.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Duplicate unique field.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Conflict(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::Conflict(detail) => ErrorResponse::new(400, "Conflict").with_detail(detail),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            e @ DomainError::Unauthorized => AppError::Forbidden(e.to_string()),
            e @ (DomainError::AlreadyLiked | DomainError::NotLiked) => {
                AppError::BadRequest(e.to_string())
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Repo(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::BadRequest(err.to_string()),
            AuthError::MissingAuth | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Io(msg) => AppError::Internal(format!("Media storage: {msg}")),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Malformed or undeserializable JSON bodies become 400s in the usual shape.
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected JSON body");
    AppError::BadRequest(err.to_string()).into()
}

/// Unparseable ids in the path cannot name an existing document.
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected path parameter");
    AppError::NotFound("Resource not found".to_string()).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
