//! Error handling - every failure leaves the server as a response envelope.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};

use mealhub_core::error::{DomainError, RepoError};
use mealhub_core::ports::AuthError;
use mealhub_shared::{ErrorResponse, ErrorSource};

/// Application-level error type rendered as an error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation Error")]
    Validation(Vec<ErrorSource>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(sources) => {
                ErrorResponse::bad_request(self.to_string()).with_sources(sources.clone())
            }
            AppError::NotFound(message) => ErrorResponse::not_found(message).with_detail(message),
            AppError::BadRequest(message) => {
                ErrorResponse::bad_request(message).with_detail(message)
            }
            AppError::Unauthorized(message) => {
                ErrorResponse::unauthorized(message).with_detail(message)
            }
            AppError::Forbidden(message) => ErrorResponse::forbidden(message).with_detail(message),
            AppError::Conflict(message) => ErrorResponse::conflict(message).with_detail(message),
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
            DomainError::InvalidId { entity_type, .. } => AppError::BadRequest(format!(
                "Invalid {} ID format",
                entity_type.to_lowercase()
            )),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized(msg) => AppError::Unauthorized(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Repository(e) => e.into(),
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
            AuthError::TokenExpired => {
                AppError::Unauthorized("Token expired. Please login again".to_string())
            }
            AuthError::InvalidToken(reason) => {
                tracing::debug!(%reason, "Rejected token");
                AppError::Unauthorized("Invalid token".to_string())
            }
            AuthError::MissingAuth => AppError::Unauthorized("You are not authorized".to_string()),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<Vec<ErrorSource>> for AppError {
    fn from(sources: Vec<ErrorSource>) -> Self {
        AppError::Validation(sources)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Malformed JSON bodies.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {err}")).into()
}

/// Malformed query strings.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {err}")).into()
}

/// Malformed path segments.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path parameter: {err}")).into()
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!(
        "API not found: {} {}",
        req.method(),
        req.path()
    )))
}
