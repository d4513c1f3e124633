use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::response::ApiResponse;

/// Every failure a handler can produce. All of them render as an envelope
/// with `success: false`; nothing escapes as a bare actix error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A lookup by id missed.
    #[error("{0}")]
    NotFound(String),

    /// Wrong credentials or an invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// No route matched the request.
    #[error("No mock endpoint for this request")]
    Unhandled,

    #[error("{0}")]
    BadRequest(String),

    /// Request body over the limit for its endpoint, in bytes.
    #[error("Payload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    /// A body that could not be read into the target record.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Operation failed")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::Unhandled => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Internal(detail) = self {
            error!("Internal error: {}", detail);
        }
        let status = self.status_code();
        HttpResponse::build(status).json(ApiResponse::<()>::failure(self.to_string(), status))
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token encoding failed: {}", err))
    }
}
