use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

/// Every failure a handler can report. Each variant renders as
/// `{"error": <message>}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    /// Valid credentials that do not own the resource. Reported as 401.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// Duplicate value for a unique field. Reported as 400.
    #[error("{0}")]
    Conflict(String),
    #[error("Internal Error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::InternalError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::InternalError(err) = self {
            error!(error = ?err, "request failed");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.message() }))
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::InternalError(anyhow::anyhow!("blocking task failed: {}", err))
    }
}
