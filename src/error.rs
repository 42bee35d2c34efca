use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use crate::models::ErrorResponse;
use tracing::error;

#[derive(Debug, Display)]
pub enum ApiError {
    /// Referenced entity is absent
    #[display(fmt = "{}", _0)]
    NotFound(String),

    /// Uniqueness violation or a value outside an enumeration
    #[display(fmt = "{}", _0)]
    Conflict(String),

    /// Payload failed field validation
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Storage or runtime failure. The inner text is logged, never sent.
    #[display(fmt = "Internal Server Error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(cause) = self {
            error!(error = %cause, "Request failed");
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}
