//! API error type and its JSON response.

use crate::deck::DeckError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    UnknownTemplate(String),

    #[error("{0}")]
    TemplateNotFound(String),

    #[error("{0}")]
    Generation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownTemplate(_) => StatusCode::BAD_REQUEST,
            ApiError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Generation(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::UnknownTemplate(_) => "UNKNOWN_TEMPLATE",
            ApiError::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            ApiError::Generation(_) => "GENERATION_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::UnknownTemplate(_) => ApiError::UnknownTemplate(err.to_string()),
            DeckError::TemplateFileMissing(_) => ApiError::TemplateNotFound(err.to_string()),
            other => ApiError::Generation(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(error = %self, code = self.error_code(), "Server error occurred");
        } else {
            warn!(error = %self, code = self.error_code(), "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };

        (self.status_code(), Json(body)).into_response()
    }
}
