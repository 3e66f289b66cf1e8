//! API error type and its JSON rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seacloud_filer::FilerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Filer(#[from] FilerError),
}

/// Error body: `{"message": <status text>, "info": <error>}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub info: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Filer(e) => match e {
                FilerError::NotFound(_) => StatusCode::NOT_FOUND,
                FilerError::IsDirectory(_) | FilerError::Decode(_) => StatusCode::BAD_REQUEST,
                FilerError::Transport(_)
                | FilerError::RemoteService { .. }
                | FilerError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
                FilerError::Io(_) | FilerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            message: status.canonical_reason().unwrap_or("Error").to_string(),
            info: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
