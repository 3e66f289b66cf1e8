//! HTTP request handlers

pub mod file;
pub mod service;

pub use file::*;
pub use service::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success body: `{"message": "success", "data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

/// Wrap `data` in the success envelope
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = Envelope {
        message: "success".to_string(),
        data,
    };
    (status, Json(body)).into_response()
}
