//! Response envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{statusCode, message, data}` where `statusCode` doubles
/// as the HTTP status and `message` is always `"success"`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: 200,
            message: "success".to_string(),
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status_code: 201,
            message: "success".to_string(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// `data: {}` for endpoints with nothing to return
pub fn empty() -> serde_json::Value {
    serde_json::json!({})
}
