//! Maps request errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::{ErrorCode, FxError};

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::Validation => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FxError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
            }
        });
        (code.status(), Json(body)).into_response()
    }
}
