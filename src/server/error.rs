use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::foundation::error::CountdownError;

/// Error body returned by every route: `{ "error_code", "message" }`.
#[derive(Debug)]
pub struct ApiError {
    pub error_code: &'static str,
    pub message: String,
    pub http_status_code: StatusCode,
}

impl ApiError {
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self {
            error_code: "MALFORMED_REQUEST",
            message: message.into(),
            http_status_code: StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error_code: "NOT_FOUND",
            message: message.into(),
            http_status_code: StatusCode::NOT_FOUND,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error_code: "INTERNAL_ERROR",
            message: message.into(),
            http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CountdownError> for ApiError {
    fn from(err: CountdownError) -> Self {
        let (error_code, http_status_code) = match &err {
            CountdownError::Validation(_) => ("VALIDATION_ERROR", StatusCode::BAD_REQUEST),
            CountdownError::Filesystem { .. } => ("FILESYSTEM_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
            CountdownError::Font(_) => ("FONT_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
            CountdownError::Encode(_) => ("ENCODE_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
            CountdownError::Other(_) => ("INTERNAL_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
        };
        let message = match &err {
            CountdownError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self {
            error_code,
            message,
            http_status_code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.http_status_code.is_server_error() {
            tracing::error!(error_code = self.error_code, message = %self.message, "request failed");
        } else {
            tracing::debug!(error_code = self.error_code, message = %self.message, "request rejected");
        }
        let body = json!({
            "error_code": self.error_code,
            "message": self.message,
        });
        (self.http_status_code, Json(body)).into_response()
    }
}
