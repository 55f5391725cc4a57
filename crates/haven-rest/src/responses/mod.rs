//! API response envelope and error conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use haven_core::{ErrorResponse, HavenError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard API response wrapper.
///
/// Successful calls carry `data`; failed calls carry `error` with a stable
/// machine code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(error: ErrorResponse) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Handler error; renders a [`HavenError`] as the failure envelope.
#[derive(Debug)]
pub struct AppError(pub HavenError);

impl From<HavenError> for AppError {
    fn from(err: HavenError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        }

        failure(status, ErrorResponse::from_error(&self.0))
    }
}

/// Renders an error body with the given status.
pub fn failure(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(ApiResponse::failure(body))).into_response()
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// 201 Created with the envelope.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = AppError(HavenError::not_found("Property", "p1")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body.get("data").is_none());
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_unavailable_maps_to_503() {
        let response = AppError(HavenError::unavailable("store down")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_of(response).await["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_success_envelope_omits_error() {
        let value = serde_json::to_value(ApiResponse::success(3)).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "data": 3}));
    }
}
