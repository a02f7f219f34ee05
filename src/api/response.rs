use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that adds the uniform success envelope:
/// `{statusCode, data, message, success: true}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status_code: StatusCode,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with 200 status
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    /// Create a 201 Created response
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    pub fn with_status(status_code: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self { status_code, data, message: message.into() }
    }

    /// Envelope body as a JSON value
    pub fn envelope(&self) -> Result<Value, serde_json::Error> {
        let data_value = serde_json::to_value(&self.data)?;
        Ok(json!({
            "statusCode": self.status_code.as_u16(),
            "data": data_value,
            "message": self.message,
            "success": true,
        }))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.envelope() {
            Ok(body) => (self.status_code, Json(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                crate::error::ApiError::internal_server_error("Failed to format response")
                    .into_response()
            }
        }
    }
}

/// Handler return type: success envelope or a normalized error
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_status_data_and_message() {
        let resp = ApiResponse::ok(json!({"isLiked": true}), "Video liked successfully");
        let body = resp.envelope().unwrap();
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["data"]["isLiked"], true);
        assert_eq!(body["message"], "Video liked successfully");
        assert_eq!(body["success"], true);
    }

    #[test]
    fn created_uses_201() {
        let resp = ApiResponse::created(json!({}), "User registered successfully");
        assert_eq!(resp.envelope().unwrap()["statusCode"], 201);
    }
}
