use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_derive::api_model;
use std::borrow::Cow;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of coded failures: `{"error_code": "...", "error_message": "..."}`.
#[api_model(rename_all = "snake_case")]
pub struct ErrorBody {
    pub error_code: String,
    pub error_message: String,
}

/// Body of plain outcomes: `{"message": "..."}`.
#[api_model(rename_all = "snake_case")]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Failure of a JSON endpoint, mapped onto a fixed status code and body shape.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a coded body.
    BadRequest { code: Cow<'static, str>, message: Cow<'static, str> },
    /// 404 with a coded body when `code` is set, `{"message"}` otherwise.
    NotFound { code: Option<Cow<'static, str>>, message: Cow<'static, str> },
    /// 409 with an empty object body.
    Conflict,
    /// 500; the detail is logged, not returned.
    Internal { message: Cow<'static, str> },
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::BadRequest { code, message } | Self::NotFound { code: Some(code), message } => {
                let body = ErrorBody {
                    error_code: code.into_owned(),
                    error_message: message.into_owned(),
                };
                (status, Json(body)).into_response()
            },
            Self::NotFound { code: None, message } => {
                (status, Json(MessageBody::new(message))).into_response()
            },
            Self::Conflict => (status, Json(serde_json::json!({}))).into_response(),
            Self::Internal { message } => {
                tracing::error!(%message, "Request failed");
                (status, Json(MessageBody::new("Internal server error"))).into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn bodies_follow_status_shapes() {
        let (status, body) = body_of(ApiError::BadRequest {
            code: "COURSE001".into(),
            message: "Course Name is required".into(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "COURSE001");
        assert_eq!(body["error_message"], "Course Name is required");

        let (status, body) =
            body_of(ApiError::NotFound { code: None, message: "Course not found".into() }).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "message": "Course not found" }));

        let (status, body) = body_of(ApiError::Conflict).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, serde_json::json!({}));
    }

    #[tokio::test]
    async fn internal_detail_is_hidden() {
        let (status, body) =
            body_of(ApiError::Internal { message: "connection reset".into() }).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
