//! API models and error mapping

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ccf_common::{ClassifierError, RequestScope};
use serde::{Deserialize, Serialize};

/// Standard API response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload on success
    pub data: Option<T>,
    /// Error details on failure
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response carrying an error code and message
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Error details in a failed response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Failures a route can produce
#[derive(Debug)]
pub enum ApiError {
    /// Engine-reported failure
    Engine(ClassifierError),
    /// Request lacked the x-project-id header
    MissingProjectHeader,
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        Self::Engine(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Engine(err) => {
                let status = match err {
                    ClassifierError::InvalidClassificationId(_)
                    | ClassifierError::InvalidClassificationGroupId(_) => StatusCode::NOT_FOUND,
                    ClassifierError::ConsumedClassification(_)
                    | ClassifierError::ConsumedClassificationGroup(_) => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.code(), err.to_string())
            }
            Self::MissingProjectHeader => (
                StatusCode::BAD_REQUEST,
                "MISSING_PROJECT_ID",
                "the x-project-id header is required".to_string(),
            ),
        };
        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}

/// Requester scope, taken from the `x-project-id` header
#[derive(Debug, Clone)]
pub struct Scope(pub RequestScope);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Scope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-project-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| Self(RequestScope::new(value)))
            .ok_or(ApiError::MissingProjectHeader)
    }
}
