use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Any failure while serving a request. The cause is logged, the client
/// only ever sees a generic 500.
#[derive(Debug)]
pub struct ApiError(pub cf_core::Error);

impl From<cf_core::Error> for ApiError {
    fn from(err: cf_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("❌ Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
        )
            .into_response()
    }
}
