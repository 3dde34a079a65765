//! RFC9457-style API error wrapper.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use stevedore_sync::SyncError;

/// Structured API error rendered as a problem document.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    title: &'static str,
    detail: Option<String>,
}

#[derive(Serialize)]
struct ProblemBody {
    status: u16,
    title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    const fn new(status: StatusCode, title: &'static str) -> Self {
        Self {
            status,
            title,
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Client sent a request the pipeline cannot act on.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad request").with_detail(detail)
    }

    /// An upstream dependency of the pipeline failed.
    pub fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "upstream failure").with_detail(detail)
    }

    /// Something inside the pipeline failed.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").with_detail(detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemBody {
            status: self.status.as_u16(),
            title: self.title,
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<SyncError> for ApiError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::UnsupportedUrl { url, reason } => {
                Self::bad_request(format!("repository url {url:?} rejected: {reason}"))
            }
            SyncError::GitSpawn { source } => {
                Self::bad_gateway(format!("could not invoke git: {source}"))
            }
            SyncError::CloneFailed { url, code, stderr } => Self::bad_gateway(format!(
                "clone of {url:?} exited with {code:?}: {stderr}"
            )),
            SyncError::Tree(error) => Self::internal(error.to_string()),
            SyncError::Storage(error) => Self::internal(error.to_string()),
        }
    }
}
