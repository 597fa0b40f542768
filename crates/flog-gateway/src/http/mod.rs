pub mod health;
pub mod page;
pub mod reserve;
pub mod status;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flog_core::FlogError;
use tracing::warn;

/// Request-level failure. Rendered as a plain-text message with a status
/// code; never takes the process down.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Flog(#[from] FlogError),
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Flog(e) => match e {
                FlogError::InvalidDateFormat { .. }
                | FlogError::InvalidPartySize { .. }
                | FlogError::DuplicateRequest { .. } => StatusCode::BAD_REQUEST,
                FlogError::AffiliationNotFound { .. }
                | FlogError::CourseNotFound
                | FlogError::NoTeeTimesAvailable { .. }
                | FlogError::RemoteService { .. }
                | FlogError::ConfigNotFound => StatusCode::BAD_GATEWAY,
                FlogError::Persistence { .. }
                | FlogError::StaleFormatVersion { .. }
                | FlogError::Config(_)
                | FlogError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
