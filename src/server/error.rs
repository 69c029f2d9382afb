//! Error-to-HTTP response conversion for page handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure of a page handler that cannot be reported as a flash message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            err => {
                tracing::error!(error = %err, "Server error in page handler");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
