use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::error::ContentError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("no post at {0}")]
    NotFound(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>")).into_response(),
            Self::Content(_) | Self::Join(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal Server Error</h1>"),
                )
                    .into_response()
            }
        }
    }
}
