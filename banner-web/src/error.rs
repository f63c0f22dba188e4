//! Request failures and their responses

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use banner::loader::LoadError;
use banner::render::InvalidInput;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error};

use crate::page;

/// Everything that can go wrong while handling a request
#[derive(Debug, Error)]
pub enum AppError {
    /// The submitted text is empty.
    #[error("there is no text to render")]
    EmptyText,
    /// The submitted text contains a character outside printable ASCII.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    /// The request body is not a urlencoded form.
    #[error(transparent)]
    Form(#[from] FormRejection),
    /// The banner could not be loaded or listed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A blocking task panicked or was cancelled.
    #[error("background task failed")]
    Task(#[from] JoinError),
    /// No route matches the path.
    #[error("page not found")]
    NotFound,
    /// The route exists but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    /// The status code of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyText
            | Self::InvalidInput(_)
            | Self::Form(_)
            | Self::Load(LoadError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            Self::Load(LoadError::NotFound(_)) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Load(LoadError::Io { .. } | LoadError::List { .. }) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            error!(error = %self, source = ?std::error::Error::source(&self), "request failed");
            None
        } else {
            debug!(%status, error = %self, "rejected request");
            Some(self.to_string())
        };
        (status, Html(page::error(status, detail.as_deref()).into_string())).into_response()
    }
}
