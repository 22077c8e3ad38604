// ABOUTME: Error types for the HTTP endpoints and listener lifecycle
// ABOUTME: Maps request failures to status codes and logs their diagnostics

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::snippet::SnippetError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Unsupported HTTP method: {0}")]
    MethodNotAllowed(Method),

    #[error(transparent)]
    Snippet(#[from] SnippetError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Evaluation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Cannot listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} server failed: {source}")]
    Serve {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Snippet(_) => StatusCode::NOT_FOUND,
            ServerError::Template(_) => StatusCode::BAD_REQUEST,
            ServerError::Task(_) | ServerError::Bind { .. } | ServerError::Serve { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::MethodNotAllowed(method) => {
                error!(method = %method, "Unsupported HTTP method used");
            }
            ServerError::Snippet(SnippetError::NotFound(name)) => {
                error!(snippet_name = %name, "Snippet not found");
            }
            ServerError::Snippet(SnippetError::InvalidName(name)) => {
                error!(snippet_name = %name, "Rejected snippet name");
            }
            ServerError::Template(TemplateError::Marshal {
                name,
                values,
                source,
            }) => {
                error!(key = %name, value = ?values, error = %source, "Cannot marshal query parameter value");
            }
            ServerError::Template(TemplateError::Evaluation(diagnostic)) => {
                error!(error = %diagnostic, "Cannot evaluate Jsonnet");
            }
            other => {
                error!(error = %other, "Request failed");
            }
        }

        self.status_code().into_response()
    }
}
