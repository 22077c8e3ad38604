// ABOUTME: Error types for parameter binding and Jsonnet evaluation
// ABOUTME: Keeps engine diagnostics as text so they can be logged per request

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Cannot marshal query parameter {name}: {source}")]
    Marshal {
        name: String,
        values: Vec<String>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Jsonnet evaluation error: {0}")]
    Evaluation(String),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
