// ABOUTME: Error types for snippet resolution
// ABOUTME: Distinguishes unknown snippets from names rejected by strict mode

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnippetError {
    #[error("Snippet not found: {0}")]
    NotFound(String),

    #[error("Invalid snippet name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, SnippetError>;
