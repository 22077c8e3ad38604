// ABOUTME: Snippet module for locating Jsonnet entry files by name
// ABOUTME: Exports the snippet registry and its lookup error types

pub mod error;
pub mod registry;

pub use error::{Result, SnippetError};
pub use registry::{SnippetRegistry, SNIPPET_ENTRY_FILE};
