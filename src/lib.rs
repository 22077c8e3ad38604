// ABOUTME: Main library module for the jaas Jsonnet service
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod server;
pub mod snippet;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use server::{AppState, BoundServer, ServerError};
pub use snippet::{SnippetError, SnippetRegistry};
pub use template::{Binding, EnvVars, Evaluator, JsonnetEvaluator, ParameterSet, TemplateError};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
