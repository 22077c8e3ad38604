// ABOUTME: CLI module for the jaas service
// ABOUTME: Exports argument parsing, configuration loading and the application runner

pub mod app;
pub mod args;
pub mod config;

pub use app::App;
pub use args::Args;
pub use config::Config;
