// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Flags override values from the configuration file and environment

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[command(name = "jaas")]
#[command(about = "Jsonnet as a Service: evaluate named Jsonnet snippets over HTTP")]
#[command(version)]
pub struct Args {
    #[arg(short, long, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "The log level to use (debug, info, warn, error)")]
    pub log_level: Option<String>,

    #[arg(long, help = "The log output format (json, pretty, compact)")]
    pub log_format: Option<String>,

    #[arg(long, help = "The listen address to bind to for the Jsonnet server")]
    pub listen_address: Option<String>,

    #[arg(long, help = "The port to bind to for the Jsonnet server")]
    pub port: Option<u16>,

    #[arg(long, help = "The path of the Jsonnet endpoint")]
    pub jsonnet_endpoint_path: Option<String>,

    #[arg(
        long,
        value_parser = humantime::parse_duration,
        help = "Maximum duration for reading the request in the Jsonnet server"
    )]
    pub read_timeout: Option<Duration>,

    #[arg(
        long,
        value_parser = humantime::parse_duration,
        help = "Maximum duration before timing out the response in the Jsonnet server"
    )]
    pub write_timeout: Option<Duration>,

    #[arg(long, help = "The listen address to bind to for the management server")]
    pub management_listen_address: Option<String>,

    #[arg(long, help = "The port to bind to for the management server")]
    pub management_port: Option<u16>,

    #[arg(
        long,
        value_parser = humantime::parse_duration,
        help = "Maximum duration for reading the request in the management server"
    )]
    pub management_read_timeout: Option<Duration>,

    #[arg(
        long,
        value_parser = humantime::parse_duration,
        help = "Maximum duration before timing out the response in the management server"
    )]
    pub management_write_timeout: Option<Duration>,

    #[arg(
        long = "library-path",
        help = "Directory containing Jsonnet libraries (repeatable, rightmost match wins)"
    )]
    pub library_paths: Vec<PathBuf>,

    #[arg(
        long = "snippet",
        help = "Jsonnet file usable as a snippet by its exact name (repeatable)"
    )]
    pub snippets: Vec<String>,

    #[arg(
        long = "snippet-directory",
        help = "Directory holding snippets as subdirectories with a main.jsonnet (repeatable)"
    )]
    pub snippet_directories: Vec<PathBuf>,

    #[arg(long, help = "Reject snippet names containing '..' or absolute paths")]
    pub strict_snippet_names: bool,

    #[arg(long, help = "Ignore JAAS_EXT_VAR_* environment variables")]
    pub no_env_ext_vars: bool,

    #[arg(
        long,
        value_parser = humantime::parse_duration,
        help = "Time allowed for in-flight requests to finish on shutdown"
    )]
    pub shutdown_grace_period: Option<Duration>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
