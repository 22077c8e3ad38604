// ABOUTME: Configuration management for the jaas service
// ABOUTME: Merges defaults, an optional YAML file, JAAS_* environment variables and CLI flags

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::Args;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub management: ManagementConfig,

    /// Exact snippet names, each usable as a file path
    #[serde(default)]
    pub snippets: Vec<String>,

    #[serde(default)]
    pub snippet_directories: Vec<PathBuf>,

    #[serde(default)]
    pub library_paths: Vec<PathBuf>,

    #[serde(default)]
    pub strict_snippet_names: bool,

    #[serde(default = "default_env_ext_vars")]
    pub env_ext_vars: bool,

    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub shutdown_grace_period: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub port: u16,
    pub jsonnet_endpoint_path: String,
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    pub listen_address: String,
    pub port: u16,
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,
}

fn default_env_ext_vars() -> bool {
    true
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
            management: ManagementConfig::default(),
            snippets: Vec::new(),
            snippet_directories: Vec::new(),
            library_paths: Vec::new(),
            strict_snippet_names: false,
            env_ext_vars: true,
            shutdown_grace_period: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1".to_string(),
            port: 8080,
            jsonnet_endpoint_path: "jsonnet".to_string(),
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1".to_string(),
            port: 8081,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoggingConfig {
    /// Filter directive for the configured level, unknown levels fall back to info
    pub fn filter_directive(&self) -> &'static str {
        match self.level.to_lowercase().as_str() {
            "error" => "error",
            "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }
}

impl ManagementConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(anyhow!("Configuration file not found: {}", p.display()));
                }
                Some(p)
            }
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Cannot read {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?
            }
            None => Config::default(),
        };

        config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Find configuration file in the working directory
    fn find_config_file() -> Option<PathBuf> {
        ["jaas.yaml", "jaas.yml", ".jaas.yaml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Merge JAAS_* environment variables into configuration
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("JAAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("JAAS_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(address) = lookup("JAAS_LISTEN_ADDRESS") {
            self.server.listen_address = address;
        }
        if let Some(port) = lookup("JAAS_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid JAAS_PORT: {}", port))?;
        }
        if let Some(path) = lookup("JAAS_JSONNET_ENDPOINT_PATH") {
            self.server.jsonnet_endpoint_path = path;
        }

        if let Some(address) = lookup("JAAS_MANAGEMENT_LISTEN_ADDRESS") {
            self.management.listen_address = address;
        }
        if let Some(port) = lookup("JAAS_MANAGEMENT_PORT") {
            self.management.port = port
                .parse()
                .with_context(|| format!("Invalid JAAS_MANAGEMENT_PORT: {}", port))?;
        }

        Ok(())
    }

    /// Apply command line flags on top of file and environment values
    pub fn apply_args(&mut self, args: &Args) -> Result<()> {
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
        if let Some(ref format) = args.log_format {
            self.logging.format = format.clone();
        }

        if let Some(ref address) = args.listen_address {
            self.server.listen_address = address.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref path) = args.jsonnet_endpoint_path {
            self.server.jsonnet_endpoint_path = path.clone();
        }
        if let Some(timeout) = args.read_timeout {
            self.server.read_timeout = timeout;
        }
        if let Some(timeout) = args.write_timeout {
            self.server.write_timeout = timeout;
        }

        if let Some(ref address) = args.management_listen_address {
            self.management.listen_address = address.clone();
        }
        if let Some(port) = args.management_port {
            self.management.port = port;
        }
        if let Some(timeout) = args.management_read_timeout {
            self.management.read_timeout = timeout;
        }
        if let Some(timeout) = args.management_write_timeout {
            self.management.write_timeout = timeout;
        }

        self.snippets.extend(args.snippets.iter().cloned());
        self.snippet_directories
            .extend(args.snippet_directories.iter().cloned());
        self.library_paths.extend(args.library_paths.iter().cloned());

        if args.strict_snippet_names {
            self.strict_snippet_names = true;
        }
        if args.no_env_ext_vars {
            self.env_ext_vars = false;
        }
        if let Some(period) = args.shutdown_grace_period {
            self.shutdown_grace_period = period;
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        match self.logging.format.as_str() {
            "json" | "pretty" | "compact" => Ok(()),
            other => Err(anyhow!(
                "Unknown log format '{}'. Expected json, pretty or compact",
                other
            )),
        }
    }
}
