// ABOUTME: Main application orchestration for the jaas service
// ABOUTME: Sets up logging, builds both HTTP servers and runs them until interrupted

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::{Args, Config};
use crate::server::{self, jsonnet, management, AppState, BoundServer};
use crate::snippet::SnippetRegistry;
use crate::template::{EnvVars, JsonnetEvaluator};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create application from parsed command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Config::load(args.config.clone())?;
        config.apply_args(args)?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> Result<()> {
        let log_level = self.config.logging.filter_directive();
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match self.config.logging.format.as_str() {
            "pretty" => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .init();
            }
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(env_filter)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Shared state for the evaluation endpoint
    pub fn app_state(&self) -> AppState {
        let registry = SnippetRegistry::new(
            self.config.snippets.clone(),
            self.config.snippet_directories.clone(),
        )
        .with_strict_names(self.config.strict_snippet_names);
        let evaluator = JsonnetEvaluator::new(self.config.library_paths.clone());

        let env_vars = if self.config.env_ext_vars {
            EnvVars::capture()
        } else {
            EnvVars::default()
        };
        debug!(count = env_vars.len(), "External variables captured from environment");

        AppState::new(registry, evaluator).with_env_vars(env_vars)
    }

    /// Bind both listeners; either failing aborts startup
    pub async fn bind(&self) -> Result<Vec<BoundServer>> {
        let server_config = &self.config.server;
        let jsonnet_router = server::with_timeouts(
            jsonnet::router(self.app_state(), &server_config.jsonnet_endpoint_path),
            server_config.read_timeout,
            server_config.write_timeout,
        );
        let jsonnet_server = BoundServer::bind("jsonnet", &server_config.address(), jsonnet_router)
            .await
            .context("Cannot start Jsonnet server")?;
        debug!("Jsonnet server created");

        let management_config = &self.config.management;
        let management_router = server::with_timeouts(
            management::router(),
            management_config.read_timeout,
            management_config.write_timeout,
        );
        let management_server =
            BoundServer::bind("management", &management_config.address(), management_router)
                .await
                .context("Cannot start management server")?;
        debug!("Management server created");

        Ok(vec![jsonnet_server, management_server])
    }

    /// Run both servers until SIGINT
    pub async fn run(self) -> Result<()> {
        self.init_logging()?;

        info!("Starting jaas v{}", env!("CARGO_PKG_VERSION"));
        info!(
            log_level = %self.config.logging.level,
            log_format = %self.config.logging.format,
            listen_address = %self.config.server.listen_address,
            port = self.config.server.port,
            jsonnet_endpoint_path = %self.config.server.jsonnet_endpoint_path,
            read_timeout = ?self.config.server.read_timeout,
            write_timeout = ?self.config.server.write_timeout,
            library_paths = ?self.config.library_paths,
            snippets = ?self.config.snippets,
            snippet_directories = ?self.config.snippet_directories,
            strict_snippet_names = self.config.strict_snippet_names,
            env_ext_vars = self.config.env_ext_vars,
            management_listen_address = %self.config.management.listen_address,
            management_port = self.config.management.port,
            management_read_timeout = ?self.config.management.read_timeout,
            management_write_timeout = ?self.config.management.write_timeout,
            shutdown_grace_period = ?self.config.shutdown_grace_period,
            "Configuration loaded"
        );

        let servers = self.bind().await?;

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Cannot listen for interrupt signal");
                std::future::pending::<()>().await;
            }
        };

        server::serve(servers, shutdown, self.config.shutdown_grace_period).await?;
        Ok(())
    }
}
