// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Builds snippet fixtures on disk and runs the servers on ephemeral ports

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use jaas::server::{self, jsonnet, management, AppState, BoundServer};
use jaas::snippet::SNIPPET_ENTRY_FILE;
use jaas::{EnvVars, JsonnetEvaluator, SnippetRegistry};

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create `{root}/{directory}` and return its path
    pub fn create_dir(&self, directory: &str) -> PathBuf {
        let path = self.path().join(directory);
        std::fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }

    /// Write `{root}/{directory}/{name}/main.jsonnet`
    pub fn create_snippet(&self, directory: &str, name: &str, content: &str) -> PathBuf {
        let snippet_dir = self.create_dir(directory).join(name);
        std::fs::create_dir_all(&snippet_dir).expect("Failed to create snippet directory");
        let file = snippet_dir.join(SNIPPET_ENTRY_FILE);
        std::fs::write(&file, content).expect("Failed to write snippet");
        file
    }

    /// Write an arbitrary file relative to the environment root
    pub fn create_file(&self, relative: &str, content: &str) -> PathBuf {
        let file = self.path().join(relative);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file, content).expect("Failed to write file");
        file
    }
}

/// Servers running in the background until dropped or stopped
pub struct RunningServers {
    pub jsonnet_addr: SocketAddr,
    pub management_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<jaas::server::Result<()>>,
}

impl RunningServers {
    pub async fn start(state: AppState) -> Self {
        let jsonnet_router = server::with_timeouts(
            jsonnet::router(state, "jsonnet"),
            Duration::from_secs(5),
            Duration::from_secs(5),
        );
        let jsonnet_server = BoundServer::bind("jsonnet", "127.0.0.1:0", jsonnet_router)
            .await
            .expect("Failed to bind jsonnet server");
        let management_server =
            BoundServer::bind("management", "127.0.0.1:0", management::router())
                .await
                .expect("Failed to bind management server");

        let jsonnet_addr = jsonnet_server.local_addr().unwrap();
        let management_addr = management_server.local_addr().unwrap();

        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(server::serve(
            vec![jsonnet_server, management_server],
            async {
                let _ = rx.await;
            },
            Duration::from_secs(5),
        ));

        Self {
            jsonnet_addr,
            management_addr,
            shutdown: Some(tx),
            handle,
        }
    }

    pub fn jsonnet_url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.jsonnet_addr, path_and_query)
    }

    pub fn management_url(&self, path: &str) -> String {
        format!("http://{}{}", self.management_addr, path)
    }

    pub async fn stop(mut self) -> jaas::server::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await.expect("Server task panicked")
    }
}

pub fn app_state(snippets: Vec<String>, directories: Vec<PathBuf>) -> AppState {
    AppState::new(
        SnippetRegistry::new(snippets, directories),
        JsonnetEvaluator::default(),
    )
    .with_env_vars(EnvVars::default())
}
