// ABOUTME: HTTP server module hosting the evaluation and management endpoints
// ABOUTME: Binds listeners, applies timeouts and coordinates graceful shutdown

pub mod error;
pub mod jsonnet;
pub mod management;

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub use error::{Result, ServerError};
pub use jsonnet::AppState;

/// Wrap a router with request tracing and read/write timeouts
pub fn with_timeouts(router: Router, read_timeout: Duration, write_timeout: Duration) -> Router {
    router
        .layer(RequestBodyTimeoutLayer::new(read_timeout))
        .layer(TimeoutLayer::new(write_timeout))
        .layer(TraceLayer::new_for_http())
}

/// A router whose listener is already bound
#[derive(Debug)]
pub struct BoundServer {
    name: &'static str,
    listener: TcpListener,
    router: Router,
}

impl BoundServer {
    /// Bind `address` immediately so failures surface before serving starts
    pub async fn bind(name: &'static str, address: &str, router: Router) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            name,
            listener,
            router,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|source| ServerError::Serve {
                name: self.name,
                source,
            })
    }
}

/// Serve every bound server until `shutdown` resolves or one of them stops.
///
/// After shutdown starts, in-flight requests get `grace_period` to finish
/// before the remaining servers are aborted.
pub async fn serve<F>(servers: Vec<BoundServer>, shutdown: F, grace_period: Duration) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut join_set = JoinSet::new();

    for server in servers {
        let mut stop_rx = stop_rx.clone();
        match server.listener.local_addr() {
            Ok(addr) => info!(server = server.name, address = %addr, "Server listening"),
            Err(e) => warn!(server = server.name, error = %e, "Cannot read listen address"),
        }

        join_set.spawn(async move {
            let name = server.name;
            let result = axum::serve(server.listener, server.router)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.wait_for(|stop| *stop).await;
                })
                .await;
            (name, result)
        });
    }

    let mut failure = None;

    tokio::select! {
        _ = shutdown => {
            info!("Shutdown signal received");
        }
        Some(joined) = join_set.join_next() => {
            failure = server_failure(joined);
        }
        else => {}
    }

    let _ = stop_tx.send(true);

    let drain = async {
        while let Some(joined) = join_set.join_next().await {
            if let Some(e) = server_failure(joined) {
                failure.get_or_insert(e);
            }
        }
    };

    if tokio::time::timeout(grace_period, drain).await.is_err() {
        warn!(
            grace_period = ?grace_period,
            "Grace period elapsed, aborting remaining requests"
        );
        join_set.abort_all();
    }

    info!("JaaS service has shut down");

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn server_failure(
    joined: std::result::Result<(&'static str, std::io::Result<()>), tokio::task::JoinError>,
) -> Option<ServerError> {
    match joined {
        Ok((name, Ok(()))) => {
            info!(server = name, "Server stopped");
            None
        }
        Ok((name, Err(source))) => {
            error!(server = name, error = %source, "Server failed");
            Some(ServerError::Serve { name, source })
        }
        Err(e) => {
            error!(error = %e, "Server task failed");
            Some(ServerError::Task(e))
        }
    }
}
