// ABOUTME: Evaluation endpoint rendering snippets requested by path
// ABOUTME: Resolves the snippet, binds query parameters and evaluates on the blocking pool

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use std::sync::Arc;
use tracing::debug;

use super::error::{Result, ServerError};
use crate::snippet::SnippetRegistry;
use crate::template::{bind, EnvVars, Evaluator, ParameterSet};

/// Shared read-only state for the evaluation endpoint
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SnippetRegistry>,
    pub evaluator: Arc<dyn Evaluator>,
    pub env_vars: Arc<EnvVars>,
}

impl AppState {
    pub fn new(registry: SnippetRegistry, evaluator: impl Evaluator + 'static) -> Self {
        Self {
            registry: Arc::new(registry),
            evaluator: Arc::new(evaluator),
            env_vars: Arc::new(EnvVars::default()),
        }
    }

    pub fn with_env_vars(mut self, env_vars: EnvVars) -> Self {
        self.env_vars = Arc::new(env_vars);
        self
    }
}

/// Route `/{endpoint_path}/{snippet...}` to the evaluation handler
pub fn router(state: AppState, endpoint_path: &str) -> Router {
    let prefix = endpoint_path.trim_matches('/');
    let route = if prefix.is_empty() {
        "/*snippet".to_string()
    } else {
        format!("/{}/*snippet", prefix)
    };
    debug!(route = %route, "Jsonnet handler configured");

    Router::new()
        .route(&route, any(evaluate_snippet))
        .with_state(state)
}

async fn evaluate_snippet(
    State(state): State<AppState>,
    method: Method,
    Path(snippet): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    if method != Method::GET {
        return Err(ServerError::MethodNotAllowed(method));
    }

    debug!(snippet_name = %snippet, "Extracted snippet name");
    let path = state.registry.resolve(&snippet)?;

    let params = ParameterSet::from_query(query.as_deref());
    debug!(query_params = ?params, "Extracted query parameters");
    let mut bindings = state.env_vars.bindings();
    bindings.extend(bind(&params)?);

    let evaluator = Arc::clone(&state.evaluator);
    let rendered =
        tokio::task::spawn_blocking(move || evaluator.evaluate(&path, &bindings)).await??;

    Ok(([(header::CONTENT_TYPE, "application/json")], rendered).into_response())
}
