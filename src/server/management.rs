// ABOUTME: Management endpoint serving liveness and readiness checks
// ABOUTME: Runs on its own listener so evaluation load cannot block it

use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use super::error::{Result, ServerError};

pub const HEALTH_BODY: &str = r#"{"status": "ok"}"#;

pub fn router() -> Router {
    Router::new()
        .route("/ready", any(health))
        .route("/live", any(health))
}

async fn health(method: Method) -> Result<Response> {
    if method != Method::GET {
        return Err(ServerError::MethodNotAllowed(method));
    }

    Ok(([(header::CONTENT_TYPE, "application/json")], HEALTH_BODY).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn send(method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_ready_and_live() {
        for path in ["/ready", "/live"] {
            let (status, body) = send(Method::GET, path).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, HEALTH_BODY);
        }
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        for path in ["/ready", "/live"] {
            let (status, _) = send(Method::POST, path).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (status, _) = send(Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
