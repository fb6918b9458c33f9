// ────────────────────────────────
// src/api/status.rs
// Read-only view of the registry for the dashboard.
// ────────────────────────────────

use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::sync::Arc;

use crate::metrics::MetricsCollector;
use crate::registry::HealthRegistry;

pub const STATUS_PATH: &str = "/api/status";

#[derive(Clone)]
pub struct StatusApi {
    registry: Arc<HealthRegistry>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl StatusApi {
    pub fn new(registry: Arc<HealthRegistry>, metrics: Option<Arc<MetricsCollector>>) -> Self {
        Self { registry, metrics }
    }

    pub async fn handle(&self, req: &Request<Body>) -> Response<Body> {
        let mut response = match self.respond(req.method()).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(method = %req.method(), %err, "status request rejected");
                err.into()
            }
        };

        apply_cors(response.headers_mut());

        if let Some(metrics) = &self.metrics {
            metrics.record_status_request(req.method().as_str(), response.status().as_u16());
        }

        response
    }

    async fn respond(&self, method: &Method) -> Result<Response<Body>, ApiError> {
        match *method {
            Method::OPTIONS => Ok(Response::new(Body::empty())),
            Method::GET => {
                let snapshot = self.registry.snapshot().await;
                let body = serde_json::to_vec(&snapshot)?;

                let mut response = Response::new(Body::from(body));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                Ok(response)
            }
            _ => Err(ApiError::MethodNotAllowed),
        }
    }
}

fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to encode status: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<ApiError> for Response<Body> {
    fn from(err: ApiError) -> Self {
        let (status, message) = match err {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            ApiError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let mut response = Response::new(Body::from(message));
        *response.status_mut() = status;
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, OPTIONS"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Target, TargetStatus};
    use std::time::Duration;

    fn api() -> (StatusApi, Arc<HealthRegistry>) {
        let registry = Arc::new(HealthRegistry::new(vec![
            Target::new("A", "10.0.0.1"),
            Target::new("B", "10.0.0.2"),
        ]));
        (StatusApi::new(registry.clone(), None), registry)
    }

    fn request(method: Method) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(STATUS_PATH)
            .body(Body::empty())
            .unwrap()
    }

    fn assert_cors(response: &Response<Body>) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
    }

    #[tokio::test]
    async fn test_get_returns_snapshot() {
        let (api, registry) = api();
        registry.update(1, true, Duration::from_millis(8)).await;

        let response = api.handle(&request(Method::GET)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let statuses: Vec<TargetStatus> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "A");
        assert_eq!(statuses[0].checks, 0);
        assert_eq!(statuses[1].name, "B");
        assert_eq!(statuses[1].response_time, 8);
    }

    #[tokio::test]
    async fn test_options_is_empty_ok() {
        let (api, _) = api();

        let response = api.handle(&request(Method::OPTIONS)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let (api, registry) = api();

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = api.handle(&request(method)).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_cors(&response);
        }

        for status in registry.snapshot().await {
            assert_eq!(status.checks, 0);
        }
    }
}
