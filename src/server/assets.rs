// ────────────────────────────────
// src/server/assets.rs
// Dashboard files served from the configured static directory.
// ────────────────────────────────
use hyper::{Body, Request, Response, StatusCode, Uri};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

pub const STATIC_PREFIX: &str = "/static";
const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct AssetServer {
    root: PathBuf,
}

impl AssetServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve `index.html` from the asset root.
    pub async fn index(&self, req: Request<Body>) -> Response<Body> {
        let response = ServeFile::new(self.root.join(INDEX_FILE))
            .oneshot(req)
            .await
            .unwrap_or_else(|never| match never {});
        buffer(response).await
    }

    /// Serve a file addressed as `/static/<path>`.
    pub async fn file(&self, req: Request<Body>) -> Response<Body> {
        let Some(req) = strip_prefix(req, STATIC_PREFIX) else {
            return status_response(StatusCode::NOT_FOUND, "Not Found");
        };

        let response = ServeDir::new(&self.root)
            .oneshot(req)
            .await
            .unwrap_or_else(|never| match never {});
        buffer(response).await
    }
}

fn strip_prefix(req: Request<Body>, prefix: &str) -> Option<Request<Body>> {
    let (mut parts, body) = req.into_parts();
    let path_and_query = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let rest = path_and_query.strip_prefix(prefix)?;
    if !rest.starts_with('/') {
        return None;
    }

    parts.uri = rest.parse::<Uri>().ok()?;
    Some(Request::from_parts(parts, body))
}

// Assets are small; collect the file body into a plain hyper body.
async fn buffer<B>(response: Response<B>) -> Response<Body>
where
    B: hyper::body::HttpBody,
    B::Error: std::fmt::Display,
{
    let (parts, body) = response.into_parts();
    match hyper::body::to_bytes(body).await {
        Ok(bytes) => Response::from_parts(parts, Body::from(bytes)),
        Err(err) => {
            tracing::warn!(%err, "failed to read static asset");
            status_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub(crate) fn status_response(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn asset_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>dashboard</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('ok');").unwrap();
        dir
    }

    #[test]
    fn test_strip_prefix() {
        let req = strip_prefix(get("/static/app.js?v=2"), STATIC_PREFIX).unwrap();
        assert_eq!(req.uri(), "/app.js?v=2");

        assert!(strip_prefix(get("/staticfile.js"), STATIC_PREFIX).is_none());
    }

    #[tokio::test]
    async fn test_index_served() {
        let dir = asset_dir();
        let assets = AssetServer::new(dir.path());

        let response = assets.index(get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/html"));

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"<h1>dashboard</h1>");
    }

    #[tokio::test]
    async fn test_static_file_served() {
        let dir = asset_dir();
        let assets = AssetServer::new(dir.path());

        let response = assets.file(get("/static/app.js")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"console.log('ok');");
    }

    #[tokio::test]
    async fn test_missing_and_traversal_are_not_found() {
        let dir = asset_dir();
        let assets = AssetServer::new(dir.path().join("nested"));
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let response = assets.file(get("/static/missing.css")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = assets.file(get("/static/../index.html")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
