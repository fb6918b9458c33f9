// src/server/handler.rs
use hyper::{Body, Request, Response};
use std::convert::Infallible;
use tower::Service;

use crate::api::{StatusApi, STATUS_PATH};
use crate::server::assets::{AssetServer, STATIC_PREFIX};

/// Routes dashboard, static asset and status API requests.
#[derive(Clone)]
pub struct RequestHandler {
    api: StatusApi,
    assets: AssetServer,
}

impl RequestHandler {
    pub fn new(api: StatusApi, assets: AssetServer) -> Self {
        Self { api, assets }
    }

    pub async fn route(&self, req: Request<Body>) -> Response<Body> {
        let path = req.uri().path();

        if path == STATUS_PATH {
            self.api.handle(&req).await
        } else if path.starts_with(STATIC_PREFIX) {
            self.assets.file(req).await
        } else {
            // Every other path renders the dashboard.
            self.assets.index(req).await
        }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_owned();

            let response = handler.route(req).await;
            tracing::debug!(%method, %path, status = response.status().as_u16(), "request served");
            Ok(response)
        })
    }
}
