//! HTTP host for consultdesk: wraps module routers with the shared middleware
//! stack, adds health and OpenAPI routes, and runs the server until cancelled.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware::from_fn, routing::get, Extension, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Owns the HTTP server configuration.
#[derive(Debug, Clone, Default)]
pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Build the served router from the module routes.
    ///
    /// Middleware order (outermost to innermost):
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit
    pub fn build_router(&self, api: Router, openapi: Option<utoipa::openapi::OpenApi>) -> Result<Router> {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(api);

        if self.config.enable_docs {
            let doc = openapi.context("enable_docs is set but no OpenAPI document was supplied")?;
            let doc = serde_json::to_value(doc).context("Failed to serialize OpenAPI document")?;
            router = router.route(
                OPENAPI_PATH,
                get(web::openapi_json).layer(Extension(Arc::new(doc))),
            );
        }

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router = router
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind and serve until `cancel` fires.
    pub async fn serve(&self, router: Router, addr: SocketAddr, cancel: CancellationToken) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server terminated with an error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn doc() -> utoipa::openapi::OpenApi {
        utoipa::openapi::OpenApiBuilder::new()
            .info(utoipa::openapi::InfoBuilder::new().title("t").version("1").build())
            .build()
    }

    #[tokio::test]
    async fn health_is_served() {
        let router = ApiIngress::default().build_router(Router::new(), None).unwrap();
        let resp = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn openapi_route_only_when_enabled() {
        let off = ApiIngress::default().build_router(Router::new(), Some(doc())).unwrap();
        let resp = off
            .oneshot(Request::builder().uri(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let ingress = ApiIngress::new(ApiIngressConfig {
            enable_docs: true,
            ..Default::default()
        });
        let on = ingress.build_router(Router::new(), Some(doc())).unwrap();
        let resp = on
            .oneshot(Request::builder().uri(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["info"]["title"], "t");
    }

    #[test]
    fn docs_without_document_is_an_error() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            enable_docs: true,
            ..Default::default()
        });
        assert!(ingress.build_router(Router::new(), None).is_err());
    }
}
