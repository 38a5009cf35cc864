use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::{middleware::from_fn, routing::get, Json, Router};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// HTTP front door: owns the listener, the cross-cutting middleware stack and
/// the merged OpenAPI document of the mounted API routers.
pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    openapi: Mutex<Option<OpenApi>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            openapi: Mutex::new(None),
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn set_config(&self, config: ApiIngressConfig) {
        self.config.store(Arc::new(config));
    }

    /// Merge an OpenAPI document into the one served at `/openapi.json`.
    pub fn register_openapi(&self, doc: OpenApi) {
        let mut slot = self.openapi.lock();
        match slot.as_mut() {
            Some(existing) => existing.merge(doc),
            None => *slot = Some(doc),
        }
    }

    pub fn openapi(&self) -> Option<OpenApi> {
        self.openapi.lock().clone()
    }

    /// Mount `api` under the ingress routes and wrap everything in the middleware stack.
    pub fn build_router(&self, api: Router) -> Router {
        let cfg = self.get_config();

        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(api);

        if let Some(doc) = self.openapi() {
            let doc = Arc::new(doc);
            router = router.route(
                "/openapi.json",
                get(move || {
                    let doc = doc.clone();
                    async move { Json((*doc).clone()) }
                }),
            );
        }
        if cfg.enable_docs {
            router = router.route("/docs", get(web::serve_docs));
        }

        let x_request_id = request_id::header();

        // Layers added later run first on the request path, so the effective order is
        // BodyLimit -> CORS -> SetRequestId -> PropagateRequestId -> Trace -> Timeout -> push_req_id.
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            cfg.request_timeout_sec,
        )));
        router = router.layer(request_id::create_trace_layer());
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(
            x_request_id,
            request_id::MakeReqId,
        ));
        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes))
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);
        Ok(listener)
    }

    /// Serve `router` on `listener` until `cancel` fires.
    pub async fn serve(
        &self,
        listener: TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
