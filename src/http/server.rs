//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit)
//! - Hold the injected backend collaborators in shared state
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{body::Body, http::Request, routing::{get, post}, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::backend::{AnalyticsStore, IdentityProvider, SupabaseClient};
use crate::config::{AppConfig, CacheConfig, SecurityConfig};
use crate::http::dash::{dash_analytics, DASH_ANALYTICS_PATH};
use crate::http::request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};

/// The two backend collaborators, as trait objects.
#[derive(Clone)]
pub struct Backends {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn AnalyticsStore>,
}

impl Backends {
    /// Serve both roles from one shared Supabase client.
    pub fn supabase(client: SupabaseClient) -> Self {
        let client = Arc::new(client);
        Self {
            identity: client.clone(),
            store: client,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn AnalyticsStore>,
    /// Rendered `cache-control` value for analytics responses.
    pub cache_control: String,
}

impl AppState {
    pub fn new(backends: Backends, cache: &CacheConfig) -> Self {
        Self {
            identity: backends.identity,
            store: backends.store,
            cache_control: cache.header_value(),
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    version: &'static str,
    status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        .route(DASH_ANALYTICS_PATH, post(dash_analytics))
        .route("/health", get(health))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(security.max_body_size))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request.request_id_str(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
}

/// HTTP server for the analytics service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and backends.
    pub fn new(config: AppConfig, backends: Backends) -> Self {
        let state = AppState::new(backends, &config.cache);
        let router = build_router(state, &config.security);
        Self { router }
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained first.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
