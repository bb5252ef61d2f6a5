//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve the safe configuration view and service lookups
//! - Never expose `secrets`
//! - Expose Prometheus metrics when a recorder is installed
//!
//! # Routes
//! - `GET /api/config`: safe view of the configuration loaded at startup
//! - `GET /api/services/{id}`: one service of that configuration, secrets removed
//! - `GET /api/snapshot`: safe view of the persisted snapshot
//! - `GET /health`
//! - `GET /metrics`

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{
    extract_safely_config, extract_services_from_config, CompleteConfig, ConfigLoader, Service,
};

/// Upper bound on handling a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Safe view of the configuration loaded at startup.
    pub config: Arc<CompleteConfig>,
    /// Services of that same load, keyed by id, secrets removed.
    pub services: Arc<HashMap<String, Service>>,
    pub loader: Arc<ConfigLoader>,
    pub metrics: Option<PrometheusHandle>,
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `config`.
    ///
    /// Service ids only live as long as one load, so lookups are answered
    /// from the same configuration that `/api/config` returns.
    pub fn new(
        config: CompleteConfig,
        loader: Arc<ConfigLoader>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let safe = extract_safely_config(&config);
        let services = extract_services_from_config(&safe);
        let state = AppState {
            config: Arc::new(safe),
            services: Arc::new(services),
            loader,
            metrics,
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/api/config", get(get_config))
            .route("/api/services/{id}", get(get_service))
            .route("/api/snapshot", get(get_snapshot))
            .route("/health", get(health))
            .route("/metrics", get(render_metrics))
            .with_state(state)
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for embedding or for driving requests in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn get_config(State(state): State<AppState>) -> Json<CompleteConfig> {
    Json(CompleteConfig::clone(&state.config))
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, StatusCode> {
    state
        .services
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_snapshot(State(state): State<AppState>) -> Result<Json<CompleteConfig>, StatusCode> {
    let config = state
        .loader
        .get_local_config()
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(extract_safely_config(&config)))
}

async fn health() -> &'static str {
    "ok"
}

async fn render_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
