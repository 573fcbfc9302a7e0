#![forbid(unsafe_code)]

use axum::routing::get;
use axum::Router;
use mixfolio_store::{AssetResolver, CatalogLoader, RetryPolicy};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod middleware;
mod telemetry;

pub use config::{
    ApiConfig, RetryConfig, ServerConfig, StorageConfig, ASSET_CACHE_MAX_AGE,
    CONFIG_SCHEMA_VERSION,
};
pub use telemetry::metrics::ServerMetrics;

pub const CRATE_NAME: &str = "mixfolio-server";

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<AssetResolver>,
    pub catalog: Arc<CatalogLoader>,
    pub api: ApiConfig,
    pub metrics: Arc<ServerMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(resolver: AssetResolver, catalog: CatalogLoader, api: ApiConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            catalog: Arc::new(catalog),
            api,
            metrics: Arc::new(ServerMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Wires storage, resolver and catalog loader from a resolved configuration.
pub fn build_state(cfg: &ServerConfig) -> Result<AppState, String> {
    let store = cfg.storage.build_store()?;
    let resolver = AssetResolver::new(store, RetryPolicy::from(&cfg.retry));
    let catalog = CatalogLoader::new(cfg.catalog_path.clone());
    Ok(AppState::new(resolver, catalog, cfg.api.clone()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/api/tracks", get(http::tracks::tracks_handler))
        .route("/api/genres", get(http::tracks::genres_handler))
        .route("/files/*path", get(http::files::files_handler))
        .route("/api/audio/*path", get(http::files::files_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
