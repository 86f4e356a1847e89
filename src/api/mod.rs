//! HTTP surface for preview, generation, listing and validation.
//!
//! Every route shares one loaded [`TemplateBank`] and the runtime
//! [`ForgeConfig`]. Errors are returned as `{"error": "..."}` bodies.

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};
pub use handlers::{GenerateRequest, GenerateResponse, OhlcQuery, PreviewQuery};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ForgeConfig;
use crate::template::TemplateBank;

/// Shared state for all handlers.
pub struct AppState {
    pub bank: Arc<TemplateBank>,
    pub config: ForgeConfig,
}

impl AppState {
    pub fn new(bank: Arc<TemplateBank>, config: ForgeConfig) -> Self {
        Self { bank, config }
    }
}

/// Builds the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/preview/ohlc", get(handlers::preview_ohlc))
        .route("/api/preview/{category}", get(handlers::preview_sample))
        .route("/api/generate", post(handlers::generate_dataset))
        .route("/api/datasets", get(handlers::list_datasets))
        .route("/api/datasets/{filename}", get(handlers::download_dataset))
        .route("/api/validate", post(handlers::validate_dataset))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Loads the template bank and serves the API until the process exits.
pub async fn serve(config: ForgeConfig) -> anyhow::Result<()> {
    let bank = Arc::new(TemplateBank::load()?);
    std::fs::create_dir_all(&config.datasets_dir)?;

    let addr = config.bind_addr;
    info!(
        datasets_dir = %config.datasets_dir.display(),
        "Starting trade-forge API"
    );

    let app = router(Arc::new(AppState::new(bank, config)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let bank = Arc::new(TemplateBank::load().expect("bank should load"));
        let _router = router(Arc::new(AppState::new(bank, ForgeConfig::default())));
    }
}
