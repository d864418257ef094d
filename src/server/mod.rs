// Mathscore - Prediction Server Module
// HTTP form and JSON API over a loaded predictor

mod handlers;
mod page;

pub use handlers::{create_router, health_check, HealthStatus, ModelInfo, PredictionResponse};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::predictor::Predictor;

/// Main prediction server structure
pub struct PredictionServer {
    /// Loaded once, shared read-only across requests
    predictor: Arc<Predictor>,
    /// Server configuration
    config: ServerConfig,
    started_at: Instant,
}

impl PredictionServer {
    /// Create a new server around an already-loaded predictor
    pub fn new(predictor: Predictor, config: ServerConfig) -> Self {
        Self {
            predictor: Arc::new(predictor),
            config,
            started_at: Instant::now(),
        }
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address {}", self.config.bind_address))?;

        let app = create_router(Arc::new(self)).layer(TraceLayer::new_for_http());

        tracing::info!("Starting mathscore server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Get reference to the predictor
    pub fn predictor(&self) -> &Arc<Predictor> {
        &self.predictor
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
