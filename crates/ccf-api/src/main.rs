//! Classification API service entrypoint

use ccf_api::{build_router, ApiState};
use ccf_engine::ClassifierEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Env-driven service configuration
struct ApiConfig {
    /// Socket the server binds, CCF_API_BIND or 127.0.0.1:8080
    bind: SocketAddr,
}

impl ApiConfig {
    fn from_env() -> Self {
        let bind = std::env::var("CCF_API_BIND")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));
        Self { bind }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ApiConfig::from_env();
    let state = ApiState {
        engine: Arc::new(ClassifierEngine::new()),
    };
    let app = build_router(state);

    tracing::info!(bind = %config.bind, "classification API listening");
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
