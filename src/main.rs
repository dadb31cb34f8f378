use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod analysis;
mod config;
mod dashboard;
mod session;

use analysis::GeminiClient;
use config::Config;
use dashboard::AppState;
use session::AnalysisSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; analysis requests will be rejected by the provider");
    }

    let client = GeminiClient::new(
        &config.gemini_api_url,
        &config.gemini_model,
        config.gemini_api_key.clone(),
        config.temperature,
        &config.explanation_language,
    )?;
    info!(
        "Using model {} (temperature {}, explanations in {})",
        client.model(),
        config.temperature,
        config.explanation_language
    );

    let session = AnalysisSession::new(Arc::new(client), config.rotate_interval());
    let state = AppState {
        model: session.provider_name().to_string(),
        session,
    };
    let app = dashboard::router(state);

    let addr: SocketAddr = config.dashboard_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard address {}", addr))?;
    info!("Dashboard listening on http://{}", addr);

    // Run dashboard server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
