use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::session::DEFAULT_ROTATE_INTERVAL;

/// Football match prediction dashboard backed by a generative model
#[derive(Parser, Debug, Clone)]
#[command(name = "matchup-analyst", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Gemini API base URL
    #[arg(
        long,
        env = "GEMINI_API_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub gemini_api_url: String,

    /// Gemini model used for the analysis
    #[arg(
        long,
        env = "GEMINI_MODEL",
        default_value = "gemini-3-pro-preview"
    )]
    pub gemini_model: String,

    /// Gemini API key (not checked locally; the provider rejects bad keys)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Sampling temperature sent with every request
    #[arg(long, env = "TEMPERATURE", default_value = "0.7")]
    pub temperature: f64,

    /// Language of the summary and market explanations
    #[arg(long, env = "EXPLANATION_LANGUAGE", default_value = "Bengali")]
    pub explanation_language: String,

    /// Loading message rotation period in milliseconds
    #[arg(
        long,
        env = "LOADING_ROTATE_MS",
        default_value_t = DEFAULT_ROTATE_INTERVAL.as_millis() as u64
    )]
    pub loading_rotate_ms: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!("temperature must be between 0.0 and 2.0");
        }
        if self.loading_rotate_ms == 0 {
            anyhow::bail!("loading_rotate_ms must be positive");
        }
        if self.explanation_language.trim().is_empty() {
            anyhow::bail!("explanation_language must not be empty");
        }
        if self.gemini_model.trim().is_empty() {
            anyhow::bail!("gemini_model must not be empty");
        }
        let api_url = url::Url::parse(&self.gemini_api_url)
            .with_context(|| format!("invalid GEMINI_API_URL '{}'", self.gemini_api_url))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            anyhow::bail!("GEMINI_API_URL must be an http(s) URL");
        }
        self.dashboard_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid DASHBOARD_ADDR '{}'", self.dashboard_addr))?;
        Ok(())
    }

    pub fn rotate_interval(&self) -> Duration {
        Duration::from_millis(self.loading_rotate_ms)
    }
}
