use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::error::AnalysisError;
use super::prompt::build_prompt;
use super::provider::AnalysisProvider;
use super::schema::{response_schema, MatchAnalysisResponse};

/// Client for the Gemini `generateContent` API with a strict JSON response schema.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    language: String,
}

impl GeminiClient {
    pub fn new(
        api_url: &str,
        model: &str,
        api_key: Option<String>,
        temperature: f64,
        language: &str,
    ) -> Result<Self> {
        // No request timeout: a submitted analysis runs to completion.
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GeminiClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            temperature,
            language: language.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "responseSchema": response_schema(&self.language),
            },
        })
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn request_analysis(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<MatchAnalysisResponse, AnalysisError> {
        let (home_team, away_team) = require_teams(home_team, away_team)?;
        let prompt = build_prompt(home_team, away_team, &self.language);
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        info!(
            "Requesting analysis for '{} vs {}' from {}",
            home_team, away_team, self.model
        );

        let api_key = self.api_key.as_deref().unwrap_or_default();
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(&prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, body });
        }

        let raw: Value = resp.json().await?;
        let text = extract_text(&raw).ok_or(AnalysisError::EmptyResponse)?;
        debug!("Model returned {} bytes of analysis text", text.len());

        let analysis = parse_payload(&text)?;
        info!(
            "Analysis received: {} categories, {} markets",
            analysis.categories.len(),
            analysis.market_count()
        );
        Ok(analysis)
    }
}

/// Both team names must be non-blank; returns them trimmed.
pub fn require_teams<'a>(
    home_team: &'a str,
    away_team: &'a str,
) -> Result<(&'a str, &'a str), AnalysisError> {
    let (home, away) = (home_team.trim(), away_team.trim());
    if home.is_empty() || away.is_empty() {
        return Err(AnalysisError::IncompleteInput);
    }
    Ok((home, away))
}

// ── Parsing helpers ────────────────────────────────────────────────────────────

/// Concatenate the answer parts of the first candidate. Thought parts
/// (`"thought": true`) are reasoning, not payload, and are skipped.
fn extract_text(raw: &Value) -> Option<String> {
    let parts = raw["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter(|part| part["thought"].as_bool() != Some(true))
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the model's text as a [`MatchAnalysisResponse`], tolerating a markdown code fence.
fn parse_payload(text: &str) -> Result<MatchAnalysisResponse, AnalysisError> {
    let clean = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    if clean.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(serde_json::from_str(clean)?)
}
