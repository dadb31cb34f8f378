use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while producing one match analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("both team names are required")]
    IncompleteInput,

    #[error("analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analysis API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("no response from the analysis model")]
    EmptyResponse,

    #[error("analysis payload did not match the expected structure: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}
