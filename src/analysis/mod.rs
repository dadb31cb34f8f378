pub mod client;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod schema;

pub use client::{require_teams, GeminiClient};
pub use error::AnalysisError;
pub use provider::AnalysisProvider;
pub use schema::{CategoryData, MatchAnalysisResponse, PredictionItem};
