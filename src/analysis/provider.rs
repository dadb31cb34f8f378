use async_trait::async_trait;

use super::error::AnalysisError;
use super::schema::MatchAnalysisResponse;

/// Anything able to turn a pair of team names into a match analysis.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Run one full analysis round trip for the fixture.
    async fn request_analysis(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<MatchAnalysisResponse, AnalysisError>;

    /// Human-readable name for logging and the page footer.
    fn name(&self) -> &str;
}
