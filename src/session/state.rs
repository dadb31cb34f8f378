use serde::Serialize;

use crate::analysis::MatchAnalysisResponse;

/// Shown for every analysis failure regardless of cause.
pub const ANALYSIS_FAILED_MESSAGE: &str = "বিশ্লেষণ করতে সমস্যা হয়েছে। আবার চেষ্টা করুন।";

/// Which region of the page is visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "state",
    content = "data",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum AnalyticsState {
    /// Nothing submitted yet
    Idle,
    /// One analysis in flight
    Loading,
    /// Latest successful result, replaced wholesale by the next one
    Success(Box<MatchAnalysisResponse>),
    /// User-facing failure message
    Error(String),
}

impl AnalyticsState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalyticsState::Loading)
    }

    /// Lowercase tag used by the page to decide whether to keep polling.
    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsState::Idle => "idle",
            AnalyticsState::Loading => "loading",
            AnalyticsState::Success(_) => "success",
            AnalyticsState::Error(_) => "error",
        }
    }
}
