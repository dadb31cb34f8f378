//! Server-side rendering of the visible page region.
//!
//! Everything here is a pure function of a [`SessionSnapshot`]. Views are askama
//! templates under `templates/`, which escape every model-supplied string.

use askama::Template;

use crate::analysis::{CategoryData, MatchAnalysisResponse, PredictionItem};
use crate::session::{AnalyticsState, SessionSnapshot};

/// Probability at or above which a market is flagged as a hot pick.
pub const HOT_PICK_THRESHOLD: f64 = 70.0;

/// Visual emphasis of a probability badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbabilityTier {
    /// ≥ 80
    Strong,
    /// ≥ 70
    Hot,
    /// ≥ 50
    Neutral,
    /// < 50
    Muted,
}

impl ProbabilityTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 80.0 {
            ProbabilityTier::Strong
        } else if probability >= HOT_PICK_THRESHOLD {
            ProbabilityTier::Hot
        } else if probability >= 50.0 {
            ProbabilityTier::Neutral
        } else {
            ProbabilityTier::Muted
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ProbabilityTier::Strong => "tier-strong",
            ProbabilityTier::Hot => "tier-hot",
            ProbabilityTier::Neutral => "tier-neutral",
            ProbabilityTier::Muted => "tier-muted",
        }
    }
}

pub fn is_hot_pick(probability: f64) -> bool {
    probability >= HOT_PICK_THRESHOLD
}

/// CSS width (percent) of a fill bar. Only the bar is clamped; badges show the raw value.
pub fn bar_width(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 100.0)
    }
}

/// Width for the confidence bar, taken from the leading number of e.g. "78%".
pub fn confidence_width(confidence: &str) -> Option<f64> {
    let numeric: String = confidence
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse::<f64>().ok().map(bar_width)
}

// ============================================================
// TEMPLATES
// ============================================================

/// Full page shell with the current view rendered in place.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub view: String,
}

#[derive(Template)]
#[template(path = "view.html")]
struct ViewTemplate<'a> {
    state: &'a str,
    body: String,
}

#[derive(Template)]
#[template(path = "idle.html")]
struct IdleTemplate;

#[derive(Template)]
#[template(path = "loading.html")]
struct LoadingTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "success.html")]
struct SuccessTemplate<'a> {
    home_team: &'a str,
    away_team: &'a str,
    summary: &'a str,
    confidence: &'a str,
    confidence_width: Option<f64>,
    categories: Vec<CategoryView<'a>>,
    model: &'a str,
}

/// View model for a category panel.
struct CategoryView<'a> {
    name: &'a str,
    rows: Vec<MarketRowView<'a>>,
}

/// View model for one market row (with computed fields).
struct MarketRowView<'a> {
    name: &'a str,
    probability: f64,
    tier: &'static str,
    hot: bool,
    width: f64,
    explanation: &'a str,
}

impl<'a> MarketRowView<'a> {
    fn from_item(item: &'a PredictionItem) -> Self {
        Self {
            name: &item.market_name,
            probability: item.probability,
            tier: ProbabilityTier::from_probability(item.probability).css_class(),
            hot: is_hot_pick(item.probability),
            width: bar_width(item.probability),
            explanation: &item.explanation,
        }
    }
}

impl<'a> CategoryView<'a> {
    fn from_category(category: &'a CategoryData) -> Self {
        Self {
            name: &category.category_name,
            rows: category
                .items
                .iter()
                .map(MarketRowView::from_item)
                .collect(),
        }
    }
}

impl<'a> SuccessTemplate<'a> {
    fn new(analysis: &'a MatchAnalysisResponse, model: &'a str) -> Self {
        let info = &analysis.match_info;
        Self {
            home_team: &info.home_team,
            away_team: &info.away_team,
            summary: &info.summary,
            confidence: &info.prediction_confidence,
            confidence_width: confidence_width(&info.prediction_confidence),
            // Model order is kept for categories and items.
            categories: analysis
                .categories
                .iter()
                .map(CategoryView::from_category)
                .collect(),
            model,
        }
    }
}

// ============================================================
// RENDERING
// ============================================================

/// Render the `#view` region for the current session state.
pub fn render_view(snapshot: &SessionSnapshot, model: &str) -> askama::Result<String> {
    let body = match &snapshot.state {
        AnalyticsState::Idle => IdleTemplate.render()?,
        AnalyticsState::Loading => LoadingTemplate {
            message: snapshot.loading_message.unwrap_or_default(),
        }
        .render()?,
        AnalyticsState::Error(message) => ErrorTemplate { message }.render()?,
        AnalyticsState::Success(analysis) => SuccessTemplate::new(analysis, model).render()?,
    };
    ViewTemplate {
        state: snapshot.state.label(),
        body,
    }
    .render()
}
