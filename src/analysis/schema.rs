//! Shapes exchanged with the analysis model.
//!
//! The same structure is expressed twice: as serde types used to parse the
//! model's reply, and as the `responseSchema` document sent along with the
//! request so the model is constrained to produce exactly that shape.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Headline information about the analysed fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub home_team: String,
    pub away_team: String,
    /// Display text such as "78%"; not a probability over outcomes
    pub prediction_confidence: String,
    pub summary: String,
}

/// One market the model assigned a probability to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionItem {
    pub market_name: String,
    /// Expected 0–100, passed through as returned
    pub probability: f64,
    pub explanation: String,
}

/// A named group of markets, e.g. "Discipline & Fouls".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryData {
    pub category_name: String,
    pub items: Vec<PredictionItem>,
}

/// Full result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysisResponse {
    pub match_info: MatchInfo,
    pub categories: Vec<CategoryData>,
}

impl MatchAnalysisResponse {
    pub fn market_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Build the Gemini `responseSchema` for [`MatchAnalysisResponse`].
///
/// Every object level carries a `required` list naming all of its properties.
pub fn response_schema(language: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "matchInfo": {
                "type": "OBJECT",
                "properties": {
                    "homeTeam": { "type": "STRING" },
                    "awayTeam": { "type": "STRING" },
                    "predictionConfidence": { "type": "STRING" },
                    "summary": {
                        "type": "STRING",
                        "description": format!("{} summary of the match outlook", language),
                    },
                },
                "required": ["homeTeam", "awayTeam", "predictionConfidence", "summary"],
            },
            "categories": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "categoryName": { "type": "STRING" },
                        "items": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "marketName": { "type": "STRING" },
                                    "probability": { "type": "NUMBER" },
                                    "explanation": { "type": "STRING" },
                                },
                                "required": ["marketName", "probability", "explanation"],
                            },
                        },
                    },
                    "required": ["categoryName", "items"],
                },
            },
        },
        "required": ["matchInfo", "categories"],
    })
}
