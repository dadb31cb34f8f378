//! Natural-language instruction sent to the model.

/// Probability (in percent) above which an item must carry a one-sentence justification.
pub const HOT_PICK_JUSTIFY_ABOVE: u32 = 70;

/// Markets the model must price, grouped by category, in display order.
pub const MARKET_CATALOGUE: &[(&str, &[&str])] = &[
    (
        "Match Outcomes",
        &[
            "Home Win",
            "Away Win",
            "Draw",
            "Double Chance (Home/Away)",
            "Draw in one half",
            "Win by margin (1,2,3,4+)",
        ],
    ),
    (
        "Goals & BTS",
        &[
            "Total Goals (U/O)",
            "Handicap",
            "Goal count",
            "BTS (Yes/No)",
            "Winner+BTS",
            "Winner+U/O",
            "1st Goal Team",
            "1st Goal by Kick",
            "Goal in both halves",
            "Goals in a row (2,3,4,5)",
            "One-sided field scoring",
        ],
    ),
    (
        "Special Events",
        &[
            "Goal outside box",
            "Header goal",
            "Goal after corner (10s)",
            "Substitute to score",
            "Injury time goal",
            "Double Chance + BTS",
        ],
    ),
    (
        "Discipline & Fouls",
        &[
            "Red Card",
            "Penalty or Red Card",
            "Penalty Awarded",
            "No Penalty/No Red Card",
            "Yellow Card (U/O)",
            "Both team 1+ card",
            "Foul winner",
        ],
    ),
    (
        "Set Pieces & Stats",
        &[
            "Corner Winner",
            "Total Corners (U/O)",
            "Last Corner Time",
            "Race to 7/9 Corners",
            "Shots on Target (U/O & Winner)",
            "Offside (U/O)",
            "Goal Kicks Winner",
            "More Saves",
            "More Shots towards bar",
        ],
    ),
    (
        "VAR & Misc",
        &[
            "VAR Checked",
            "Medical team entry (2+ times)",
            "Ball in net but no goal",
        ],
    ),
];

/// Build the analysis instruction for one fixture.
///
/// `language` is the vernacular the explanations and summary must be written
/// in; market names always stay in English.
pub fn build_prompt(home_team: &str, away_team: &str, language: &str) -> String {
    let catalogue = MARKET_CATALOGUE
        .iter()
        .map(|(category, markets)| format!("- {}: {}.", category, markets.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze the football match between {home} and {away}.
Follow these strict rules:
1. Scan last 5 H2H and last 5 individual matches.
2. Analyze League averages for niche stats like VAR, Medical Team, and Goal Kicks.
3. Factor in Referee styles for Red/Yellow cards and Penalties.
4. Provide probabilities for EVERY SINGLE mandatory option listed in the request.
5. Explanations MUST be in {lang}. Market Names MUST be in English.
6. If probability is >{hot}%, explain why in exactly one sentence in {lang}.

Categories and Items to include:
{catalogue}"#,
        home = home_team,
        away = away_team,
        lang = language,
        hot = HOT_PICK_JUSTIFY_ABOVE,
        catalogue = catalogue,
    )
}
