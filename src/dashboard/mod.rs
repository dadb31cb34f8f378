use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

use crate::session::AnalysisSession;

pub mod render;

#[derive(Clone)]
pub struct AppState {
    pub session: AnalysisSession,
    /// Model name shown in the results footer
    pub model: String,
}

/// Body of `POST /api/analyze`. Missing names count as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/view", get(view_handler))
        .route("/api/state", get(state_handler))
        .route("/api/analyze", post(analyze_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the page shell with the current view already rendered in place.
async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.session.snapshot().await;
    let page = render::render_view(&snapshot, &state.model)
        .and_then(|view| render::PageTemplate { view }.render());
    html_or_error(page)
}

/// GET /view – the `#view` fragment, polled by the page while loading.
async fn view_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.session.snapshot().await;
    html_or_error(render::render_view(&snapshot, &state.model))
}

fn html_or_error(rendered: askama::Result<String>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Template error: {}", e)),
            )
                .into_response()
        }
    }
}

/// GET /api/state
async fn state_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session.snapshot().await)
}

/// POST /api/analyze – 202 when a request started, 204 when the submission was ignored.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> StatusCode {
    match state.session.submit(&req.home_team, &req.away_team).await {
        Ok(_) => StatusCode::ACCEPTED,
        Err(e) => {
            debug!("Submission ignored: {}", e);
            StatusCode::NO_CONTENT
        }
    }
}
