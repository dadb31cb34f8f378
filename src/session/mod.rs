//! The single analysis session behind the page.
//!
//! Holds the [`AnalyticsState`] machine: `Idle → Loading → Success | Error`,
//! with `Success | Error → Loading` on every new submission. There is at most
//! one request in flight; a submission while loading is ignored, as is one
//! with a blank team name. The loading ticker is owned by the session state
//! and dropped on every exit from `Loading`.

pub mod state;
pub mod ticker;

pub use state::{AnalyticsState, ANALYSIS_FAILED_MESSAGE};
pub use ticker::{LoadingTicker, DEFAULT_ROTATE_INTERVAL};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::analysis::{require_teams, AnalysisProvider};

/// Why a submission did not start a request. Both are silent no-ops for the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("both team names are required")]
    IncompleteInput,
    #[error("an analysis is already in flight")]
    InFlight,
}

/// Point-in-time view of the session for rendering and the JSON API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub state: AnalyticsState,
    /// Current rotating message, only while loading
    pub loading_message: Option<&'static str>,
    pub loading_step: Option<usize>,
    /// Whether the rotation task is alive
    pub rotating: bool,
    /// Time of the last state transition
    pub updated_at: DateTime<Utc>,
}

struct SessionInner {
    state: AnalyticsState,
    ticker: Option<LoadingTicker>,
    updated_at: DateTime<Utc>,
}

impl SessionInner {
    fn settle(&mut self, state: AnalyticsState) {
        // Releases the rotation before the new state becomes visible.
        self.ticker = None;
        self.state = state;
        self.updated_at = Utc::now();
    }
}

/// Shared handle on the session; clones observe the same state.
///
/// In-flight requests only hold a weak reference, so dropping the last handle
/// tears the session down (ticker included) even mid-request.
#[derive(Clone)]
pub struct AnalysisSession {
    inner: Arc<RwLock<SessionInner>>,
    provider: Arc<dyn AnalysisProvider>,
    rotate_interval: Duration,
}

impl AnalysisSession {
    pub fn new(provider: Arc<dyn AnalysisProvider>, rotate_interval: Duration) -> Self {
        AnalysisSession {
            inner: Arc::new(RwLock::new(SessionInner {
                state: AnalyticsState::Idle,
                ticker: None,
                updated_at: Utc::now(),
            })),
            provider,
            rotate_interval,
        }
    }

    /// Start an analysis for the fixture.
    ///
    /// On success the state is already `Loading` when this returns and any
    /// previous result or error is gone. The returned handle resolves once the
    /// session has settled to `Success` or `Error`; dropping it detaches the
    /// request, it is never cancelled.
    pub async fn submit(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<JoinHandle<()>, SubmitRejected> {
        let (home, away) =
            require_teams(home_team, away_team).map_err(|_| SubmitRejected::IncompleteInput)?;
        let (home, away) = (home.to_string(), away.to_string());

        {
            let mut inner = self.inner.write().await;
            if inner.state.is_loading() {
                return Err(SubmitRejected::InFlight);
            }
            inner.state = AnalyticsState::Loading;
            inner.ticker = Some(LoadingTicker::start(self.rotate_interval));
            inner.updated_at = Utc::now();
        }
        info!("Analysis submitted: {} vs {}", home, away);

        let session = Arc::downgrade(&self.inner);
        let provider = Arc::clone(&self.provider);
        Ok(tokio::spawn(async move {
            let outcome = provider.request_analysis(&home, &away).await;

            let Some(inner) = session.upgrade() else {
                debug!("Session gone before '{} vs {}' resolved", home, away);
                return;
            };
            let mut inner = inner.write().await;
            match outcome {
                Ok(analysis) => {
                    info!(
                        "Analysis ready: {} vs {} ({} categories)",
                        home,
                        away,
                        analysis.categories.len()
                    );
                    inner.settle(AnalyticsState::Success(Box::new(analysis)));
                }
                Err(e) => {
                    error!("Analysis for '{} vs {}' failed: {}", home, away, e);
                    inner.settle(AnalyticsState::Error(ANALYSIS_FAILED_MESSAGE.to_string()));
                }
            }
        }))
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read().await;
        let ticker = inner.ticker.as_ref();
        SessionSnapshot {
            state: inner.state.clone(),
            loading_message: ticker.map(LoadingTicker::message),
            loading_step: ticker.map(LoadingTicker::step),
            rotating: ticker.map(LoadingTicker::is_running).unwrap_or(false),
            updated_at: inner.updated_at,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::ticker::LOADING_MESSAGES;
    use super::*;
    use crate::analysis::schema::tests::sample_response;
    use crate::analysis::{AnalysisError, MatchAnalysisResponse};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    /// Provider returning queued outcomes, each released by one gate permit.
    pub(crate) struct ScriptedProvider {
        pub(crate) calls: AtomicUsize,
        gate: Semaphore,
        outcomes: Mutex<VecDeque<Result<MatchAnalysisResponse, AnalysisError>>>,
    }

    impl ScriptedProvider {
        pub(crate) fn new(
            outcomes: Vec<Result<MatchAnalysisResponse, AnalysisError>>,
            open: bool,
        ) -> Arc<Self> {
            let permits = if open { outcomes.len() } else { 0 };
            Arc::new(ScriptedProvider {
                calls: AtomicUsize::new(0),
                gate: Semaphore::new(permits),
                outcomes: Mutex::new(outcomes.into()),
            })
        }

        pub(crate) fn release(&self) {
            self.gate.add_permits(1);
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn request_analysis(
            &self,
            _home_team: &str,
            _away_team: &str,
        ) -> Result<MatchAnalysisResponse, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.acquire().await.expect("gate closed").forget();
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AnalysisError::EmptyResponse))
        }
    }

    fn malformed() -> AnalysisError {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        AnalysisError::MalformedPayload(err)
    }

    fn session_with(provider: Arc<ScriptedProvider>) -> AnalysisSession {
        AnalysisSession::new(provider, DEFAULT_ROTATE_INTERVAL)
    }

    async fn advance(period: Duration) {
        tokio::time::advance(period).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let session = session_with(ScriptedProvider::new(vec![], true));
        let snap = session.snapshot().await;
        assert_eq!(snap.state, AnalyticsState::Idle);
        assert!(snap.loading_message.is_none());
        assert!(!snap.rotating);
    }

    #[tokio::test]
    async fn test_incomplete_input_is_a_no_op() {
        let provider = ScriptedProvider::new(vec![Ok(sample_response())], true);
        let session = session_with(provider.clone());

        let incomplete = [
            ("", "Liverpool"),
            ("Manchester City", ""),
            ("  ", "\t"),
            ("", ""),
        ];
        for (home, away) in incomplete {
            let res = session.submit(home, away).await;
            assert_eq!(res.unwrap_err(), SubmitRejected::IncompleteInput);
        }
        tokio::task::yield_now().await;
        assert_eq!(session.snapshot().await.state, AnalyticsState::Idle);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_enters_loading_once() {
        let provider = ScriptedProvider::new(vec![Ok(sample_response())], false);
        let session = session_with(provider.clone());

        let handle = session
            .submit("Manchester City", "Liverpool")
            .await
            .unwrap();
        let snap = session.snapshot().await;
        assert_eq!(snap.state, AnalyticsState::Loading);
        assert_eq!(snap.loading_message, Some(LOADING_MESSAGES[0]));
        assert!(snap.rotating);

        // The submit control is disabled while loading; a second submission is ignored.
        assert_eq!(
            session.submit("Arsenal", "Chelsea").await.unwrap_err(),
            SubmitRejected::InFlight
        );

        provider.release();
        handle.await.unwrap();
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_serializes_camel_case() {
        let provider = ScriptedProvider::new(vec![Ok(sample_response())], false);
        let session = session_with(provider.clone());
        let handle = session.submit("A", "B").await.unwrap();

        let json = serde_json::to_value(session.snapshot().await).unwrap();
        assert_eq!(json["state"], "LOADING");
        assert_eq!(json["loadingMessage"], LOADING_MESSAGES[0]);
        assert_eq!(json["loadingStep"], 0);
        assert_eq!(json["rotating"], true);
        assert!(json["updatedAt"].is_string());
        assert!(json.get("loading_message").is_none());
        assert!(json.get("updated_at").is_none());

        provider.release();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_success_displays_payload_exactly() {
        let provider = ScriptedProvider::new(vec![Ok(sample_response())], true);
        let session = session_with(provider);

        session
            .submit("Manchester City", "Liverpool")
            .await
            .unwrap()
            .await
            .unwrap();

        let snap = session.snapshot().await;
        assert_eq!(
            snap.state,
            AnalyticsState::Success(Box::new(sample_response()))
        );
        assert!(snap.loading_message.is_none());
        assert!(!snap.rotating);
    }

    #[tokio::test]
    async fn test_failures_show_fixed_message() {
        let provider = ScriptedProvider::new(
            vec![Err(AnalysisError::EmptyResponse), Err(malformed())],
            true,
        );
        let session = session_with(provider);

        for _ in 0..2 {
            session
                .submit("Manchester City", "Liverpool")
                .await
                .unwrap()
                .await
                .unwrap();
            let snap = session.snapshot().await;
            assert_eq!(
                snap.state,
                AnalyticsState::Error(ANALYSIS_FAILED_MESSAGE.to_string())
            );
            assert!(!snap.rotating);
        }
    }

    #[tokio::test]
    async fn test_resubmit_discards_previous_result() {
        let provider = ScriptedProvider::new(
            vec![Ok(sample_response()), Ok(sample_response())],
            false,
        );
        let session = session_with(provider.clone());

        provider.release();
        session
            .submit("Manchester City", "Liverpool")
            .await
            .unwrap()
            .await
            .unwrap();
        let state = session.snapshot().await.state;
        assert!(matches!(state, AnalyticsState::Success(_)));

        let handle = session.submit("Arsenal", "Chelsea").await.unwrap();
        assert_eq!(session.snapshot().await.state, AnalyticsState::Loading);

        provider.release();
        handle.await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_resubmit_after_error_discards_message() {
        let provider = ScriptedProvider::new(
            vec![Err(AnalysisError::EmptyResponse), Ok(sample_response())],
            false,
        );
        let session = session_with(provider.clone());

        provider.release();
        session.submit("A", "B").await.unwrap().await.unwrap();
        let state = session.snapshot().await.state;
        assert!(matches!(state, AnalyticsState::Error(_)));

        let handle = session.submit("A", "B").await.unwrap();
        assert_eq!(session.snapshot().await.state, AnalyticsState::Loading);

        provider.release();
        handle.await.unwrap();
        let state = session.snapshot().await.state;
        assert!(matches!(state, AnalyticsState::Success(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_message_rotates_then_stops() {
        let provider = ScriptedProvider::new(vec![Ok(sample_response())], false);
        let session = session_with(provider.clone());

        let handle = session
            .submit("Manchester City", "Liverpool")
            .await
            .unwrap();
        tokio::task::yield_now().await;

        let mut steps = Vec::new();
        for _ in 0..6 {
            steps.push(session.snapshot().await.loading_step.unwrap());
            advance(DEFAULT_ROTATE_INTERVAL).await;
        }
        assert_eq!(steps, vec![0, 1, 2, 3, 4, 0]);

        provider.release();
        handle.await.unwrap();
        let snap = session.snapshot().await;
        assert!(!snap.rotating);
        assert!(snap.loading_step.is_none());
    }

    #[tokio::test]
    async fn test_dropping_session_releases_state_mid_request() {
        let provider = ScriptedProvider::new(vec![Ok(sample_response())], false);
        let session = session_with(provider.clone());

        let handle = session
            .submit("Manchester City", "Liverpool")
            .await
            .unwrap();
        let inner = Arc::downgrade(&session.inner);
        drop(session);
        assert!(inner.upgrade().is_none());

        // The request still runs to completion and finds nothing to update.
        provider.release();
        handle.await.unwrap();
        assert_eq!(provider.call_count(), 1);
    }
}
