use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use game_review_core::session::{Progress, SessionSummary};

use crate::routes::AppState;

/// POST /analysis
///
/// Starts (or restarts) analysis of the selected game and returns at once.
pub async fn start_analysis(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Progress>) {
    let handle = state.controller.start_analysis();
    tokio::spawn(async move {
        if let Err(e) = handle.await {
            tracing::error!("Analysis task failed: {e}");
        }
    });

    let progress = *state.controller.subscribe().borrow();
    (StatusCode::ACCEPTED, Json(progress))
}

/// GET /analysis/progress
pub async fn progress(State(state): State<Arc<AppState>>) -> Json<Progress> {
    let progress = *state.controller.subscribe().borrow();
    Json(progress)
}

/// GET /session
pub async fn session(State(state): State<Arc<AppState>>) -> Json<SessionSummary> {
    Json(state.controller.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_state;
    use game_review_core::session::PipelineState;

    #[tokio::test]
    async fn test_empty_session_analysis() {
        let state = test_state();
        let (status, Json(started)) = start_analysis(State(state.clone())).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(started.total, 0);

        let mut rx = state.controller.subscribe();
        while rx.borrow().state != PipelineState::Completed {
            rx.changed().await.unwrap();
        }

        let Json(summary) = session(State(state)).await;
        assert_eq!(summary.state, PipelineState::Completed);
        assert_eq!(summary.accuracy.white, 100);
    }
}
