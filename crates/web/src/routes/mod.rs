pub mod analysis;
pub mod board;
pub mod games;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use game_review_core::{GameRecordProvider, ReviewController};

pub struct AppState {
    pub controller: ReviewController,
    pub games: Arc<dyn GameRecordProvider>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Game selection
        .route("/games/pgn", post(games::select_pgn))
        .route("/games/:id/select", post(games::select_game))
        // Analysis
        .route("/analysis", post(analysis::start_analysis))
        .route("/analysis/progress", get(analysis::progress))
        .route("/session", get(analysis::session))
        // Board
        .route("/ply", get(board::current_ply))
        .route("/ply/first", post(board::first))
        .route("/ply/previous", post(board::previous))
        .route("/ply/next", post(board::next))
        .route("/ply/last", post(board::last))
        .route("/ply/:ply", put(board::go_to))
        .route("/control", get(board::control))
        .route("/attempt", post(board::attempt))
        .with_state(state)
}

pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
pub(crate) fn test_state() -> Arc<AppState> {
    use game_review_core::{AnalysisConfig, HttpOracle, OracleConfig, RestGameClient};

    // nothing listens on the discard port
    let oracle = HttpOracle::new(OracleConfig::new("http://127.0.0.1:9/evaluate")).unwrap();
    let games = RestGameClient::new("http://127.0.0.1:9").unwrap();

    Arc::new(AppState {
        controller: ReviewController::new(Arc::new(oracle), AnalysisConfig::default()),
        games: Arc::new(games),
    })
}
