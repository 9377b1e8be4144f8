use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shakmaty::Color;
use std::sync::Arc;

use game_review_core::game::parse_pgn;
use game_review_core::session::SessionSummary;

use crate::error::AppError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct SelectQuery {
    pub viewer: Option<String>,
}

#[derive(Deserialize)]
pub struct PgnQuery {
    pub orientation: Option<String>,
}

/// POST /games/:id/select
pub async fn select_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Query(q): Query<SelectQuery>,
) -> Result<Json<SessionSummary>, AppError> {
    let record = state.games.fetch_game(&game_id).await?;
    state.controller.select_record(&record, q.viewer.as_deref())?;
    Ok(Json(state.controller.summary()))
}

/// POST /games/pgn
pub async fn select_pgn(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PgnQuery>,
    body: String,
) -> Result<Json<SessionSummary>, AppError> {
    let orientation = match q.orientation.as_deref() {
        None | Some("white") => Color::White,
        Some("black") => Color::Black,
        Some(other) => return Err(AppError::BadRequest(format!("unknown orientation: {other}"))),
    };

    let game = parse_pgn(&body)?;
    tracing::info!(game = %game.summary(), plies = game.move_count(), "PGN submitted");
    state.controller.select_game(None, game.move_list()?, orientation);
    Ok(Json(state.controller.summary()))
}
