use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role};
use std::sync::Arc;

use game_review_core::control::ControlCell;
use game_review_core::game::moves::parse_square;
use game_review_core::session::{PlyView, PredictionOutcome, PredictionScore};

use crate::error::AppError;
use crate::routes::AppState;

// ============================================================================
// NAVIGATION
// ============================================================================

/// GET /ply
pub async fn current_ply(State(state): State<Arc<AppState>>) -> Json<PlyView> {
    Json(state.controller.current_view())
}

/// PUT /ply/:ply
pub async fn go_to(State(state): State<Arc<AppState>>, Path(ply): Path<isize>) -> Json<PlyView> {
    Json(state.controller.go_to(ply))
}

pub async fn first(State(state): State<Arc<AppState>>) -> Json<PlyView> {
    Json(state.controller.first())
}

pub async fn previous(State(state): State<Arc<AppState>>) -> Json<PlyView> {
    Json(state.controller.previous())
}

pub async fn next(State(state): State<Arc<AppState>>) -> Json<PlyView> {
    Json(state.controller.next())
}

pub async fn last(State(state): State<Arc<AppState>>) -> Json<PlyView> {
    Json(state.controller.last())
}

// ============================================================================
// BOARD CONTROL
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    pub ply: isize,
    pub white_squares: usize,
    pub black_squares: usize,
    pub cells: Vec<ControlCell>,
}

/// GET /control
pub async fn control(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    let ply = state.controller.current_view().ply;
    let map = state.controller.control_map();

    Json(ControlResponse {
        ply,
        white_squares: map.controlled_by(Color::White),
        black_squares: map.controlled_by(Color::Black),
        cells: map.cells(),
    })
}

// ============================================================================
// PREDICTION MODE
// ============================================================================

#[derive(Deserialize)]
pub struct AttemptRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub promotion: Option<String>,
}

#[derive(Serialize)]
pub struct AttemptResponse {
    /// `None` once the final move has been reached
    pub outcome: Option<PredictionOutcome>,
    pub score: PredictionScore,
    pub accuracy: f32,
}

/// POST /attempt
pub async fn attempt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AttemptRequest>,
) -> Result<Json<AttemptResponse>, AppError> {
    let from = parse_square(&req.from)?;
    let to = parse_square(&req.to)?;
    let promotion = match req.promotion.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => Some(parse_role(text)?),
    };

    let outcome = state.controller.attempt_move(from, to, promotion);
    let score = state.controller.session().prediction;

    Ok(Json(AttemptResponse {
        outcome,
        score,
        accuracy: score.accuracy(),
    }))
}

fn parse_role(text: &str) -> Result<Role, AppError> {
    let mut chars = text.chars();
    match (chars.next().and_then(Role::from_char), chars.next()) {
        (Some(role), None) if role != Role::Pawn && role != Role::King => Ok(role),
        _ => Err(AppError::BadRequest(format!("invalid promotion piece: {text}"))),
    }
}
