//! Error types for game-review-core
//!
//! These only surface at ingestion boundaries (fetching a game record,
//! parsing PGN or FEN). The analysis core absorbs its own failures into
//! sentinel values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("Illegal move '{san}' at ply {ply}")]
    IllegalMove { ply: usize, san: String },

    #[error("Invalid FEN: {0}")]
    Fen(String),

    #[error("Invalid square: {0}")]
    Square(String),
}

pub type Result<T> = std::result::Result<T, Error>;
