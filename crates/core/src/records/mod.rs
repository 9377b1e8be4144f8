//! Game Record Provider: where finished games come from

mod client;
mod types;

pub use client::RestGameClient;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Source of finished games, keyed by the platform's game id.
#[async_trait]
pub trait GameRecordProvider: Send + Sync {
    async fn fetch_game(&self, game_id: &str) -> Result<GameRecord>;
}
