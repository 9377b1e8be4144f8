//! REST client for the platform's game endpoints

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::types::GameRecord;
use super::GameRecordProvider;
use crate::error::{Error, Result};

pub struct RestGameClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestGameClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref token) = self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    fn game_url(&self, game_id: &str) -> String {
        format!("{}/games/{}", self.base_url, game_id)
    }
}

#[async_trait]
impl GameRecordProvider for RestGameClient {
    /// Fetch one finished game
    async fn fetch_game(&self, game_id: &str) -> Result<GameRecord> {
        let response = self
            .client
            .get(self.game_url(game_id))
            .headers(self.headers())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::GameNotFound(game_id.to_string()));
        }
        if !status.is_success() {
            return Err(Error::Backend(format!(
                "{} - {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let text = response.text().await?;
        let record: GameRecord = serde_json::from_str(&text)?;
        tracing::debug!(game_id, "fetched game record");
        Ok(record)
    }
}
