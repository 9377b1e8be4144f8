//! Remote position-evaluation service
//!
//! Sends `{fen, depth}` and expects `{success, evaluation?, mate?, bestmove?}`.
//! Any failure degrades to [`EngineEvaluation::neutral`]; a single bad
//! position must never stop a game review.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::evaluation::EngineEvaluation;
use crate::config::{OracleConfig, ScorePerspective};
use crate::error::{Error, Result};
use crate::game::moves::uci_squares;

/// Anything that can score a position.
#[async_trait]
pub trait EvaluationOracle: Send + Sync {
    /// Scores `fen`. Infallible by contract: failures return the neutral
    /// evaluation.
    async fn evaluate(&self, fen: &str, depth: u8) -> EngineEvaluation;

    /// Whose point of view the returned scores use
    fn perspective(&self) -> ScorePerspective {
        ScorePerspective::SideToMove
    }
}

#[derive(Debug, Serialize)]
struct OracleRequest<'a> {
    fen: &'a str,
    depth: u8,
}

#[derive(Debug, Deserialize)]
struct OracleResponse {
    success: bool,
    #[serde(default)]
    evaluation: Option<f64>,
    #[serde(default)]
    mate: Option<i32>,
    #[serde(default)]
    bestmove: Option<String>,
}

/// HTTP client for the evaluation service
pub struct HttpOracle {
    client: Client,
    config: OracleConfig,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn request(&self, fen: &str, depth: u8) -> Result<EngineEvaluation> {
        let response = self
            .client
            .post(&self.config.url)
            .json(&OracleRequest { fen, depth })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!("oracle returned {}", response.status())));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

#[async_trait]
impl EvaluationOracle for HttpOracle {
    async fn evaluate(&self, fen: &str, depth: u8) -> EngineEvaluation {
        match self.request(fen, depth).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                tracing::warn!(fen, depth, error = %e, "oracle call failed, using neutral evaluation");
                EngineEvaluation::neutral()
            }
        }
    }

    fn perspective(&self) -> ScorePerspective {
        self.config.perspective
    }
}

/// Decodes an oracle body into an evaluation.
pub fn parse_response(body: &str) -> Result<EngineEvaluation> {
    let response: OracleResponse = serde_json::from_str(body)?;

    if !response.success {
        return Err(Error::Backend("oracle reported failure".to_string()));
    }

    let (centipawns, mate_in) = match (response.mate, response.evaluation) {
        (Some(mate), _) => (0, Some(mate)),
        (None, Some(cp)) if cp.is_finite() => (cp.round() as i32, None),
        _ => return Err(Error::Backend("oracle response has no score".to_string())),
    };

    Ok(EngineEvaluation {
        centipawns,
        mate_in,
        best_move: response.bestmove.as_deref().and_then(extract_uci),
    })
}

/// Accepts "e2e4" as well as full "bestmove e2e4 ponder e7e5" lines.
fn extract_uci(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| uci_squares(token).is_some())
        .map(String::from)
}
