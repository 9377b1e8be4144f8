use std::env;
use std::time::Duration;

use game_review_core::{AnalysisConfig, OracleConfig, ScorePerspective};

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub oracle_url: String,
    pub oracle_timeout_secs: u64,
    pub oracle_perspective: ScorePerspective,
    pub backend_url: String,
    pub backend_token: Option<String>,
    pub analysis_depth: u8,
    pub rate_limit_ms: u64,
    /// JSON opening book replacing the built-in one
    pub opening_book: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("REVIEW_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("REVIEW_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            oracle_url: env::var("ORACLE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080/evaluate".to_string()),
            oracle_timeout_secs: env::var("ORACLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            oracle_perspective: env::var("ORACLE_PERSPECTIVE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            backend_url: env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string()),
            backend_token: env::var("BACKEND_TOKEN").ok().filter(|t| !t.is_empty()),
            analysis_depth: env::var("ANALYSIS_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            rate_limit_ms: env::var("RATE_LIMIT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            opening_book: env::var("OPENING_BOOK").ok().filter(|p| !p.is_empty()),
        }
    }

    pub fn oracle(&self) -> OracleConfig {
        OracleConfig::new(self.oracle_url.clone())
            .timeout(Duration::from_secs(self.oracle_timeout_secs))
            .perspective(self.oracle_perspective)
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig::default()
            .depth(self.analysis_depth)
            .rate_limit(Duration::from_millis(self.rate_limit_ms))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
