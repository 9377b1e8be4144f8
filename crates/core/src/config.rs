//! Tunables for the analysis pipeline and the oracle client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Saturating centipawn score used in place of a forced mate.
pub const DEFAULT_MATE_SCORE: i32 = 9999;

/// Evaluation swing (centipawns) that marks a turning point in the narrative.
pub const DEFAULT_TURNING_POINT_SWING: i32 = 250;

/// Knobs shared by the pipeline, the narrative and the control map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Search depth requested from the oracle
    pub depth: u8,
    /// Pause between two oracle calls
    pub rate_limit: Duration,
    /// Centipawn value substituted for "mate in N"
    pub mate_score: i32,
    /// Minimum swing for a ply to count as the turning point
    pub turning_point_swing: i32,
    /// Clipping bound for the board-control heatmap
    pub max_control_intensity: u8,
    /// A game at least this many plies long earns the "clean game" remark
    pub long_game_plies: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: 15,
            rate_limit: Duration::from_millis(100),
            mate_score: DEFAULT_MATE_SCORE,
            turning_point_swing: DEFAULT_TURNING_POINT_SWING,
            max_control_intensity: 4,
            long_game_plies: 60,
        }
    }
}

impl AnalysisConfig {
    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

/// Which side an oracle score is expressed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePerspective {
    /// Positive favors the side to move in the evaluated position
    #[default]
    SideToMove,
    /// Positive always favors White
    White,
}

impl std::str::FromStr for ScorePerspective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "side_to_move" | "stm" => Ok(ScorePerspective::SideToMove),
            "white" => Ok(ScorePerspective::White),
            other => Err(format!("unknown score perspective: {}", other)),
        }
    }
}

/// Connection settings for the remote evaluation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub url: String,
    pub timeout: Duration,
    pub perspective: ScorePerspective,
}

impl OracleConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
            perspective: ScorePerspective::default(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn perspective(mut self, perspective: ScorePerspective) -> Self {
        self.perspective = perspective;
        self
    }
}
