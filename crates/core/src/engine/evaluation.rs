//! Engine scores and the sign conventions between them
//!
//! Three points of view exist: the oracle's (side to move, or White for some
//! services), White's (what annotations store) and the mover's (what the
//! classifier compares). Every conversion goes through [`to_white_pov`] or
//! [`mover_pov`].

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fmt;

use crate::config::ScorePerspective;

/// Raw oracle answer for one position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineEvaluation {
    pub centipawns: i32,
    /// Moves to mate; positive favors the side the oracle scores for
    pub mate_in: Option<i32>,
    /// Best move in UCI notation
    pub best_move: Option<String>,
}

impl EngineEvaluation {
    /// Fallback used whenever the oracle cannot answer
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn centipawns(cp: i32) -> Self {
        Self {
            centipawns: cp,
            ..Self::default()
        }
    }

    pub fn mate(moves: i32) -> Self {
        Self {
            mate_in: Some(moves),
            ..Self::default()
        }
    }

    pub fn with_best_move(mut self, best_move: impl Into<String>) -> Self {
        self.best_move = Some(best_move.into());
        self
    }

    /// Converts to White's point of view, saturating mates to `mate_score`.
    ///
    /// `side_to_move` is the side to move in the evaluated position.
    pub fn normalized(
        &self,
        side_to_move: Color,
        perspective: ScorePerspective,
        mate_score: i32,
    ) -> NormalizedEval {
        match self.mate_in {
            // Mate on the board: the side to move has been mated
            Some(0) => NormalizedEval {
                score: to_white_pov(-mate_score, side_to_move, ScorePerspective::SideToMove),
                mate_in: Some(0),
            },
            Some(moves) => {
                let white_moves = to_white_pov(moves, side_to_move, perspective);
                NormalizedEval {
                    score: mate_score * white_moves.signum(),
                    mate_in: Some(white_moves),
                }
            }
            None => NormalizedEval {
                score: to_white_pov(self.centipawns, side_to_move, perspective)
                    .clamp(-mate_score, mate_score),
                mate_in: None,
            },
        }
    }
}

/// Re-expresses an oracle value in White's point of view.
pub fn to_white_pov(value: i32, side_to_move: Color, perspective: ScorePerspective) -> i32 {
    match perspective {
        ScorePerspective::White => value,
        ScorePerspective::SideToMove if side_to_move == Color::White => value,
        ScorePerspective::SideToMove => -value,
    }
}

/// Re-expresses a White-POV score as "centipawns favoring the mover".
pub fn mover_pov(white_score: i32, mover: Color) -> i32 {
    if mover == Color::White {
        white_score
    } else {
        -white_score
    }
}

/// A White-POV, mate-saturated score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEval {
    /// Centipawns, positive = White better
    pub score: i32,
    /// Moves to mate, positive = White mates; `0` means mate on the board
    pub mate_in: Option<i32>,
}

impl NormalizedEval {
    pub fn is_white_winning(&self) -> bool {
        self.score > 100
    }

    pub fn is_black_winning(&self) -> bool {
        self.score < -100
    }

    /// Score in pawns, for display
    pub fn as_pawns(&self) -> f32 {
        self.score as f32 / 100.0
    }
}

impl fmt::Display for NormalizedEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mate_in {
            Some(0) => write!(f, "#"),
            Some(moves) => write!(f, "M{}", moves),
            None => {
                let score = self.as_pawns();
                if score >= 0.0 {
                    write!(f, "+{:.2}", score)
                } else {
                    write!(f, "{:.2}", score)
                }
            }
        }
    }
}
