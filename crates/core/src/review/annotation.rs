//! Per-ply analysis results

use serde::Serialize;
use shakmaty::{Color, Square};

use super::classify::{classify, Classification};
use crate::engine::{mover_pov, NormalizedEval};
use crate::game::moves::{uci_squares, PlyMove, ReplayStep};

/// Analysis of a single ply. Scores are White-POV and mate-saturated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub ply: usize,
    #[serde(rename = "move")]
    pub mv: PlyMove,
    pub fen_before: String,
    pub fen_after: String,
    pub eval_before: i32,
    pub eval_after: i32,
    /// Oracle's best move in the position after this ply
    pub best_move: Option<String>,
    /// Moves to mate after this ply, positive = White mates
    pub mate_in: Option<i32>,
    pub classification: Classification,
}

impl Annotation {
    /// Builds the annotation for one replay step and classifies it.
    pub fn new(step: &ReplayStep<'_>, eval_before: i32, after: NormalizedEval, best_move: Option<String>) -> Self {
        Self {
            ply: step.ply,
            mv: step.mv.clone(),
            fen_before: step.fen_before.clone(),
            fen_after: step.fen_after.clone(),
            eval_before,
            eval_after: after.score,
            best_move,
            mate_in: after.mate_in,
            classification: classify(eval_before, after.score, step.mv.color),
        }
    }

    pub fn mover(&self) -> Color {
        self.mv.color
    }

    /// Full move number as printed in PGN
    pub fn move_number(&self) -> usize {
        self.ply / 2 + 1
    }

    /// Evaluation change caused by this ply, White-POV
    pub fn swing(&self) -> i32 {
        self.eval_after - self.eval_before
    }

    /// Centipawns the mover gave up; negative when the move gained
    pub fn cp_loss(&self) -> i32 {
        mover_pov(self.eval_before, self.mover()) - mover_pov(self.eval_after, self.mover())
    }

    pub fn evaluation(&self) -> NormalizedEval {
        NormalizedEval {
            score: self.eval_after,
            mate_in: self.mate_in,
        }
    }

    /// Arrow endpoints for the best-move indicator
    pub fn best_move_squares(&self) -> Option<(Square, Square)> {
        self.best_move.as_deref().and_then(uci_squares)
    }

    /// SAN with move number and quality glyph, e.g. "12... Qxb2??"
    pub fn notation(&self) -> String {
        let dots = if self.mover() == Color::White { "." } else { "..." };
        format!(
            "{}{} {}{}",
            self.move_number(),
            dots,
            self.mv.san,
            self.classification.glyph()
        )
    }

    pub fn description(&self) -> String {
        match self.best_move.as_deref() {
            Some(best) => format!(
                "{}: {} ({} cp), engine line continues {}",
                self.notation(),
                self.classification.display_name(),
                -self.cp_loss(),
                best
            ),
            None => format!(
                "{}: {} ({} cp)",
                self.notation(),
                self.classification.display_name(),
                -self.cp_loss()
            ),
        }
    }
}
