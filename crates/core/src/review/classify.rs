//! Move quality from evaluation deltas

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::engine::mover_pov;

/// Quality label attached to every analysed move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// >= 300 centipawn loss
    Blunder,
    /// >= 100 centipawn loss
    Mistake,
    /// >= 50 centipawn loss
    Inaccuracy,
    Best,
    /// gained at least 20 centipawns
    Good,
    /// gained at least 50 centipawns
    Brilliant,
}

impl Classification {
    pub const ALL: [Classification; 6] = [
        Classification::Blunder,
        Classification::Mistake,
        Classification::Inaccuracy,
        Classification::Best,
        Classification::Good,
        Classification::Brilliant,
    ];

    /// Maps centipawns given up by the mover to a label. First match wins.
    pub fn from_cp_loss(cp_loss: i32) -> Self {
        match cp_loss {
            l if l >= 300 => Classification::Blunder,
            l if l >= 100 => Classification::Mistake,
            l if l >= 50 => Classification::Inaccuracy,
            l if l <= -50 => Classification::Brilliant,
            l if l <= -20 => Classification::Good,
            _ => Classification::Best,
        }
    }

    /// Contribution to the accuracy score, 0..=100
    pub fn weight(&self) -> u32 {
        match self {
            Classification::Blunder => 0,
            Classification::Mistake => 30,
            Classification::Inaccuracy => 70,
            Classification::Good => 90,
            Classification::Brilliant | Classification::Best => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Blunder => "blunder",
            Classification::Mistake => "mistake",
            Classification::Inaccuracy => "inaccuracy",
            Classification::Best => "best",
            Classification::Good => "good",
            Classification::Brilliant => "brilliant",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Classification::Blunder => "Blunder",
            Classification::Mistake => "Mistake",
            Classification::Inaccuracy => "Inaccuracy",
            Classification::Best => "Best",
            Classification::Good => "Good",
            Classification::Brilliant => "Brilliant",
        }
    }

    /// Annotation glyph as printed after a SAN move
    pub fn glyph(&self) -> &'static str {
        match self {
            Classification::Blunder => "??",
            Classification::Mistake => "?",
            Classification::Inaccuracy => "?!",
            Classification::Best => "",
            Classification::Good => "!",
            Classification::Brilliant => "!!",
        }
    }
}

/// Classifies a move from White-POV scores before and after it.
///
/// Both scores must already be mate-saturated.
pub fn classify(eval_before: i32, eval_after: i32, mover: Color) -> Classification {
    let before = mover_pov(eval_before, mover);
    let after = mover_pov(eval_after, mover);
    Classification::from_cp_loss(before - after)
}
