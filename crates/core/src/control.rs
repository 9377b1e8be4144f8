//! Board-control heatmap: who attacks each square, and by how much

use serde::Serialize;
use shakmaty::{Chess, Color, Position, Square};

use crate::error::Result;
use crate::game::moves::{color_char, position_from_fen};

/// Signed attacker differential for all 64 squares.
///
/// Positive values mean White attacks the square more often than Black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMap {
    differentials: [i8; 64],
    max_intensity: u8,
}

/// Display shade for one square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlShade {
    #[serde(serialize_with = "crate::game::moves::serialize_color")]
    pub side: Color,
    /// 1..=max_intensity
    pub level: u8,
    pub rgba: [u8; 4],
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlCell {
    #[serde(serialize_with = "crate::game::moves::serialize_square")]
    pub square: Square,
    pub differential: i8,
    pub shade: Option<ControlShade>,
}

const WHITE_RAMP: [u8; 3] = [66, 133, 244];
const BLACK_RAMP: [u8; 3] = [219, 68, 55];

impl ControlMap {
    /// Counts attackers per side on every square of `position`.
    pub fn compute(position: &Chess, max_intensity: u8) -> Self {
        let board = position.board();
        let occupied = board.occupied();
        let mut differentials = [0i8; 64];

        for square in Square::ALL {
            let white = board.attacks_to(square, Color::White, occupied).count() as i32;
            let black = board.attacks_to(square, Color::Black, occupied).count() as i32;
            differentials[usize::from(square)] = (white - black) as i8;
        }

        Self {
            differentials,
            max_intensity: max_intensity.clamp(1, i8::MAX as u8),
        }
    }

    pub fn from_fen(fen: &str, max_intensity: u8) -> Result<Self> {
        Ok(Self::compute(&position_from_fen(fen)?, max_intensity))
    }

    /// Raw attackers(White) - attackers(Black)
    pub fn differential(&self, square: Square) -> i8 {
        self.differentials[usize::from(square)]
    }

    /// Differential with its magnitude clipped to the maximum intensity
    pub fn intensity(&self, square: Square) -> i8 {
        let max = self.max_intensity as i8;
        self.differential(square).clamp(-max, max)
    }

    /// Color ramp entry for a square, `None` when control is balanced.
    pub fn shade(&self, square: Square) -> Option<ControlShade> {
        let intensity = self.intensity(square);
        if intensity == 0 {
            return None;
        }

        let (side, ramp) = if intensity > 0 {
            (Color::White, WHITE_RAMP)
        } else {
            (Color::Black, BLACK_RAMP)
        };
        let level = intensity.unsigned_abs();
        let alpha = (u32::from(level) * 200 / u32::from(self.max_intensity)) as u8;

        Some(ControlShade {
            side,
            level,
            rgba: [ramp[0], ramp[1], ramp[2], alpha],
        })
    }

    pub fn cells(&self) -> Vec<ControlCell> {
        Square::ALL
            .iter()
            .map(|&square| ControlCell {
                square,
                differential: self.differential(square),
                shade: self.shade(square),
            })
            .collect()
    }

    /// Squares one side controls outright
    pub fn controlled_by(&self, side: Color) -> usize {
        self.differentials
            .iter()
            .filter(|&&d| if side == Color::White { d > 0 } else { d < 0 })
            .count()
    }
}

impl std::fmt::Display for ControlMap {
    /// Rank 8 first, one signed digit per square
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            let row: Vec<String> = (0..8)
                .map(|file| format!("{:+}", self.intensity(Square::new(rank * 8 + file))))
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        write!(
            f,
            "{} {} / {} {}",
            color_char(Color::White),
            self.controlled_by(Color::White),
            color_char(Color::Black),
            self.controlled_by(Color::Black)
        )
    }
}
