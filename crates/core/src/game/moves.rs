//! Validated move lists and deterministic replay

use serde::{Serialize, Serializer};
use shakmaty::{
    fen::Fen, san::SanPlus, CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role,
    Square,
};

use crate::error::{Error, Result};

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A single half-move of a replayed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlyMove {
    #[serde(serialize_with = "serialize_square")]
    pub from: Square,
    /// Destination square; the king's destination for castling
    #[serde(serialize_with = "serialize_square")]
    pub to: Square,
    pub san: String,
    #[serde(serialize_with = "serialize_color")]
    pub color: Color,
    #[serde(serialize_with = "serialize_role", skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Role>,
    #[serde(skip)]
    inner: Move,
}

impl PlyMove {
    /// Move in UCI notation, e.g. "e7e8q"
    pub fn uci(&self) -> String {
        match self.promotion {
            Some(role) => format!("{}{}{}", self.from, self.to, role.char()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Whether an attempted move is the same move
    pub fn matches(&self, from: Square, to: Square, promotion: Option<Role>) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }
}

/// Board squares touched by a move, with castling mapped to the king's path.
fn move_squares(mv: &Move) -> Option<(Square, Square)> {
    match *mv {
        Move::Normal { from, to, .. } => Some((from, to)),
        Move::EnPassant { from, to } => Some((from, to)),
        Move::Castle { king, rook } => {
            let king_to = if rook.file() > king.file() {
                Square::from_coords(File::G, king.rank())
            } else {
                Square::from_coords(File::C, king.rank())
            };
            Some((king, king_to))
        }
        Move::Put { .. } => None,
    }
}

/// An ordered, legality-checked game history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoveList {
    moves: Vec<PlyMove>,
}

impl MoveList {
    /// Builds a move list by replaying SAN moves from the starting position.
    ///
    /// Trailing annotation glyphs ("!", "?") are ignored. The first move that
    /// cannot be played is reported with its ply index.
    pub fn from_san<S: AsRef<str>>(sans: &[S]) -> Result<Self> {
        let mut position = Chess::default();
        let mut moves = Vec::with_capacity(sans.len());

        for (ply, raw) in sans.iter().enumerate() {
            let text = raw.as_ref().trim().trim_end_matches(|c| c == '!' || c == '?');
            let illegal = || Error::IllegalMove {
                ply,
                san: raw.as_ref().to_string(),
            };

            let san_plus: SanPlus = text.parse().map_err(|_| illegal())?;
            let mv = san_plus.san.to_move(&position).map_err(|_| illegal())?;
            let (from, to) = move_squares(&mv).ok_or_else(illegal)?;
            let color = position.turn();
            let promotion = mv.promotion();

            position = position.play(mv.clone()).map_err(|_| illegal())?;

            moves.push(PlyMove {
                from,
                to,
                san: text.to_string(),
                color,
                promotion,
                inner: mv,
            });
        }

        Ok(Self { moves })
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, ply: usize) -> Option<&PlyMove> {
        self.moves.get(ply)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlyMove> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[PlyMove] {
        &self.moves
    }

    /// SAN strings in game order
    pub fn sans(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.san.as_str()).collect()
    }

    /// Highest navigable ply, `-1` for an empty game
    pub fn last_ply(&self) -> isize {
        self.moves.len() as isize - 1
    }

    /// Clamps a requested ply into `[-1, len - 1]`.
    pub fn clamp_ply(&self, ply: isize) -> isize {
        ply.clamp(-1, self.last_ply())
    }

    /// Position after move `ply`, rebuilt from the starting position.
    ///
    /// `-1` (or anything below) is the initial position; plies past the end
    /// are clamped.
    pub fn position_at(&self, ply: isize) -> Chess {
        let upto = (self.clamp_ply(ply) + 1) as usize;
        let mut position = Chess::default();
        for mv in &self.moves[..upto] {
            position = match position.clone().play(mv.inner.clone()) {
                Ok(next) => next,
                Err(_) => {
                    tracing::warn!(san = %mv.san, "replay stopped at unplayable move");
                    break;
                }
            };
        }
        position
    }

    pub fn fen_at(&self, ply: isize) -> String {
        fen_of(&self.position_at(ply))
    }

    /// Walks the game once, yielding each move with its surrounding FENs.
    pub fn replay(&self) -> Replay<'_> {
        Replay {
            moves: self.moves.iter().enumerate(),
            position: Chess::default(),
        }
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a PlyMove;
    type IntoIter = std::slice::Iter<'a, PlyMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// One step of an incremental replay.
#[derive(Debug, Clone)]
pub struct ReplayStep<'a> {
    pub ply: usize,
    pub mv: &'a PlyMove,
    pub fen_before: String,
    pub fen_after: String,
    /// Side to move once `mv` has been played
    pub side_to_move: Color,
}

/// Incremental walk over a [`MoveList`].
pub struct Replay<'a> {
    moves: std::iter::Enumerate<std::slice::Iter<'a, PlyMove>>,
    position: Chess,
}

impl<'a> Iterator for Replay<'a> {
    type Item = ReplayStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (ply, mv) = self.moves.next()?;
        let fen_before = fen_of(&self.position);
        let next = self.position.clone().play(mv.inner.clone()).ok()?;
        self.position = next;

        Some(ReplayStep {
            ply,
            mv,
            fen_before,
            fen_after: fen_of(&self.position),
            side_to_move: self.position.turn(),
        })
    }
}

pub fn fen_of(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

pub fn position_from_fen(fen: &str) -> Result<Chess> {
    let parsed: Fen = fen
        .parse()
        .map_err(|e| Error::Fen(format!("{}: {}", fen, e)))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| Error::Fen(format!("{}: {}", fen, e)))
}

pub fn parse_square(text: &str) -> Result<Square> {
    text.trim()
        .parse()
        .map_err(|_| Error::Square(text.to_string()))
}

/// Parses the from/to squares out of a UCI move such as "e2e4" or "e7e8q".
pub fn uci_squares(uci: &str) -> Option<(Square, Square)> {
    let uci = uci.trim();
    let from = uci.get(0..2)?.parse().ok()?;
    let to = uci.get(2..4)?.parse().ok()?;
    Some((from, to))
}

pub fn color_char(color: Color) -> char {
    if color == Color::White {
        'w'
    } else {
        'b'
    }
}

pub(crate) fn serialize_square<S: Serializer>(square: &Square, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(square)
}

pub(crate) fn serialize_color<S: Serializer>(color: &Color, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_char(color_char(*color))
}

fn serialize_role<S: Serializer>(role: &Option<Role>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match role {
        Some(role) => s.serialize_char(role.char()),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sans(moves: &str) -> Vec<String> {
        moves.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_from_san_records_squares_and_colors() {
        let list = MoveList::from_san(&sans("e4 e5 Nf3")).unwrap();
        assert_eq!(list.len(), 3);

        let first = list.get(0).unwrap();
        assert_eq!(first.from, Square::E2);
        assert_eq!(first.to, Square::E4);
        assert_eq!(first.color, Color::White);
        assert_eq!(list.get(1).unwrap().color, Color::Black);
        assert_eq!(list.get(2).unwrap().uci(), "g1f3");
    }

    #[test]
    fn test_illegal_move_reports_ply() {
        let err = MoveList::from_san(&sans("e4 e5 Ke3")).unwrap_err();
        match err {
            Error::IllegalMove { ply, san } => {
                assert_eq!(ply, 2);
                assert_eq!(san, "Ke3");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_castling_uses_king_destination() {
        let list = MoveList::from_san(&sans("e4 e5 Nf3 Nc6 Bc4 Bc5 O-O")).unwrap();
        let castle = list.get(6).unwrap();
        assert_eq!(castle.from, Square::E1);
        assert_eq!(castle.to, Square::G1);
    }

    #[test]
    fn test_check_suffix_and_glyphs_are_accepted() {
        let list = MoveList::from_san(&sans("e4 f5?! Qh5+")).unwrap();
        assert_eq!(list.get(1).unwrap().san, "f5");
        assert_eq!(list.get(2).unwrap().san, "Qh5+");
    }

    #[test]
    fn test_position_at_clamps_and_replays() {
        let list = MoveList::from_san(&sans("e4 e5")).unwrap();
        assert_eq!(list.fen_at(-1), STARTING_FEN);
        assert_eq!(list.fen_at(-7), STARTING_FEN);
        assert_eq!(list.fen_at(1), list.fen_at(99));
        assert_eq!(list.position_at(0).turn(), Color::Black);
    }

    #[test]
    fn test_replay_matches_full_replay() {
        let list = MoveList::from_san(&sans("d4 d5 c4 dxc4 e3")).unwrap();
        let steps: Vec<_> = list.replay().collect();
        assert_eq!(steps.len(), 5);
        for step in &steps {
            assert_eq!(step.fen_before, list.fen_at(step.ply as isize - 1));
            assert_eq!(step.fen_after, list.fen_at(step.ply as isize));
        }
        assert_eq!(steps[0].side_to_move, Color::Black);
    }

    #[test]
    fn test_uci_squares() {
        assert_eq!(uci_squares("e2e4"), Some((Square::E2, Square::E4)));
        assert_eq!(uci_squares("a7a8q"), Some((Square::A7, Square::A8)));
        assert_eq!(uci_squares("(none)"), None);
        assert_eq!(uci_squares(""), None);
    }

    #[test]
    fn test_position_from_fen_rejects_garbage() {
        assert!(position_from_fen(STARTING_FEN).is_ok());
        assert!(matches!(position_from_fen("not a fen"), Err(Error::Fen(_))));
    }
}
