//! Game histories: SAN validation, replay and PGN decoding

pub mod moves;
pub mod pgn;

pub use moves::{fen_of, MoveList, PlyMove, ReplayStep, STARTING_FEN};
pub use pgn::{parse_pgn, PgnGame};
