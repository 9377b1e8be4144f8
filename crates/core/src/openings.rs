//! Opening identification by longest book prefix

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::Result;

/// Name shown when no book line matches
pub const CUSTOM_OPENING_NAME: &str = "Custom Opening";
pub const CUSTOM_OPENING_ECO: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningEntry {
    pub eco: String,
    pub name: String,
    pub moves: Vec<String>,
}

impl OpeningEntry {
    pub fn new(eco: &str, name: &str, moves: &str) -> Self {
        Self {
            eco: eco.to_string(),
            name: name.to_string(),
            moves: moves.split_whitespace().map(String::from).collect(),
        }
    }

    /// The "no match" sentinel
    pub fn custom() -> Self {
        Self {
            eco: CUSTOM_OPENING_ECO.to_string(),
            name: CUSTOM_OPENING_NAME.to_string(),
            moves: Vec::new(),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.moves.is_empty()
    }

    /// True when every book move equals the game move at the same index.
    pub fn matches<S: AsRef<str>>(&self, game: &[S]) -> bool {
        self.moves.len() <= game.len()
            && self
                .moves
                .iter()
                .zip(game)
                .all(|(book, played)| bare_san(book) == bare_san(played.as_ref()))
    }
}

/// SAN without check, mate and annotation suffixes
fn bare_san(san: &str) -> &str {
    san.trim().trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
}

const STANDARD_LINES: &[(&str, &str, &str)] = &[
    ("A00", "Polish Opening", "b4"),
    ("A01", "Nimzo-Larsen Attack", "b3"),
    ("A02", "Bird's Opening", "f4"),
    ("A04", "Zukertort Opening", "Nf3"),
    ("A09", "Réti Opening", "Nf3 d5 c4"),
    ("A10", "English Opening", "c4"),
    ("A40", "Queen's Pawn Opening", "d4"),
    ("A45", "Indian Defense", "d4 Nf6"),
    ("A56", "Benoni Defense", "d4 Nf6 c4 c5"),
    ("A80", "Dutch Defense", "d4 f5"),
    ("B00", "King's Pawn Opening", "e4"),
    ("B01", "Scandinavian Defense", "e4 d5"),
    ("B02", "Alekhine's Defense", "e4 Nf6"),
    ("B06", "Modern Defense", "e4 g6"),
    ("B07", "Pirc Defense", "e4 d6 d4 Nf6"),
    ("B10", "Caro-Kann Defense", "e4 c6"),
    ("B12", "Caro-Kann Defense: Advance Variation", "e4 c6 d4 d5 e5"),
    ("B20", "Sicilian Defense", "e4 c5"),
    ("B21", "Sicilian Defense: Smith-Morra Gambit", "e4 c5 d4 cxd4 c3"),
    ("B22", "Sicilian Defense: Alapin Variation", "e4 c5 c3"),
    ("B23", "Sicilian Defense: Closed", "e4 c5 Nc3"),
    ("B70", "Sicilian Defense: Dragon Variation", "e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 g6"),
    ("B90", "Sicilian Defense: Najdorf Variation", "e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 a6"),
    ("C00", "French Defense", "e4 e6"),
    ("C02", "French Defense: Advance Variation", "e4 e6 d4 d5 e5"),
    ("C11", "French Defense: Classical Variation", "e4 e6 d4 d5 Nc3 Nf6"),
    ("C15", "French Defense: Winawer Variation", "e4 e6 d4 d5 Nc3 Bb4"),
    ("C20", "King's Pawn Game", "e4 e5"),
    ("C21", "Center Game", "e4 e5 d4"),
    ("C23", "Bishop's Opening", "e4 e5 Bc4"),
    ("C25", "Vienna Game", "e4 e5 Nc3"),
    ("C30", "King's Gambit", "e4 e5 f4"),
    ("C33", "King's Gambit Accepted", "e4 e5 f4 exf4"),
    ("C41", "Philidor Defense", "e4 e5 Nf3 d6"),
    ("C42", "Petrov's Defense", "e4 e5 Nf3 Nf6"),
    ("C44", "Scotch Game", "e4 e5 Nf3 Nc6 d4"),
    ("C46", "Three Knights Opening", "e4 e5 Nf3 Nc6 Nc3"),
    ("C47", "Four Knights Game", "e4 e5 Nf3 Nc6 Nc3 Nf6"),
    ("C50", "Italian Game", "e4 e5 Nf3 Nc6 Bc4"),
    ("C50", "Italian Game: Giuoco Piano", "e4 e5 Nf3 Nc6 Bc4 Bc5"),
    ("C51", "Italian Game: Evans Gambit", "e4 e5 Nf3 Nc6 Bc4 Bc5 b4"),
    ("C55", "Italian Game: Two Knights Defense", "e4 e5 Nf3 Nc6 Bc4 Nf6"),
    ("C60", "Ruy Lopez", "e4 e5 Nf3 Nc6 Bb5"),
    ("C65", "Ruy Lopez: Berlin Defense", "e4 e5 Nf3 Nc6 Bb5 Nf6"),
    ("C68", "Ruy Lopez: Exchange Variation", "e4 e5 Nf3 Nc6 Bb5 a6 Bxc6"),
    ("C70", "Ruy Lopez: Morphy Defense", "e4 e5 Nf3 Nc6 Bb5 a6"),
    ("D00", "Queen's Pawn Game", "d4 d5"),
    ("D00", "London System", "d4 d5 Bf4"),
    ("D06", "Queen's Gambit", "d4 d5 c4"),
    ("D10", "Slav Defense", "d4 d5 c4 c6"),
    ("D20", "Queen's Gambit Accepted", "d4 d5 c4 dxc4"),
    ("D30", "Queen's Gambit Declined", "d4 d5 c4 e6"),
    ("D80", "Grünfeld Defense", "d4 Nf6 c4 g6 Nc3 d5"),
    ("E12", "Queen's Indian Defense", "d4 Nf6 c4 e6 Nf3 b6"),
    ("E20", "Nimzo-Indian Defense", "d4 Nf6 c4 e6 Nc3 Bb4"),
    ("E60", "King's Indian Defense", "d4 Nf6 c4 g6"),
];

/// Built-in reference book, initialised on first use
static STANDARD_BOOK: LazyLock<OpeningBook> = LazyLock::new(|| {
    let book = OpeningBook::new(
        STANDARD_LINES
            .iter()
            .map(|(eco, name, moves)| OpeningEntry::new(eco, name, moves))
            .collect(),
    );
    tracing::debug!(lines = book.len(), "loaded standard opening book");
    book
});

/// Static set of named opening lines
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: Vec<OpeningEntry>,
}

impl OpeningBook {
    pub fn new(entries: Vec<OpeningEntry>) -> Self {
        Self { entries }
    }

    pub fn standard() -> &'static OpeningBook {
        &STANDARD_BOOK
    }

    /// Loads a book from a JSON array of `{eco, name, moves}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<OpeningEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OpeningEntry] {
        &self.entries
    }

    /// Most specific line whose moves prefix the game, or the sentinel.
    pub fn identify<S: AsRef<str>>(&self, moves: &[S]) -> OpeningEntry {
        self.entries
            .iter()
            .filter(|entry| !entry.moves.is_empty() && entry.matches(moves))
            .max_by_key(|entry| entry.moves.len())
            .cloned()
            .unwrap_or_else(OpeningEntry::custom)
    }
}

/// Identifies a game's opening against the built-in book.
pub fn identify<S: AsRef<str>>(moves: &[S]) -> OpeningEntry {
    OpeningBook::standard().identify(moves)
}
