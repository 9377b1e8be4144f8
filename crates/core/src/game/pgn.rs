//! PGN decoding for game records

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Position};
use std::io::Cursor;
use std::ops::ControlFlow;

use super::moves::MoveList;
use crate::error::{Error, Result};

/// Mainline and headers of a single PGN game
#[derive(Debug, Clone)]
pub struct PgnGame {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub date: Option<String>,
    pub moves: Vec<String>,
}

impl PgnGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn move_list(&self) -> Result<MoveList> {
        MoveList::from_san(&self.moves)
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

#[derive(Default)]
struct GameTags {
    white: Option<String>,
    black: Option<String>,
    result: Option<String>,
    date: Option<String>,
}

struct GameMoves {
    tags: GameTags,
    moves: Vec<String>,
    position: Chess,
    illegal: Option<String>,
}

struct GameParser;

impl Visitor for GameParser {
    type Tags = GameTags;
    type Movetext = GameMoves;
    type Output = std::result::Result<PgnGame, String>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().to_string();

        match name {
            b"White" => tags.white = Some(value),
            b"Black" => tags.black = Some(value),
            b"Result" => tags.result = Some(value),
            b"Date" => tags.date = Some(value),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(GameMoves {
            tags,
            moves: Vec::new(),
            position: Chess::default(),
            illegal: None,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if movetext.illegal.is_some() {
            return ControlFlow::Continue(());
        }

        let text = san.to_string();
        let played = san
            .san
            .to_move(&movetext.position)
            .ok()
            .and_then(|m| movetext.position.clone().play(m).ok());

        match played {
            Some(next) => {
                movetext.position = next;
                movetext.moves.push(text);
            }
            None => movetext.illegal = Some(text),
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        if let Some(san) = movetext.illegal {
            let ply = movetext.moves.len();
            return Err(format!("illegal move '{}' at ply {}", san, ply));
        }

        Ok(PgnGame {
            white: movetext.tags.white,
            black: movetext.tags.black,
            result: movetext.tags.result,
            date: movetext.tags.date,
            moves: movetext.moves,
        })
    }
}

/// Parses the first game of a PGN document. Bare movetext without headers
/// is accepted.
pub fn parse_pgn(pgn: &str) -> Result<PgnGame> {
    let cursor = Cursor::new(pgn.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    match reader.read_game(&mut GameParser) {
        Ok(Some(Ok(game))) => Ok(game),
        Ok(Some(Err(reason))) => Err(Error::Pgn(reason)),
        Ok(None) => Err(Error::Pgn("no game found".to_string())),
        Err(e) => Err(Error::Pgn(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PGN: &str = r#"[Event "Club Championship"]
[White "Alice"]
[Black "Bob"]
[Result "1-0"]

1. e4 e5 2. Nf3 Nc6 (2... d6 3. d4) 3. Bb5 1-0
"#;

    #[test]
    fn test_parse_pgn_headers_and_mainline() {
        let game = parse_pgn(SAMPLE_PGN).unwrap();
        assert_eq!(game.white.as_deref(), Some("Alice"));
        assert_eq!(game.black.as_deref(), Some("Bob"));
        assert_eq!(game.result.as_deref(), Some("1-0"));
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(game.summary(), "Alice vs Bob - 1-0");
    }

    #[test]
    fn test_bare_movetext() {
        let game = parse_pgn("1. d4 d5 2. c4 *").unwrap();
        assert_eq!(game.move_count(), 3);
        assert_eq!(game.move_list().unwrap().len(), 3);
    }

    #[test]
    fn test_illegal_movetext_is_rejected() {
        let err = parse_pgn("1. e4 e5 2. Ke3 *").unwrap_err();
        assert!(matches!(err, Error::Pgn(_)));
    }
}
