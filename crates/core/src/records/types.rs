//! Game record data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use shakmaty::Color;

use crate::error::{Error, Result};
use crate::game::moves::{color_char, uci_squares, PlyMove};
use crate::game::{parse_pgn, MoveList};

/// A finished game as served by the platform backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "pgn", alias = "moveList")]
    pub moves: RecordMoves,
    #[serde(deserialize_with = "string_or_number")]
    pub white_player_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub black_player_id: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The two shapes a backend may use for the move history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordMoves {
    Pgn(String),
    Verbose(Vec<VerboseMove>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerboseMove {
    pub from: String,
    pub to: String,
    pub san: String,
    pub color: String,
    #[serde(default)]
    pub promotion: Option<String>,
}

impl VerboseMove {
    fn agrees_with(&self, replayed: &PlyMove) -> bool {
        let uci = format!("{}{}", self.from.trim(), self.to.trim());
        let color = match self.color.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Some('w'),
            "b" | "black" => Some('b'),
            _ => None,
        };
        let promotion = self
            .promotion
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .and_then(|p| p.chars().next())
            .map(|c| c.to_ascii_lowercase());

        uci_squares(&uci) == Some((replayed.from, replayed.to))
            && color == Some(color_char(replayed.color))
            && promotion == replayed.promotion.map(|role| role.char())
    }
}

impl GameRecord {
    /// Replays the record into a validated move list.
    pub fn move_list(&self) -> Result<MoveList> {
        match &self.moves {
            RecordMoves::Pgn(text) if text.trim().is_empty() => Ok(MoveList::default()),
            RecordMoves::Pgn(text) => parse_pgn(text)?.move_list(),
            RecordMoves::Verbose(verbose) => {
                let sans: Vec<&str> = verbose.iter().map(|m| m.san.as_str()).collect();
                let list = MoveList::from_san(&sans)?;

                // declared fields must agree with what the SAN resolves to
                for (ply, (declared, replayed)) in verbose.iter().zip(list.iter()).enumerate() {
                    if !declared.agrees_with(replayed) {
                        return Err(Error::IllegalMove {
                            ply,
                            san: declared.san.clone(),
                        });
                    }
                }

                Ok(list)
            }
        }
    }

    /// Board orientation for a viewer: Black only when they played Black.
    pub fn orientation_for(&self, viewer: Option<&str>) -> Color {
        match viewer {
            Some(id) if id == self.black_player_id && id != self.white_player_id => Color::Black,
            _ => Color::White,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(d)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_record_decodes() {
        let json = r#"{
            "id": 42,
            "moves": [
                {"from": "e2", "to": "e4", "san": "e4", "color": "w"},
                {"from": "e7", "to": "e5", "san": "e5", "color": "b"}
            ],
            "whitePlayerId": "u1",
            "blackPlayerId": 7,
            "result": "1-0",
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;

        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.black_player_id, "7");
        assert!(record.created_at.is_some());
        assert_eq!(record.move_list().unwrap().sans(), vec!["e4", "e5"]);
    }

    #[test]
    fn test_pgn_record_decodes() {
        let json = r#"{
            "id": "g1",
            "pgn": "1. e4 c5 2. Nf3 *",
            "whitePlayerId": "a",
            "blackPlayerId": "b"
        }"#;

        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.move_list().unwrap().len(), 3);
        assert!(record.result.is_none());
    }

    #[test]
    fn test_verbose_square_mismatch_is_rejected() {
        let record = GameRecord {
            id: "x".into(),
            moves: RecordMoves::Verbose(vec![VerboseMove {
                from: "d2".into(),
                to: "d4".into(),
                san: "e4".into(),
                color: "w".into(),
                promotion: None,
            }]),
            white_player_id: "a".into(),
            black_player_id: "b".into(),
            result: None,
            created_at: None,
        };

        assert!(matches!(record.move_list(), Err(Error::IllegalMove { ply: 0, .. })));
    }

    fn verbose(from: &str, to: &str, san: &str, color: &str, promotion: Option<&str>) -> VerboseMove {
        VerboseMove {
            from: from.into(),
            to: to.into(),
            san: san.into(),
            color: color.into(),
            promotion: promotion.map(String::from),
        }
    }

    fn verbose_record(moves: Vec<VerboseMove>) -> GameRecord {
        GameRecord {
            id: "x".into(),
            moves: RecordMoves::Verbose(moves),
            white_player_id: "a".into(),
            black_player_id: "b".into(),
            result: None,
            created_at: None,
        }
    }

    /// 1. b4 a5 2. bxa5 h6 3. a6 h5 4. axb7 h4, ready for bxa8
    fn promotion_prefix() -> Vec<VerboseMove> {
        vec![
            verbose("b2", "b4", "b4", "w", None),
            verbose("a7", "a5", "a5", "b", None),
            verbose("b4", "a5", "bxa5", "w", None),
            verbose("h7", "h6", "h6", "b", None),
            verbose("a5", "a6", "a6", "w", None),
            verbose("h6", "h5", "h5", "b", None),
            verbose("a6", "b7", "axb7", "w", None),
            verbose("h5", "h4", "h4", "b", None),
        ]
    }

    #[test]
    fn test_verbose_promotion_must_match_san() {
        let mut moves = promotion_prefix();
        moves.push(verbose("b7", "a8", "bxa8=Q", "w", Some("q")));
        let list = verbose_record(moves).move_list().unwrap();
        assert_eq!(list.get(8).unwrap().uci(), "b7a8q");

        let mut moves = promotion_prefix();
        moves.push(verbose("b7", "a8", "bxa8=Q", "w", Some("n")));
        assert!(matches!(
            verbose_record(moves).move_list(),
            Err(Error::IllegalMove { ply: 8, .. })
        ));

        let mut moves = promotion_prefix();
        moves.push(verbose("b7", "a8", "bxa8=Q", "w", None));
        assert!(verbose_record(moves).move_list().is_err());
    }

    #[test]
    fn test_verbose_color_must_match_mover() {
        let record = verbose_record(vec![
            verbose("e2", "e4", "e4", "white", None),
            verbose("e7", "e5", "e5", "w", None),
        ]);
        assert!(matches!(record.move_list(), Err(Error::IllegalMove { ply: 1, .. })));
    }

    #[test]
    fn test_orientation_for_viewer() {
        let record = GameRecord {
            id: "x".into(),
            moves: RecordMoves::Pgn(String::new()),
            white_player_id: "alice".into(),
            black_player_id: "bob".into(),
            result: None,
            created_at: None,
        };

        assert_eq!(record.orientation_for(Some("bob")), Color::Black);
        assert_eq!(record.orientation_for(Some("alice")), Color::White);
        assert_eq!(record.orientation_for(Some("carol")), Color::White);
        assert_eq!(record.orientation_for(None), Color::White);
        assert!(record.move_list().unwrap().is_empty());
    }
}
