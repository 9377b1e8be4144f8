//! The analysis session and its replay/navigation state machine

use serde::{Serialize, Serializer};
use shakmaty::{Chess, Color, Position, Role, Square};

use crate::control::ControlMap;
use crate::game::moves::{fen_of, serialize_color, serialize_square};
use crate::game::MoveList;
use crate::openings::{OpeningBook, OpeningEntry};
use crate::review::{Accuracy, AccuracyReport, Annotation};

/// Lifecycle of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Everything known about the selected game.
///
/// `annotations` is a prefix of `moves` while a pipeline is running and
/// covers every ply once it has completed.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    /// Identity of the run allowed to write into this session
    pub generation: u64,
    pub game_id: Option<String>,
    pub moves: MoveList,
    pub annotations: Vec<Annotation>,
    /// `-1` is the starting position
    pub current_ply: isize,
    pub accuracy: Accuracy,
    pub report: Option<AccuracyReport>,
    pub orientation: Color,
    pub opening: OpeningEntry,
    pub state: PipelineState,
    pub narrative: Option<String>,
    pub prediction: PredictionScore,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self {
            generation: 0,
            game_id: None,
            moves: MoveList::default(),
            annotations: Vec::new(),
            current_ply: -1,
            accuracy: Accuracy::default(),
            report: None,
            orientation: Color::White,
            opening: OpeningEntry::custom(),
            state: PipelineState::Idle,
            narrative: None,
            prediction: PredictionScore::default(),
        }
    }
}

impl AnalysisSession {
    pub fn new(game_id: Option<String>, moves: MoveList, orientation: Color, book: &OpeningBook) -> Self {
        let opening = book.identify(moves.sans().as_slice());
        Self {
            game_id,
            moves,
            orientation,
            opening,
            ..Self::default()
        }
    }

    /// True once every ply carries an annotation from a finished run
    pub fn is_complete(&self) -> bool {
        self.state == PipelineState::Completed && self.annotations.len() == self.moves.len()
    }

    /// Annotation for `ply`, if the pipeline has reached it
    pub fn annotation_at(&self, ply: isize) -> Option<&Annotation> {
        usize::try_from(ply).ok().and_then(|p| self.annotations.get(p))
    }

    /// Clears analysis results ahead of a new run.
    pub(crate) fn reset_analysis(&mut self) {
        self.annotations.clear();
        self.accuracy = Accuracy::default();
        self.report = None;
        self.narrative = None;
        self.state = PipelineState::Idle;
    }

    // ---- navigation ----

    /// Moves to `ply`, clamped into `[-1, len - 1]`.
    pub fn go_to(&mut self, ply: isize) -> PlyView {
        self.current_ply = self.moves.clamp_ply(ply);
        self.view()
    }

    pub fn first(&mut self) -> PlyView {
        self.go_to(-1)
    }

    pub fn previous(&mut self) -> PlyView {
        self.go_to(self.current_ply - 1)
    }

    pub fn next(&mut self) -> PlyView {
        self.go_to(self.current_ply + 1)
    }

    pub fn last(&mut self) -> PlyView {
        self.go_to(self.moves.last_ply())
    }

    /// Position at the current ply, rebuilt from the initial position
    pub fn position(&self) -> Chess {
        self.moves.position_at(self.current_ply)
    }

    /// What the board should show for the current ply
    pub fn view(&self) -> PlyView {
        let position = self.position();
        let last_move = usize::try_from(self.current_ply)
            .ok()
            .and_then(|p| self.moves.get(p))
            .map(|mv| SquarePair { from: mv.from, to: mv.to });
        let annotation = self.annotation_at(self.current_ply).cloned();

        PlyView {
            ply: self.current_ply,
            fen: fen_of(&position),
            side_to_move: position.turn(),
            orientation: self.orientation,
            last_move,
            best_move: annotation
                .as_ref()
                .and_then(|a| a.best_move_squares())
                .map(|(from, to)| SquarePair { from, to }),
            evaluation: annotation.as_ref().map(|a| a.evaluation().to_string()),
            annotation,
        }
    }

    pub fn control_map(&self, max_intensity: u8) -> ControlMap {
        ControlMap::compute(&self.position(), max_intensity)
    }

    // ---- prediction mode ----

    /// Checks a guessed move against the game's next move. A correct guess
    /// advances the board by one ply; there is nothing to guess after the
    /// final move.
    pub fn attempt(&mut self, from: Square, to: Square, promotion: Option<Role>) -> Option<PredictionOutcome> {
        let ply = usize::try_from(self.current_ply + 1).ok()?;
        let expected = self.moves.get(ply)?;
        let correct = expected.matches(from, to, promotion);

        let outcome = PredictionOutcome {
            ply,
            move_number: ply / 2 + 1,
            expected_san: expected.san.clone(),
            correct,
            markers: SquarePair { from, to },
        };

        self.prediction.attempts += 1;
        if correct {
            self.prediction.correct += 1;
            self.go_to(ply as isize);
        }

        Some(outcome)
    }
}

/// Origin and destination squares, for highlights and arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SquarePair {
    #[serde(serialize_with = "serialize_square")]
    pub from: Square,
    #[serde(serialize_with = "serialize_square")]
    pub to: Square,
}

/// Presentation data for one navigable ply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlyView {
    pub ply: isize,
    pub fen: String,
    #[serde(serialize_with = "serialize_color")]
    pub side_to_move: Color,
    #[serde(serialize_with = "serialize_color")]
    pub orientation: Color,
    pub last_move: Option<SquarePair>,
    pub best_move: Option<SquarePair>,
    /// Display string such as "+0.35" or "M3"
    pub evaluation: Option<String>,
    pub annotation: Option<Annotation>,
}

/// Running tally of prediction attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PredictionScore {
    pub attempts: u32,
    pub correct: u32,
}

impl PredictionScore {
    pub fn accuracy(&self) -> f32 {
        if self.attempts == 0 {
            return 0.0;
        }
        (self.correct as f32 / self.attempts as f32) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub ply: usize,
    pub move_number: usize,
    pub expected_san: String,
    pub correct: bool,
    /// Squares of the attempted move
    pub markers: SquarePair,
}

/// Compact view of a session for status endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub generation: u64,
    pub game_id: Option<String>,
    pub state: PipelineState,
    pub total_plies: usize,
    pub annotated_plies: usize,
    pub current_ply: isize,
    #[serde(serialize_with = "serialize_orientation")]
    pub orientation: Color,
    pub opening: OpeningEntry,
    pub accuracy: Accuracy,
    pub report: Option<AccuracyReport>,
    pub narrative: Option<String>,
    pub prediction: PredictionScore,
}

fn serialize_orientation<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(match color {
        Color::White => "white",
        Color::Black => "black",
    })
}

impl From<&AnalysisSession> for SessionSummary {
    fn from(session: &AnalysisSession) -> Self {
        Self {
            generation: session.generation,
            game_id: session.game_id.clone(),
            state: session.state,
            total_plies: session.moves.len(),
            annotated_plies: session.annotations.len(),
            current_ply: session.current_ply,
            orientation: session.orientation,
            opening: session.opening.clone(),
            accuracy: session.accuracy,
            report: session.report.clone(),
            narrative: session.narrative.clone(),
            prediction: session.prediction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NormalizedEval;
    use crate::game::STARTING_FEN;

    fn session(sans: &str) -> AnalysisSession {
        let sans: Vec<&str> = sans.split_whitespace().collect();
        let moves = MoveList::from_san(&sans).unwrap();
        AnalysisSession::new(Some("g1".into()), moves, Color::White, OpeningBook::standard())
    }

    fn ten_plies() -> AnalysisSession {
        session("e4 e5 Nf3 Nc6 Bb5 a6 Ba4 Nf6 O-O Be7")
    }

    #[test]
    fn test_new_session_identifies_opening() {
        let s = ten_plies();
        assert_eq!(s.opening.eco, "C70");
        assert_eq!(s.current_ply, -1);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_go_to_clamps() {
        let mut s = ten_plies();
        assert_eq!(s.go_to(-5).ply, -1);
        assert_eq!(s.go_to(50).ply, 9);
        assert_eq!(s.current_ply, 9);
    }

    #[test]
    fn test_go_to_is_idempotent() {
        let mut s = ten_plies();
        s.go_to(8);
        let first = s.go_to(4);
        let second = s.go_to(4);
        assert_eq!(first, second);

        // reached via a different path
        s.first();
        for _ in 0..5 {
            s.next();
        }
        assert_eq!(s.view(), first);
    }

    #[test]
    fn test_deltas_stay_in_range() {
        let mut s = ten_plies();
        assert_eq!(s.previous().ply, -1);
        assert_eq!(s.last().ply, 9);
        assert_eq!(s.next().ply, 9);
        assert_eq!(s.first().fen, STARTING_FEN);
    }

    #[test]
    fn test_last_move_highlight() {
        let mut s = ten_plies();
        let view = s.go_to(8);
        assert_eq!(view.last_move, Some(SquarePair { from: Square::E1, to: Square::G1 }));
        assert!(s.first().last_move.is_none());
    }

    #[test]
    fn test_empty_game_navigation() {
        let mut s = AnalysisSession::default();
        assert_eq!(s.go_to(3).ply, -1);
        assert_eq!(s.next().fen, STARTING_FEN);
        assert!(s.attempt(Square::E2, Square::E4, None).is_none());
    }

    #[test]
    fn test_partial_annotations_are_tolerated() {
        let mut s = ten_plies();
        let steps: Vec<_> = s.moves.replay().take(3).collect();
        s.annotations = steps
            .iter()
            .map(|step| {
                Annotation::new(step, 0, NormalizedEval { score: 35, mate_in: None }, Some("g1f3".into()))
            })
            .collect();
        s.state = PipelineState::Running;

        let annotated = s.go_to(0);
        assert_eq!(annotated.evaluation.as_deref(), Some("+0.35"));
        assert_eq!(annotated.best_move, Some(SquarePair { from: Square::G1, to: Square::F3 }));

        let pending = s.go_to(6);
        assert!(pending.annotation.is_none());
        assert!(pending.evaluation.is_none());
        assert!(!s.is_complete());
    }

    #[test]
    fn test_prediction_mode() {
        let mut s = session("e4 e5 Nf3");

        let miss = s.attempt(Square::D2, Square::D4, None).unwrap();
        assert!(!miss.correct);
        assert_eq!(miss.expected_san, "e4");
        assert_eq!(s.current_ply, -1);

        let hit = s.attempt(Square::E2, Square::E4, None).unwrap();
        assert!(hit.correct);
        assert_eq!(s.current_ply, 0);

        s.last();
        assert!(s.attempt(Square::A2, Square::A3, None).is_none());
        assert_eq!(s.prediction, PredictionScore { attempts: 2, correct: 1 });
        assert_eq!(s.prediction.accuracy(), 50.0);
    }

    #[test]
    fn test_summary_reflects_session() {
        let s = ten_plies();
        let summary = SessionSummary::from(&s);
        assert_eq!(summary.total_plies, 10);
        assert_eq!(summary.annotated_plies, 0);
        assert_eq!(summary.state, PipelineState::Idle);
        assert_eq!(summary.opening.name, "Ruy Lopez: Morphy Defense");
    }
}
