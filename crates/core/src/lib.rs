//! Game Review Core Library
//!
//! Replays a finished game, scores every ply through a remote evaluation
//! oracle and turns the results into move labels, per-side accuracy, an
//! opening name, a written summary and a board-control heatmap.

pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod game;
pub mod openings;
pub mod records;
pub mod review;
pub mod session;

pub use config::{AnalysisConfig, OracleConfig, ScorePerspective};
pub use control::ControlMap;
pub use engine::{EngineEvaluation, EvaluationOracle, HttpOracle, NormalizedEval};
pub use error::{Error, Result};
pub use game::{MoveList, PlyMove};
pub use openings::{OpeningBook, OpeningEntry};
pub use records::{GameRecord, GameRecordProvider, RestGameClient};
pub use review::{Accuracy, Annotation, Classification};
pub use session::{AnalysisSession, PipelineState, PlyView, Progress, ReviewController};
