//! Evaluation oracle integration
//!
//! The engine itself runs elsewhere; this module wraps the remote service and
//! owns the score conventions used everywhere else.

pub mod evaluation;
pub mod oracle;

pub use evaluation::{mover_pov, to_white_pov, EngineEvaluation, NormalizedEval};
pub use oracle::{EvaluationOracle, HttpOracle};
