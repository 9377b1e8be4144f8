//! Review session: the selected game, its analysis run and board navigation

mod controller;
mod pipeline;
mod state;
mod store;

pub use controller::ReviewController;
pub use pipeline::{AnalysisPipeline, PipelineOutcome};
pub use state::{
    AnalysisSession, PipelineState, PlyView, PredictionOutcome, PredictionScore, SessionSummary, SquarePair,
};
pub use store::{Progress, SessionStore};
