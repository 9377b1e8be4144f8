//! Front door for game selection, analysis and navigation

use std::sync::Arc;

use shakmaty::{Color, Role, Square};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use super::pipeline::{AnalysisPipeline, PipelineOutcome};
use super::state::{AnalysisSession, PlyView, PredictionOutcome, SessionSummary};
use super::store::{Progress, SessionStore};
use crate::config::AnalysisConfig;
use crate::control::ControlMap;
use crate::engine::EvaluationOracle;
use crate::error::Result;
use crate::game::MoveList;
use crate::openings::OpeningBook;
use crate::records::GameRecord;

/// Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct ReviewController {
    store: Arc<SessionStore>,
    pipeline: Arc<AnalysisPipeline>,
    book: Arc<OpeningBook>,
}

impl ReviewController {
    pub fn new(oracle: Arc<dyn EvaluationOracle>, config: AnalysisConfig) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            pipeline: Arc::new(AnalysisPipeline::new(oracle, config)),
            book: Arc::new(OpeningBook::standard().clone()),
        }
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = Arc::new(book);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.pipeline.config()
    }

    /// Makes `moves` the active game. Any running analysis is cancelled.
    pub fn select_game(&self, game_id: Option<String>, moves: MoveList, orientation: Color) -> u64 {
        let plies = moves.len();
        let session = AnalysisSession::new(game_id, moves, orientation, &self.book);
        let opening = session.opening.name.clone();
        let generation = self.store.replace(session);
        info!(generation, plies, %opening, "game selected");
        generation
    }

    /// Selects a fetched record, oriented for `viewer`. A record whose moves
    /// cannot be replayed is rejected and the current session is kept.
    pub fn select_record(&self, record: &GameRecord, viewer: Option<&str>) -> Result<u64> {
        let moves = record.move_list()?;
        Ok(self.select_game(Some(record.id.clone()), moves, record.orientation_for(viewer)))
    }

    /// Starts a fresh pipeline over the current game on the tokio runtime.
    pub fn start_analysis(&self) -> JoinHandle<PipelineOutcome> {
        let (generation, moves) = self.store.begin_analysis();
        let store = Arc::clone(&self.store);
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move { pipeline.run(&store, generation, &moves).await })
    }

    /// Snapshot of the whole session
    pub fn session(&self) -> AnalysisSession {
        self.store.read().clone()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from(&*self.store.read())
    }

    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.store.subscribe()
    }

    pub fn go_to(&self, ply: isize) -> PlyView {
        self.store.write().go_to(ply)
    }

    pub fn first(&self) -> PlyView {
        self.store.write().first()
    }

    pub fn previous(&self) -> PlyView {
        self.store.write().previous()
    }

    pub fn next(&self) -> PlyView {
        self.store.write().next()
    }

    pub fn last(&self) -> PlyView {
        self.store.write().last()
    }

    pub fn current_view(&self) -> PlyView {
        self.store.read().view()
    }

    pub fn control_map(&self) -> ControlMap {
        self.store.read().control_map(self.config().max_control_intensity)
    }

    pub fn attempt_move(&self, from: Square, to: Square, promotion: Option<Role>) -> Option<PredictionOutcome> {
        self.store.write().attempt(from, to, promotion)
    }
}
