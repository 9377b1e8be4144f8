//! Shared session slot guarded by a generation counter

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tokio::sync::watch;

use super::state::{AnalysisSession, PipelineState};
use crate::game::MoveList;
use crate::review::Annotation;

/// Pipeline progress, broadcast to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub generation: u64,
    pub state: PipelineState,
    pub completed: usize,
    pub total: usize,
    /// 0..=100
    pub percent: u8,
}

impl Progress {
    pub fn new(generation: u64, state: PipelineState, completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            if state == PipelineState::Completed { 100 } else { 0 }
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            generation,
            state,
            completed,
            total,
            percent,
        }
    }
}

/// Holds the one live [`AnalysisSession`].
///
/// Every write from a pipeline carries the generation it was started with and
/// is dropped once a newer selection or analysis has bumped the counter.
pub struct SessionStore {
    next_generation: AtomicU64,
    session: RwLock<AnalysisSession>,
    progress: watch::Sender<Progress>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            next_generation: AtomicU64::new(1),
            session: RwLock::new(AnalysisSession::default()),
            progress,
        }
    }

    fn bump(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, AnalysisSession> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, AnalysisSession> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Swaps in a new session under a fresh generation, which cancels any
    /// pipeline still working on the previous one.
    pub fn replace(&self, mut session: AnalysisSession) -> u64 {
        let mut slot = self.write();
        let generation = self.bump();
        session.generation = generation;
        let total = session.moves.len();
        *slot = session;
        self.progress
            .send_replace(Progress::new(generation, PipelineState::Idle, 0, total));
        generation
    }

    /// Clears previous results and hands out the generation and moves for a
    /// new run over the current game.
    pub fn begin_analysis(&self) -> (u64, MoveList) {
        let mut session = self.write();
        let generation = self.bump();
        session.generation = generation;
        session.reset_analysis();
        session.state = PipelineState::Running;
        let total = session.moves.len();
        self.progress
            .send_replace(Progress::new(generation, PipelineState::Running, 0, total));
        (generation, session.moves.clone())
    }

    /// Appends one annotation if `generation` is still live. Returns false
    /// when the write was dropped.
    pub fn push_annotation(&self, generation: u64, annotation: Annotation) -> bool {
        let mut session = self.write();
        if session.generation != generation || annotation.ply != session.annotations.len() {
            return false;
        }
        session.annotations.push(annotation);
        self.progress.send_replace(Progress::new(
            generation,
            PipelineState::Running,
            session.annotations.len(),
            session.moves.len(),
        ));
        true
    }

    /// Applies `finish` to the session if `generation` is still live.
    pub fn complete<F>(&self, generation: u64, finish: F) -> bool
    where
        F: FnOnce(&mut AnalysisSession),
    {
        let mut session = self.write();
        if session.generation != generation {
            return false;
        }
        finish(&mut session);
        session.state = PipelineState::Completed;
        self.progress.send_replace(Progress::new(
            generation,
            PipelineState::Completed,
            session.annotations.len(),
            session.moves.len(),
        ));
        true
    }
}
