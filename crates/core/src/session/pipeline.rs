//! Sequential, cancellable ply-by-ply evaluation

use std::sync::Arc;

use tracing::{debug, info};

use super::state::PipelineState;
use super::store::SessionStore;
use crate::config::AnalysisConfig;
use crate::engine::EvaluationOracle;
use crate::game::MoveList;
use crate::review::{self, Annotation};

/// How a pipeline run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub generation: u64,
    pub state: PipelineState,
    /// Annotations this run committed to the session
    pub annotated: usize,
}

pub struct AnalysisPipeline {
    oracle: Arc<dyn EvaluationOracle>,
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    pub fn new(oracle: Arc<dyn EvaluationOracle>, config: AnalysisConfig) -> Self {
        Self { oracle, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluates every ply of `moves` in order, committing annotations to
    /// `store` under `generation`.
    ///
    /// One oracle request is in flight at a time. The run stops at the next
    /// suspension point once `generation` is no longer current.
    #[tracing::instrument(skip(self, store, moves), fields(plies = moves.len()))]
    pub async fn run(&self, store: &SessionStore, generation: u64, moves: &MoveList) -> PipelineOutcome {
        let total = moves.len();
        let perspective = self.oracle.perspective();
        let mut eval_before = 0;
        let mut annotated = 0;

        info!("analysis started");

        for step in moves.replay() {
            if !store.is_current(generation) {
                return cancelled(generation, annotated);
            }

            let raw = self.oracle.evaluate(&step.fen_after, self.config.depth).await;

            if !store.is_current(generation) {
                debug!(ply = step.ply, "discarding evaluation for superseded game");
                return cancelled(generation, annotated);
            }

            let after = raw.normalized(step.side_to_move, perspective, self.config.mate_score);
            let annotation = Annotation::new(&step, eval_before, after, raw.best_move);
            debug!(
                ply = step.ply,
                san = %step.mv.san,
                eval = after.score,
                classification = annotation.classification.as_str(),
                "annotated ply"
            );

            if !store.push_annotation(generation, annotation) {
                return cancelled(generation, annotated);
            }
            annotated += 1;
            eval_before = after.score;

            if step.ply + 1 < total && !self.config.rate_limit.is_zero() {
                tokio::time::sleep(self.config.rate_limit).await;
            }
        }

        let config = &self.config;
        let completed = store.complete(generation, |session| {
            let report = review::report(&session.annotations);
            session.accuracy = report.accuracy;
            session.report = Some(report);
            session.narrative = Some(review::describe_with(&session.annotations, &session.opening, config));
        });

        if !completed {
            return cancelled(generation, annotated);
        }

        info!(annotated, "analysis completed");
        PipelineOutcome {
            generation,
            state: PipelineState::Completed,
            annotated,
        }
    }
}

fn cancelled(generation: u64, annotated: usize) -> PipelineOutcome {
    info!(generation, annotated, "analysis cancelled");
    PipelineOutcome {
        generation,
        state: PipelineState::Cancelled,
        annotated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineEvaluation;
    use crate::review::Classification;
    use crate::session::state::AnalysisSession;
    use async_trait::async_trait;
    use shakmaty::Color;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with a fixed sequence of side-to-move scores
    struct ScriptedOracle {
        scores: Vec<EngineEvaluation>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EvaluationOracle for ScriptedOracle {
        async fn evaluate(&self, _fen: &str, _depth: u8) -> EngineEvaluation {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            self.scores.get(i).cloned().unwrap_or_else(EngineEvaluation::neutral)
        }
    }

    fn pipeline(scores: Vec<EngineEvaluation>) -> AnalysisPipeline {
        let oracle = ScriptedOracle {
            scores,
            calls: AtomicUsize::new(0),
        };
        AnalysisPipeline::new(Arc::new(oracle), AnalysisConfig::default().rate_limit(Default::default()))
    }

    fn store_for(sans: &[&str]) -> SessionStore {
        let store = SessionStore::new();
        store.replace(AnalysisSession {
            moves: MoveList::from_san(sans).unwrap(),
            orientation: Color::White,
            ..AnalysisSession::default()
        });
        store
    }

    #[tokio::test]
    async fn test_scores_are_converted_to_white_pov() {
        let store = store_for(&["e4", "e5", "Qh5"]);
        // side-to-move scores: after e4 Black is to move
        let pipeline = pipeline(vec![
            EngineEvaluation::centipawns(-30),
            EngineEvaluation::centipawns(25),
            EngineEvaluation::centipawns(-400),
        ]);
        let (generation, moves) = store.begin_analysis();
        let outcome = pipeline.run(&store, generation, &moves).await;

        assert_eq!(outcome.state, PipelineState::Completed);
        let session = store.read();
        let scores: Vec<i32> = session.annotations.iter().map(|a| a.eval_after).collect();
        assert_eq!(scores, vec![30, 25, 400]);
        assert_eq!(session.annotations[2].classification, Classification::Brilliant);
        assert!(session.narrative.is_some());
        assert!(session.is_complete());
    }

    #[tokio::test]
    async fn test_mate_is_saturated() {
        let store = store_for(&["f3", "e5", "g4", "Qh4#"]);
        let pipeline = pipeline(vec![
            EngineEvaluation::centipawns(50),
            EngineEvaluation::centipawns(-60),
            EngineEvaluation::mate(1),
            EngineEvaluation::mate(0),
        ]);
        let (generation, moves) = store.begin_analysis();
        pipeline.run(&store, generation, &moves).await;

        let session = store.read();
        let last = session.annotations.last().unwrap();
        assert_eq!(session.annotations[2].eval_after, -9999);
        assert_eq!(session.annotations[2].classification, Classification::Blunder);
        assert_eq!(last.eval_after, -9999);
        assert_eq!(last.mate_in, Some(0));
    }

    #[tokio::test]
    async fn test_empty_game_completes_immediately() {
        let store = store_for(&[]);
        let (generation, moves) = store.begin_analysis();
        let outcome = pipeline(vec![]).run(&store, generation, &moves).await;

        assert_eq!(outcome.state, PipelineState::Completed);
        assert_eq!(outcome.annotated, 0);
        assert_eq!(store.read().accuracy.white, 100);
    }

    #[tokio::test]
    async fn test_superseded_run_is_cancelled() {
        let store = store_for(&["e4", "e5"]);
        let (stale, moves) = store.begin_analysis();
        store.begin_analysis();

        let outcome = pipeline(vec![]).run(&store, stale, &moves).await;
        assert_eq!(outcome.state, PipelineState::Cancelled);
        assert!(store.read().annotations.is_empty());
    }
}
