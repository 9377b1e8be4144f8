//! Move classification, accuracy and the written game summary

pub mod accuracy;
pub mod annotation;
pub mod classify;
pub mod narrative;

pub use accuracy::{aggregate, report, Accuracy, AccuracyReport, ClassificationCounts};
pub use annotation::Annotation;
pub use classify::{classify, Classification};
pub use narrative::{describe, describe_with};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Annotation, Classification};
    use crate::engine::NormalizedEval;
    use crate::game::MoveList;

    /// Knights hopping out and back, as long as needed.
    pub fn shuffle_moves(plies: usize) -> MoveList {
        let cycle = ["Nf3", "Nf6", "Ng1", "Ng8"];
        let sans: Vec<&str> = cycle.iter().cycle().take(plies).copied().collect();
        MoveList::from_san(&sans).unwrap()
    }

    /// Annotations carrying the given labels, in ply order.
    pub fn annotations_with(labels: &[Classification]) -> Vec<Annotation> {
        let moves = shuffle_moves(labels.len());
        moves
            .replay()
            .zip(labels)
            .map(|(step, &label)| {
                let mut annotation = Annotation::new(&step, 0, NormalizedEval::default(), None);
                annotation.classification = label;
                annotation
            })
            .collect()
    }

    /// Annotations whose White-POV score after each ply is `scores[ply]`.
    pub fn annotations_with_scores(scores: &[i32]) -> Vec<Annotation> {
        let moves = shuffle_moves(scores.len());
        let mut before = 0;
        moves
            .replay()
            .zip(scores)
            .map(|(step, &score)| {
                let after = NormalizedEval { score, mate_in: None };
                let annotation = Annotation::new(&step, before, after, None);
                before = score;
                annotation
            })
            .collect()
    }
}
