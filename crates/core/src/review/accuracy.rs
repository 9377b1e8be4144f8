//! Per-side accuracy from classified annotations

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::classify::Classification;

/// Accuracy percentages, 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accuracy {
    pub white: u8,
    pub black: u8,
}

impl Default for Accuracy {
    fn default() -> Self {
        Self { white: 100, black: 100 }
    }
}

/// How often each label occurred for one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub brilliant: u32,
    pub good: u32,
    pub best: u32,
    pub inaccuracy: u32,
    pub mistake: u32,
    pub blunder: u32,
}

impl ClassificationCounts {
    fn record(&mut self, classification: Classification) {
        let slot = match classification {
            Classification::Brilliant => &mut self.brilliant,
            Classification::Good => &mut self.good,
            Classification::Best => &mut self.best,
            Classification::Inaccuracy => &mut self.inaccuracy,
            Classification::Mistake => &mut self.mistake,
            Classification::Blunder => &mut self.blunder,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.brilliant + self.good + self.best + self.inaccuracy + self.mistake + self.blunder
    }
}

/// Accuracy plus the label breakdown behind it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub accuracy: Accuracy,
    pub white: ClassificationCounts,
    pub black: ClassificationCounts,
}

/// Mean classification weight per side. Even plies are White's, odd plies
/// Black's; a side without moves scores 100.
pub fn aggregate(annotations: &[Annotation]) -> Accuracy {
    let mut totals = [(0u32, 0u32); 2];

    for (ply, annotation) in annotations.iter().enumerate() {
        let side = &mut totals[ply % 2];
        side.0 += annotation.classification.weight();
        side.1 += 1;
    }

    Accuracy {
        white: mean_weight(totals[0]),
        black: mean_weight(totals[1]),
    }
}

pub fn report(annotations: &[Annotation]) -> AccuracyReport {
    let mut white = ClassificationCounts::default();
    let mut black = ClassificationCounts::default();

    for (ply, annotation) in annotations.iter().enumerate() {
        let counts = if ply % 2 == 0 { &mut white } else { &mut black };
        counts.record(annotation.classification);
    }

    AccuracyReport {
        accuracy: aggregate(annotations),
        white,
        black,
    }
}

fn mean_weight((sum, count): (u32, u32)) -> u8 {
    if count == 0 {
        return 100;
    }
    (sum as f64 / count as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::test_support::annotations_with;
    use Classification::*;

    #[test]
    fn test_empty_is_perfect() {
        assert_eq!(aggregate(&[]), Accuracy { white: 100, black: 100 });
    }

    #[test]
    fn test_all_blunders_on_one_side() {
        let anns = annotations_with(&[Blunder, Best, Blunder, Best, Blunder, Best]);
        assert_eq!(aggregate(&anns), Accuracy { white: 0, black: 100 });
    }

    #[test]
    fn test_mean_is_rounded() {
        // White: Mistake(30) + Good(90) + Inaccuracy(70) = 190/3 = 63.33
        // Black: Best(100) + Inaccuracy(70) = 85
        let anns = annotations_with(&[Mistake, Best, Good, Inaccuracy, Inaccuracy]);
        assert_eq!(aggregate(&anns), Accuracy { white: 63, black: 85 });
    }

    #[test]
    fn test_single_move_game_leaves_black_vacuous() {
        let anns = annotations_with(&[Mistake]);
        assert_eq!(aggregate(&anns), Accuracy { white: 30, black: 100 });
    }

    #[test]
    fn test_report_counts() {
        let anns = annotations_with(&[Brilliant, Blunder, Best, Blunder]);
        let report = report(&anns);
        assert_eq!(report.white.brilliant, 1);
        assert_eq!(report.white.best, 1);
        assert_eq!(report.black.blunder, 2);
        assert_eq!(report.black.total(), 2);
        assert_eq!(report.accuracy, Accuracy { white: 100, black: 0 });
    }
}
