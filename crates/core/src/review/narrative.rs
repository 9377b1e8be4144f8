//! Rule-based game summary

use shakmaty::Color;

use super::annotation::Annotation;
use super::classify::Classification;
use crate::config::AnalysisConfig;
use crate::engine::NormalizedEval;
use crate::openings::OpeningEntry;

/// Summarizes a game using the default thresholds.
pub fn describe(annotations: &[Annotation], opening: &OpeningEntry) -> String {
    describe_with(annotations, opening, &AnalysisConfig::default())
}

pub fn describe_with(annotations: &[Annotation], opening: &OpeningEntry, config: &AnalysisConfig) -> String {
    let Some(last) = annotations.last() else {
        return "No analysis is available for this game yet.".to_string();
    };

    let mut sentences = vec![opening_sentence(opening)];

    sentences.push(
        match annotations
            .iter()
            .find(|a| a.swing().abs() > config.turning_point_swing)
        {
            Some(turn) => turning_point_sentence(turn),
            None => "No single move swung the evaluation decisively.".to_string(),
        },
    );

    let blunders = annotations
        .iter()
        .filter(|a| a.classification == Classification::Blunder)
        .count();
    if blunders > 3 {
        sentences.push(format!("It was a chaotic game with {} blunders in total.", blunders));
    } else if blunders == 0 && annotations.len() >= config.long_game_plies {
        sentences.push(format!(
            "Both players avoided blunders across all {} moves.",
            last.move_number()
        ));
    }

    sentences.push(closing_sentence(&last.evaluation()));
    sentences.join(" ")
}

fn side_name(color: Color) -> &'static str {
    if color == Color::White {
        "White"
    } else {
        "Black"
    }
}

fn favored(score: i32) -> Color {
    if score >= 0 {
        Color::White
    } else {
        Color::Black
    }
}

fn opening_sentence(opening: &OpeningEntry) -> String {
    if opening.is_custom() {
        "The game began with a custom opening.".to_string()
    } else {
        format!("The game opened with the {} ({}).", opening.name, opening.eco)
    }
}

fn turning_point_sentence(turn: &Annotation) -> String {
    let side = side_name(favored(turn.swing()));

    match turn.mate_in {
        Some(moves) if moves != 0 && favored(moves) == favored(turn.swing()) => format!(
            "The turning point came with {}, which handed {} a forced mate.",
            turn.notation(),
            side
        ),
        _ => format!(
            "The turning point came with {}, swinging the evaluation {:.2} pawns in {}'s favor.",
            turn.notation(),
            turn.swing().abs() as f32 / 100.0,
            side
        ),
    }
}

fn closing_sentence(eval: &NormalizedEval) -> String {
    let side = side_name(favored(eval.score));

    match eval.mate_in {
        Some(0) => format!("The game ended in checkmate, delivered by {}.", side),
        Some(moves) => format!(
            "The final position holds a forced mate for {}.",
            side_name(favored(moves))
        ),
        None if eval.score.abs() < 50 => "The final position is roughly balanced.".to_string(),
        None if eval.score.abs() < 200 => format!("{} finishes with a slight edge ({}).", side, eval),
        None => format!("{} finishes with a decisive advantage ({}).", side, eval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openings::OpeningBook;
    use crate::review::test_support::{annotations_with, annotations_with_scores};
    use Classification::*;

    fn ruy_lopez() -> OpeningEntry {
        OpeningBook::standard().identify(&["e4", "e5", "Nf3", "Nc6", "Bb5"])
    }

    #[test]
    fn test_empty_annotations_are_neutral() {
        let text = describe(&[], &OpeningEntry::custom());
        assert_eq!(text, "No analysis is available for this game yet.");
    }

    #[test]
    fn test_names_opening_and_turning_point() {
        // ply 2 (White's second move) throws away 3.5 pawns
        let anns = annotations_with_scores(&[20, 30, -320, -300]);
        let text = describe(&anns, &ruy_lopez());

        assert!(text.starts_with("The game opened with the Ruy Lopez (C60)."), "{}", text);
        assert!(text.contains("turning point came with 2. Ng1??"), "{}", text);
        assert!(text.contains("3.50 pawns in Black's favor"), "{}", text);
        assert!(text.ends_with("Black finishes with a decisive advantage (-3.00)."), "{}", text);
    }

    #[test]
    fn test_turning_point_needs_more_than_threshold() {
        let exact = annotations_with_scores(&[0, 250]);
        let text = describe(&exact, &OpeningEntry::custom());
        assert!(text.contains("No single move swung the evaluation decisively."), "{}", text);

        let over = annotations_with_scores(&[0, 251]);
        let text = describe(&over, &OpeningEntry::custom());
        assert!(text.contains("turning point came with 1... Nf6"), "{}", text);
        assert!(text.contains("2.51 pawns in White's favor"), "{}", text);
    }

    #[test]
    fn test_custom_opening_and_quiet_game() {
        let anns = annotations_with_scores(&[10, 0, 30, 20]);
        let text = describe(&anns, &OpeningEntry::custom());
        assert!(text.starts_with("The game began with a custom opening."));
        assert!(text.contains("No single move swung the evaluation decisively."));
        assert!(text.ends_with("The final position is roughly balanced."));
    }

    #[test]
    fn test_blunder_remarks() {
        let chaotic = annotations_with(&[Blunder, Blunder, Blunder, Best, Blunder]);
        assert!(describe(&chaotic, &OpeningEntry::custom()).contains("chaotic game with 4 blunders"));

        let clean = annotations_with(&vec![Best; 60]);
        assert!(describe(&clean, &OpeningEntry::custom()).contains("avoided blunders across all 30 moves"));

        let short = annotations_with(&[Best; 10]);
        assert!(!describe(&short, &OpeningEntry::custom()).contains("avoided blunders"));
    }

    #[test]
    fn test_forced_mate_closing() {
        let mut anns = annotations_with_scores(&[0, 150]);
        anns[1].eval_after = -9999;
        anns[1].mate_in = Some(-3);
        let text = describe(&anns, &OpeningEntry::custom());
        assert!(text.contains("handed Black a forced mate"), "{}", text);
        assert!(text.ends_with("The final position holds a forced mate for Black."), "{}", text);
    }
}
