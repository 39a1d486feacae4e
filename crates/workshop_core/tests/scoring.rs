use proptest::prelude::*;
use workshop_core::question_ids::*;
use workshop_core::{
    calculate_gz_score_impact, door_scores, gap_warnings, parse_euro_amount, AnswerSet, Door,
    DoorScore, DoorStatus, DEFAULT_SCORE,
};

const TIERS: [&str; 5] = ["E", "D", "C", "B", "A"];

#[test]
fn lateral_entrant_with_long_explanation_passes_fachlich_door() {
    let answers = AnswerSet::new()
        .with(Q_BACKGROUND, "D")
        .with(Q_CAREER_CHANGE, "x".repeat(151));
    let impact = calculate_gz_score_impact(&answers);
    assert_eq!(impact.fachlich_score, 75);

    let fachlich = door_scores(&answers)
        .into_iter()
        .find(|door| door.door == Door::Fachlich)
        .unwrap();
    assert_eq!(fachlich.status, DoorStatus::Passed);
}

#[test]
fn explanation_of_exactly_150_chars_earns_no_bonus() {
    let answers = AnswerSet::new()
        .with(Q_BACKGROUND, "D")
        .with(Q_CAREER_CHANGE, "x".repeat(150));
    assert_eq!(calculate_gz_score_impact(&answers).fachlich_score, 50);
}

#[test]
fn hidden_explanation_does_not_count() {
    let answers = AnswerSet::new()
        .with(Q_BACKGROUND, "C")
        .with(Q_CAREER_CHANGE, "x".repeat(400));
    assert_eq!(calculate_gz_score_impact(&answers).fachlich_score, 80);
}

#[test]
fn formal_door_blocks_on_any_no() {
    let answers = AnswerSet::new()
        .with(Q_REMAINING_CLAIM, "A")
        .with(Q_FULL_TIME, "B");
    assert_eq!(calculate_gz_score_impact(&answers).formal_score, 0);

    let answers = AnswerSet::new()
        .with(Q_REMAINING_CLAIM, "A")
        .with(Q_FULL_TIME, "A");
    assert_eq!(calculate_gz_score_impact(&answers).formal_score, 100);

    let answers = AnswerSet::new().with(Q_REMAINING_CLAIM, "A");
    assert_eq!(calculate_gz_score_impact(&answers).formal_score, 50);
}

#[test]
fn capital_plan_adds_financing_bonus() {
    let answers = AnswerSet::new()
        .with(Q_EQUITY, "C")
        .with(Q_CAPITAL_NEED, "25.000 €");
    assert_eq!(calculate_gz_score_impact(&answers).finanziell_score, 60);

    let answers = AnswerSet::new()
        .with(Q_EQUITY, "C")
        .with(Q_CAPITAL_NEED, "viel");
    assert_eq!(calculate_gz_score_impact(&answers).finanziell_score, 50);
}

#[test]
fn euro_amounts_parse_common_spellings() {
    assert_eq!(parse_euro_amount("25000"), Some(25_000));
    assert_eq!(parse_euro_amount("25.000 €"), Some(25_000));
    assert_eq!(parse_euro_amount("1.500,50 EUR"), Some(1_500));
    assert_eq!(parse_euro_amount("ca. 20k"), None);
}

#[test]
fn overall_score_is_weighted() {
    let answers = AnswerSet::new()
        .with(Q_BACKGROUND, "A")
        .with(Q_COMMERCIAL, "A")
        .with(Q_EQUITY, "A")
        .with(Q_REMAINING_CLAIM, "A")
        .with(Q_FULL_TIME, "A");
    assert_eq!(calculate_gz_score_impact(&answers).overall, 100);
}

#[test]
fn missing_server_score_uses_default() {
    let door = DoorScore::from_server(Door::Finanziell, None);
    assert_eq!(door.score, DEFAULT_SCORE);
    assert_eq!(door.status, DoorStatus::AtRisk);
}

#[test]
fn gap_warnings_rank_blocked_doors_first() {
    let doors = vec![
        DoorScore::new(Door::Fachlich, 55),
        DoorScore::new(Door::Kaufmaennisch, 90),
        DoorScore::new(Door::Formal, 0),
    ];
    let warnings = gap_warnings(&doors);
    let order: Vec<_> = warnings.iter().map(|w| w.door.door).collect();
    assert_eq!(order, vec![Door::Formal, Door::Fachlich]);
}

proptest! {
    #[test]
    fn fachlich_score_is_monotonic_in_tier(
        lower in 0usize..4,
        explanation_len in 0usize..400,
    ) {
        let explanation = "x".repeat(explanation_len);
        let score_for = |tier: &str| {
            let answers = AnswerSet::new()
                .with(Q_BACKGROUND, tier)
                .with(Q_CAREER_CHANGE, explanation.clone());
            calculate_gz_score_impact(&answers).fachlich_score
        };
        let worse = score_for(TIERS[lower]);
        let better = score_for(TIERS[lower + 1]);
        prop_assert!(better >= worse);
    }

    #[test]
    fn kaufmaennisch_score_is_monotonic_in_tier(
        lower in 0usize..4,
        training_len in 0usize..300,
    ) {
        let training = "y".repeat(training_len);
        let score_for = |tier: &str| {
            let answers = AnswerSet::new()
                .with(Q_COMMERCIAL, tier)
                .with(Q_TRAINING, training.clone());
            calculate_gz_score_impact(&answers).kaufmaennisch_score
        };
        prop_assert!(score_for(TIERS[lower + 1]) >= score_for(TIERS[lower]));
    }
}
