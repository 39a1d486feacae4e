use workshop_core::{
    classify_answer, endowment_reminder, fallback_feedback, scaffolding_level, validate_answer,
    AnswerQuality, ConceptTracker, Difficulty, DifficultyTracker, Scaffolding, ValidationIssue,
};

#[test]
fn difficulty_follows_recent_average() {
    let mut tracker = DifficultyTracker::new();
    assert_eq!(tracker.difficulty(), Difficulty::Standard);

    tracker.record(30);
    tracker.record(40);
    assert_eq!(tracker.difficulty(), Difficulty::Guided);

    for _ in 0..5 {
        tracker.record(90);
    }
    // The two weak scores have left the five-entry window.
    assert_eq!(tracker.average(), Some(90));
    assert_eq!(tracker.difficulty(), Difficulty::Advanced);
}

#[test]
fn scaffolding_decreases_across_modules() {
    assert_eq!(scaffolding_level(1, None), Scaffolding::Full);
    assert_eq!(scaffolding_level(3, None), Scaffolding::Partial);
    assert_eq!(scaffolding_level(6, Some(80)), Scaffolding::Minimal);
    assert_eq!(scaffolding_level(6, Some(30)), Scaffolding::Partial);
    assert_eq!(scaffolding_level(2, Some(10)), Scaffolding::Full);
    assert!(Scaffolding::Partial.shows_examples());
    assert!(!Scaffolding::Partial.shows_templates());
}

#[test]
fn concepts_come_due_and_back_off_on_success() {
    let mut tracker = ConceptTracker::new();
    assert!(tracker.track("usp", "Alleinstellungsmerkmal", 0));
    assert!(!tracker.track("usp", "Alleinstellungsmerkmal", 0));
    assert!(tracker.due(0).is_empty());
    assert_eq!(tracker.due(1).len(), 1);

    assert!(tracker.review("usp", true, 1));
    assert!(tracker.due(2).is_empty());
    assert_eq!(tracker.due(3).len(), 1);

    assert!(tracker.review("usp", false, 3));
    assert_eq!(tracker.concepts()[0].interval, 1);
    assert_eq!(tracker.due(4).len(), 1);
    assert!(!tracker.review("unknown", true, 4));
}

#[test]
fn concept_tracker_holds_at_most_ten_concepts() {
    let mut tracker = ConceptTracker::new();
    for i in 0..10 {
        assert!(tracker.track(&format!("c{i}"), "Begriff", 0));
    }
    assert!(!tracker.track("c10", "Begriff", 0));
    assert_eq!(tracker.concepts().len(), 10);
}

#[test]
fn validation_reports_length_and_generic_phrases() {
    assert_eq!(validate_answer("   ", 10, 100), vec![ValidationIssue::Empty]);
    assert_eq!(
        validate_answer("Kurz", 10, 100),
        vec![ValidationIssue::TooShort { min: 10, actual: 4 }]
    );
    let issues = validate_answer("Wir bieten günstige Preise für Familien in Halle.", 10, 30);
    assert!(issues.contains(&ValidationIssue::TooLong { max: 30, actual: 49 }));
    assert!(issues.contains(&ValidationIssue::Generic {
        phrase: "günstige preise"
    }));
}

#[test]
fn generic_phrases_match_whole_words_only() {
    assert!(validate_answer(
        "Ich bin jederzeit per Telefon für meine Stammkunden in Köln erreichbar.",
        10,
        500
    )
    .is_empty());
    assert_eq!(
        classify_answer("Ich bin jederzeit per Telefon für meine Stammkunden in Köln erreichbar."),
        AnswerQuality::Solid
    );
    assert_eq!(
        validate_answer("Für jeder, der ein Rad hat.", 10, 500),
        vec![ValidationIssue::Generic { phrase: "jeder" }]
    );
    assert_eq!(
        validate_answer("Sehr GUTE   Qualität, zu fairen Preisen.", 10, 500),
        vec![ValidationIssue::Generic {
            phrase: "gute qualität"
        }]
    );
}

#[test]
fn fallback_is_deterministic_by_length_and_genericity() {
    assert_eq!(classify_answer("zu kurz"), AnswerQuality::TooShort);
    assert_eq!(
        classify_answer("Unsere Kunden sind alle Menschen, die gerne Fahrrad fahren wollen."),
        AnswerQuality::Generic
    );
    assert_eq!(classify_answer(&"a".repeat(1501)), AnswerQuality::TooLong);
    assert_eq!(
        classify_answer("Berufspendler zwischen 25 und 45 Jahren im Leipziger Süden ohne eigene Werkstatt."),
        AnswerQuality::Solid
    );

    let first = fallback_feedback("zu kurz");
    let second = fallback_feedback("zu kurz");
    assert_eq!(first, second);
    assert!(first.is_fallback);
    assert_eq!(first.score, 30);
    assert!(!first.suggestions.is_empty());
}

#[test]
fn endowment_reminder_only_mid_way() {
    assert!(endowment_reminder(10, 3).is_none());
    assert!(endowment_reminder(50, 0).is_none());
    assert!(endowment_reminder(100, 8).is_none());
    let reminder = endowment_reminder(45, 6).unwrap();
    assert!(reminder.text.contains("45%"));
}
