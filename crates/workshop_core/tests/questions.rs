use proptest::prelude::*;
use workshop_core::question_ids::*;
use workshop_core::{
    can_proceed, find_question, visible_questions, AnswerSet, AssessmentWizard, QUESTIONS,
};

fn visible_ids(answers: &AnswerSet) -> Vec<&'static str> {
    visible_questions(answers).iter().map(|q| q.id).collect()
}

#[test]
fn career_change_question_only_for_lateral_entrants() {
    let answers = AnswerSet::new().with(Q_BACKGROUND, "B");
    assert!(!visible_ids(&answers).contains(&Q_CAREER_CHANGE));

    let answers = AnswerSet::new().with(Q_BACKGROUND, "D");
    assert!(visible_ids(&answers).contains(&Q_CAREER_CHANGE));

    let answers = AnswerSet::new().with(Q_BACKGROUND, "e");
    assert!(visible_ids(&answers).contains(&Q_CAREER_CHANGE));
}

#[test]
fn capital_need_hidden_until_equity_answered_with_need() {
    assert!(!visible_ids(&AnswerSet::new()).contains(&Q_CAPITAL_NEED));
    let answers = AnswerSet::new().with(Q_EQUITY, "A");
    assert!(!visible_ids(&answers).contains(&Q_CAPITAL_NEED));
    let answers = AnswerSet::new().with(Q_EQUITY, "C");
    assert!(visible_ids(&answers).contains(&Q_CAPITAL_NEED));
}

#[test]
fn empty_required_answer_blocks_proceeding() {
    let question = find_question(Q_IDEA).unwrap();
    assert!(!can_proceed(question, &AnswerSet::new()));
    assert!(!can_proceed(question, &AnswerSet::new().with(Q_IDEA, "    ")));
    assert!(can_proceed(
        question,
        &AnswerSet::new().with(Q_IDEA, "Mobile Fahrradreparatur für Pendler in Leipzig")
    ));
}

#[test]
fn choice_must_match_an_option() {
    let question = find_question(Q_BACKGROUND).unwrap();
    assert!(!can_proceed(question, &AnswerSet::new().with(Q_BACKGROUND, "Z")));
    assert!(can_proceed(question, &AnswerSet::new().with(Q_BACKGROUND, "c")));
}

#[test]
fn optional_question_may_stay_empty() {
    let question = find_question(Q_TRAINING).unwrap();
    let answers = AnswerSet::new().with(Q_COMMERCIAL, "E");
    assert!(question.is_visible(&answers));
    assert!(can_proceed(question, &answers));
}

#[test]
fn wizard_walks_visible_questions_and_prunes_hidden_answers() {
    let mut wizard = AssessmentWizard::new();
    assert_eq!(wizard.current().unwrap().id, Q_IDEA);
    assert!(!wizard.next());

    wizard.answer("Mobile Fahrradreparatur für Pendler in Leipzig");
    assert!(wizard.next());
    assert_eq!(wizard.current().unwrap().id, Q_BACKGROUND);

    wizard.answer("D");
    assert!(wizard.next());
    assert_eq!(wizard.current().unwrap().id, Q_CAREER_CHANGE);
    wizard.answer("Zehn Jahre Hobbyschrauber und Vereinsmechaniker");
    assert!(wizard.next());

    assert!(wizard.back());
    assert!(wizard.back());
    wizard.answer("A");
    assert!(!wizard.answers().is_answered(Q_CAREER_CHANGE));
    assert!(wizard.next());
    assert_eq!(wizard.current().unwrap().id, Q_COMMERCIAL);
}

#[test]
fn wizard_finishes_after_last_visible_question() {
    let answers = AnswerSet::new()
        .with(Q_IDEA, "Mobile Fahrradreparatur für Pendler in Leipzig")
        .with(Q_BACKGROUND, "A")
        .with(Q_COMMERCIAL, "A")
        .with(Q_CUSTOMERS, "Berufspendler ohne Zeit für Werkstattbesuche")
        .with(Q_EQUITY, "A")
        .with(Q_REMAINING_CLAIM, "A")
        .with(Q_FULL_TIME, "A");
    let mut wizard = AssessmentWizard::with_answers(answers);
    let mut steps = 0;
    while wizard.next() {
        steps += 1;
    }
    assert_eq!(steps, 7);
    assert!(wizard.is_finished());
    assert_eq!(wizard.progress_percent(), 100);
}

fn answer_strategy() -> impl Strategy<Value = AnswerSet> {
    let choice = prop_oneof![
        Just(String::new()),
        Just("A".to_string()),
        Just("B".to_string()),
        Just("C".to_string()),
        Just("D".to_string()),
        Just("E".to_string()),
    ];
    let text = prop_oneof![Just(String::new()), "[a-z ]{1,40}"];
    (
        choice.clone(),
        choice.clone(),
        choice,
        text.clone(),
        text,
    )
        .prop_map(|(background, commercial, equity, idea, other)| {
            AnswerSet::new()
                .with(Q_BACKGROUND, background)
                .with(Q_COMMERCIAL, commercial)
                .with(Q_EQUITY, equity)
                .with(Q_IDEA, idea)
                .with(Q_CAREER_CHANGE, other)
        })
}

proptest! {
    #[test]
    fn visible_questions_exclude_exactly_failing_conditions(answers in answer_strategy()) {
        let visible = visible_ids(&answers);
        for question in QUESTIONS {
            let expected = question.show_if.map_or(true, |c| c.evaluate(&answers));
            prop_assert_eq!(visible.contains(&question.id), expected);
        }
    }
}
