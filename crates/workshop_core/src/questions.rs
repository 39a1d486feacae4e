//! Declarative assessment questions with conditional visibility.
use std::collections::BTreeMap;

use crate::scoring::Door;

pub type QuestionId = &'static str;

/// Raw answers keyed by question id. Choice answers hold the option key
/// (`"A"`..`"E"`), text answers hold the text as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerSet {
    answers: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question: &str, answer: impl Into<String>) -> Self {
        self.set(question, answer);
        self
    }

    pub fn set(&mut self, question: &str, answer: impl Into<String>) {
        self.answers.insert(question.to_string(), answer.into());
    }

    pub fn remove(&mut self, question: &str) -> Option<String> {
        self.answers.remove(question)
    }

    /// Trimmed answer, `None` when missing or blank.
    pub fn get(&self, question: &str) -> Option<&str> {
        self.answers
            .get(question)
            .map(|answer| answer.trim())
            .filter(|answer| !answer.is_empty())
    }

    pub fn is_answered(&self, question: &str) -> bool {
        self.get(question).is_some()
    }

    pub fn answered_count(&self) -> usize {
        self.answers
            .values()
            .filter(|answer| !answer.trim().is_empty())
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers
            .iter()
            .map(|(question, answer)| (question.as_str(), answer.as_str()))
    }
}

impl FromIterator<(String, String)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Choice(&'static [ChoiceOption]),
    Text { min_len: usize, max_len: usize },
}

/// Visibility predicate evaluated against the current answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The referenced question is answered with one of `options`.
    AnswerIn {
        question: QuestionId,
        options: &'static [&'static str],
    },
    /// The referenced question is answered with none of `options`.
    /// An unanswered question never satisfies this.
    AnswerNotIn {
        question: QuestionId,
        options: &'static [&'static str],
    },
    /// The referenced question has any non-blank answer.
    Answered(QuestionId),
}

impl Condition {
    pub fn evaluate(&self, answers: &AnswerSet) -> bool {
        match *self {
            Condition::AnswerIn { question, options } => answers
                .get(question)
                .is_some_and(|answer| options.iter().any(|option| option.eq_ignore_ascii_case(answer))),
            Condition::AnswerNotIn { question, options } => answers
                .get(question)
                .is_some_and(|answer| !options.iter().any(|option| option.eq_ignore_ascii_case(answer))),
            Condition::Answered(question) => answers.is_answered(question),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: &'static str,
    pub kind: QuestionKind,
    pub required: bool,
    pub show_if: Option<Condition>,
    pub door: Option<Door>,
}

impl Question {
    pub fn is_visible(&self, answers: &AnswerSet) -> bool {
        self.show_if
            .map_or(true, |condition| condition.evaluate(answers))
    }

    pub fn options(&self) -> &'static [ChoiceOption] {
        match self.kind {
            QuestionKind::Choice(options) => options,
            QuestionKind::Text { .. } => &[],
        }
    }
}

pub const TIER_OPTIONS_QUALIFICATION: &[ChoiceOption] = &[
    ChoiceOption {
        key: "A",
        label: "Meister, Studium oder vergleichbarer Abschluss im Gründungsfeld",
    },
    ChoiceOption {
        key: "B",
        label: "Ausbildung und mehr als drei Jahre Berufserfahrung in der Branche",
    },
    ChoiceOption {
        key: "C",
        label: "Ein bis drei Jahre Berufserfahrung in der Branche",
    },
    ChoiceOption {
        key: "D",
        label: "Quereinstieg mit verwandter Erfahrung",
    },
    ChoiceOption {
        key: "E",
        label: "Keine Erfahrung in der Branche",
    },
];

pub const TIER_OPTIONS_COMMERCIAL: &[ChoiceOption] = &[
    ChoiceOption {
        key: "A",
        label: "Kaufmännische Ausbildung oder Studium",
    },
    ChoiceOption {
        key: "B",
        label: "Budget- oder Personalverantwortung im letzten Job",
    },
    ChoiceOption {
        key: "C",
        label: "Bereits selbstständig oder nebenberuflich tätig gewesen",
    },
    ChoiceOption {
        key: "D",
        label: "Grundkenntnisse aus Kursen oder Selbststudium",
    },
    ChoiceOption {
        key: "E",
        label: "Keine kaufmännischen Kenntnisse",
    },
];

pub const EQUITY_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        key: "A",
        label: "Kein Kapitalbedarf über die laufenden Kosten hinaus",
    },
    ChoiceOption {
        key: "B",
        label: "Eigenkapital deckt den Bedarf vollständig",
    },
    ChoiceOption {
        key: "C",
        label: "Eigenkapital deckt etwa die Hälfte",
    },
    ChoiceOption {
        key: "D",
        label: "Kaum Eigenkapital, Finanzierung offen",
    },
];

pub const YES_NO_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption { key: "A", label: "Ja" },
    ChoiceOption { key: "B", label: "Nein" },
];

pub const Q_IDEA: QuestionId = "q1_geschaeftsidee";
pub const Q_BACKGROUND: QuestionId = "q2_hintergrund";
pub const Q_CAREER_CHANGE: QuestionId = "q2b_quereinsteiger";
pub const Q_COMMERCIAL: QuestionId = "q3_kaufmaennisch";
pub const Q_TRAINING: QuestionId = "q3b_weiterbildung";
pub const Q_CUSTOMERS: QuestionId = "q4_zielgruppe";
pub const Q_EQUITY: QuestionId = "q5_eigenkapital";
pub const Q_CAPITAL_NEED: QuestionId = "q5b_kapitalbedarf";
pub const Q_REMAINING_CLAIM: QuestionId = "q6_restanspruch";
pub const Q_FULL_TIME: QuestionId = "q7_hauptberuflich";

/// The GZ assessment questionnaire in display order.
pub const QUESTIONS: &[Question] = &[
    Question {
        id: Q_IDEA,
        prompt: "Beschreiben Sie Ihre Geschäftsidee in wenigen Sätzen.",
        kind: QuestionKind::Text {
            min_len: 30,
            max_len: 1500,
        },
        required: true,
        show_if: None,
        door: None,
    },
    Question {
        id: Q_BACKGROUND,
        prompt: "Welche fachliche Qualifikation bringen Sie für Ihre Gründung mit?",
        kind: QuestionKind::Choice(TIER_OPTIONS_QUALIFICATION),
        required: true,
        show_if: None,
        door: Some(Door::Fachlich),
    },
    Question {
        id: Q_CAREER_CHANGE,
        prompt: "Welche Erfahrungen aus anderen Bereichen qualifizieren Sie trotzdem?",
        kind: QuestionKind::Text {
            min_len: 20,
            max_len: 1500,
        },
        required: true,
        show_if: Some(Condition::AnswerIn {
            question: Q_BACKGROUND,
            options: &["D", "E"],
        }),
        door: Some(Door::Fachlich),
    },
    Question {
        id: Q_COMMERCIAL,
        prompt: "Welche kaufmännischen Kenntnisse haben Sie?",
        kind: QuestionKind::Choice(TIER_OPTIONS_COMMERCIAL),
        required: true,
        show_if: None,
        door: Some(Door::Kaufmaennisch),
    },
    Question {
        id: Q_TRAINING,
        prompt: "Welche Weiterbildung planen Sie, um kaufmännische Lücken zu schließen?",
        kind: QuestionKind::Text {
            min_len: 0,
            max_len: 1000,
        },
        required: false,
        show_if: Some(Condition::AnswerIn {
            question: Q_COMMERCIAL,
            options: &["D", "E"],
        }),
        door: Some(Door::Kaufmaennisch),
    },
    Question {
        id: Q_CUSTOMERS,
        prompt: "Wer sind Ihre Kundinnen und Kunden und warum kaufen sie bei Ihnen?",
        kind: QuestionKind::Text {
            min_len: 30,
            max_len: 1500,
        },
        required: true,
        show_if: Some(Condition::Answered(Q_IDEA)),
        door: None,
    },
    Question {
        id: Q_EQUITY,
        prompt: "Wie finanzieren Sie den Start?",
        kind: QuestionKind::Choice(EQUITY_OPTIONS),
        required: true,
        show_if: None,
        door: Some(Door::Finanziell),
    },
    Question {
        id: Q_CAPITAL_NEED,
        prompt: "Wie hoch ist Ihr Kapitalbedarf in Euro?",
        kind: QuestionKind::Text {
            min_len: 1,
            max_len: 20,
        },
        required: true,
        show_if: Some(Condition::AnswerNotIn {
            question: Q_EQUITY,
            options: &["A"],
        }),
        door: Some(Door::Finanziell),
    },
    Question {
        id: Q_REMAINING_CLAIM,
        prompt: "Haben Sie bei Gründung noch mindestens 150 Tage Anspruch auf Arbeitslosengeld I?",
        kind: QuestionKind::Choice(YES_NO_OPTIONS),
        required: true,
        show_if: None,
        door: Some(Door::Formal),
    },
    Question {
        id: Q_FULL_TIME,
        prompt: "Gründen Sie hauptberuflich (mindestens 15 Stunden pro Woche)?",
        kind: QuestionKind::Choice(YES_NO_OPTIONS),
        required: true,
        show_if: None,
        door: Some(Door::Formal),
    },
];

pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.id == id)
}

/// Questions whose visibility condition holds for `answers`, in table order.
pub fn visible_questions(answers: &AnswerSet) -> Vec<&'static Question> {
    QUESTIONS
        .iter()
        .filter(|question| question.is_visible(answers))
        .collect()
}

/// Whether the wizard may leave `question` with the current answers.
pub fn can_proceed(question: &Question, answers: &AnswerSet) -> bool {
    if !question.is_visible(answers) {
        return true;
    }
    let Some(answer) = answers.get(question.id) else {
        return !question.required;
    };
    match question.kind {
        QuestionKind::Choice(options) => options
            .iter()
            .any(|option| option.key.eq_ignore_ascii_case(answer)),
        QuestionKind::Text { min_len, .. } => answer.chars().count() >= min_len,
    }
}
