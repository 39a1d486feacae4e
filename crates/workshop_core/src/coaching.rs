//! Canned coaching used when the coaching service cannot be reached.
use crate::validation::find_generic_phrase;

const MIN_SOLID_CHARS: usize = 50;
const MAX_SOLID_CHARS: usize = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerQuality {
    TooShort,
    Generic,
    TooLong,
    Solid,
}

impl AnswerQuality {
    pub fn score(self) -> u8 {
        match self {
            AnswerQuality::TooShort => 30,
            AnswerQuality::Generic => 50,
            AnswerQuality::TooLong => 60,
            AnswerQuality::Solid => 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachingFeedback {
    pub feedback: String,
    pub score: u8,
    pub suggestions: Vec<String>,
    pub quality: Option<AnswerQuality>,
    pub is_fallback: bool,
}

pub fn classify_answer(answer: &str) -> AnswerQuality {
    let trimmed = answer.trim();
    let len = trimmed.chars().count();
    if len < MIN_SOLID_CHARS {
        AnswerQuality::TooShort
    } else if find_generic_phrase(trimmed).is_some() {
        AnswerQuality::Generic
    } else if len > MAX_SOLID_CHARS {
        AnswerQuality::TooLong
    } else {
        AnswerQuality::Solid
    }
}

/// Deterministic feedback computed from the answer alone.
pub fn fallback_feedback(answer: &str) -> CoachingFeedback {
    let quality = classify_answer(answer);
    let (feedback, suggestions): (&str, &[&str]) = match quality {
        AnswerQuality::TooShort => (
            "Ihre Antwort ist noch sehr knapp. Die Agentur für Arbeit erwartet nachvollziehbare Details.",
            &[
                "Beschreiben Sie konkrete Beispiele aus Ihrer Erfahrung.",
                "Nennen Sie Zahlen, wo es möglich ist.",
            ],
        ),
        AnswerQuality::Generic => (
            "Ihre Antwort enthält allgemeine Formulierungen. Machen Sie sie greifbarer.",
            &[
                "Ersetzen Sie Schlagworte durch konkrete Fakten.",
                "Beschreiben Sie, was Sie von Wettbewerbern unterscheidet.",
            ],
        ),
        AnswerQuality::TooLong => (
            "Ihre Antwort ist sehr ausführlich. Konzentrieren Sie sich auf das Wesentliche.",
            &["Fassen Sie die drei wichtigsten Punkte zusammen."],
        ),
        AnswerQuality::Solid => (
            "Gute Grundlage. Prüfen Sie, ob ein Gutachter alle Angaben nachvollziehen kann.",
            &["Ergänzen Sie eine Quelle oder Zahl, die Ihre Aussage belegt."],
        ),
    };
    CoachingFeedback {
        feedback: feedback.to_string(),
        score: quality.score(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        quality: Some(quality),
        is_fallback: true,
    }
}
