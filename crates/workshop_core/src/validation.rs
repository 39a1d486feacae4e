//! Advisory answer checks. Nothing here rejects input; callers show the hints.
use std::fmt;

/// Phrases that signal a placeholder answer instead of a concrete one.
pub const GENERIC_PHRASES: &[&str] = &[
    "alle menschen",
    "jeder",
    "jede zielgruppe",
    "gute qualität",
    "beste qualität",
    "günstige preise",
    "guter service",
    "kundenorientiert",
    "innovativ",
    "weiß ich noch nicht",
    "keine ahnung",
    "siehe oben",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    Empty,
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    Generic { phrase: &'static str },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Empty => write!(f, "Bitte beantworten Sie diese Frage."),
            ValidationIssue::TooShort { min, actual } => write!(
                f,
                "Ihre Antwort ist mit {actual} Zeichen recht kurz. Mindestens {min} Zeichen helfen der Bewertung."
            ),
            ValidationIssue::TooLong { max, actual } => write!(
                f,
                "Ihre Antwort hat {actual} Zeichen. Fassen Sie sich auf höchstens {max} Zeichen zusammen."
            ),
            ValidationIssue::Generic { phrase } => write!(
                f,
                "\"{phrase}\" ist sehr allgemein. Werden Sie konkreter: wer, was, wie viel?"
            ),
        }
    }
}

/// First generic phrase occurring in `text` as whole words, compared
/// case-insensitively.
pub fn find_generic_phrase(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    let normalized = format!(" {} ", words.join(" "));
    GENERIC_PHRASES
        .iter()
        .copied()
        .find(|phrase| normalized.contains(&format!(" {phrase} ")))
}

pub fn validate_answer(text: &str, min_len: usize, max_len: usize) -> Vec<ValidationIssue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return vec![ValidationIssue::Empty];
    }

    let mut issues = Vec::new();
    let actual = trimmed.chars().count();
    if actual < min_len {
        issues.push(ValidationIssue::TooShort {
            min: min_len,
            actual,
        });
    }
    if actual > max_len {
        issues.push(ValidationIssue::TooLong {
            max: max_len,
            actual,
        });
    }
    if let Some(phrase) = find_generic_phrase(trimmed) {
        issues.push(ValidationIssue::Generic { phrase });
    }
    issues
}
