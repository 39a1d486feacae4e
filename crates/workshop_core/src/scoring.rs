//! GZ door scoring derived from assessment answers.
use crate::questions::{
    AnswerSet, Q_BACKGROUND, Q_CAPITAL_NEED, Q_CAREER_CHANGE, Q_COMMERCIAL, Q_EQUITY,
    Q_FULL_TIME, Q_REMAINING_CLAIM, Q_TRAINING, find_question,
};

/// Substituted whenever the backend omits a score.
pub const DEFAULT_SCORE: u8 = 50;

pub const PASS_THRESHOLD: u8 = 70;
pub const AT_RISK_THRESHOLD: u8 = 40;

const CAREER_CHANGE_MIN_CHARS: usize = 150;
const CAREER_CHANGE_BONUS: u8 = 25;
const TRAINING_MIN_CHARS: usize = 100;
const TRAINING_BONUS: u8 = 20;
const CAPITAL_NEED_BONUS: u8 = 10;
const FORMAL_UNKNOWN_SCORE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Door {
    Fachlich,
    Kaufmaennisch,
    Finanziell,
    Formal,
}

impl Door {
    pub const ALL: [Door; 4] = [
        Door::Fachlich,
        Door::Kaufmaennisch,
        Door::Finanziell,
        Door::Formal,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Door::Fachlich => "fachlich",
            Door::Kaufmaennisch => "kaufmaennisch",
            Door::Finanziell => "finanziell",
            Door::Formal => "formal",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Door::ALL
            .into_iter()
            .find(|door| door.key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn title(self) -> &'static str {
        match self {
            Door::Fachlich => "Fachliche Eignung",
            Door::Kaufmaennisch => "Kaufmännische Eignung",
            Door::Finanziell => "Finanzierung",
            Door::Formal => "Formale Voraussetzungen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DoorStatus {
    Blocked,
    AtRisk,
    Passed,
}

impl DoorStatus {
    pub fn from_score(score: u8) -> Self {
        if score >= PASS_THRESHOLD {
            DoorStatus::Passed
        } else if score >= AT_RISK_THRESHOLD {
            DoorStatus::AtRisk
        } else {
            DoorStatus::Blocked
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            DoorStatus::Blocked => "blocked",
            DoorStatus::AtRisk => "at_risk",
            DoorStatus::Passed => "passed",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "blocked" | "failed" => Some(DoorStatus::Blocked),
            "at_risk" | "atrisk" | "warning" => Some(DoorStatus::AtRisk),
            "passed" | "ok" => Some(DoorStatus::Passed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorScore {
    pub door: Door,
    pub score: u8,
    pub status: DoorStatus,
}

impl DoorScore {
    pub fn new(door: Door, score: u8) -> Self {
        let score = score.min(100);
        Self {
            door,
            score,
            status: DoorStatus::from_score(score),
        }
    }

    /// Builds a door score from a backend value, substituting the default
    /// score when the backend sent none.
    pub fn from_server(door: Door, score: Option<u8>) -> Self {
        Self::new(door, score.unwrap_or(DEFAULT_SCORE))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzScoreImpact {
    pub fachlich_score: u8,
    pub kaufmaennisch_score: u8,
    pub finanziell_score: u8,
    pub formal_score: u8,
    pub overall: u8,
}

impl GzScoreImpact {
    pub fn score_for(&self, door: Door) -> u8 {
        match door {
            Door::Fachlich => self.fachlich_score,
            Door::Kaufmaennisch => self.kaufmaennisch_score,
            Door::Finanziell => self.finanziell_score,
            Door::Formal => self.formal_score,
        }
    }
}

pub fn calculate_gz_score_impact(answers: &AnswerSet) -> GzScoreImpact {
    let fachlich_score = fachlich_score(answers);
    let kaufmaennisch_score = kaufmaennisch_score(answers);
    let finanziell_score = finanziell_score(answers);
    let formal_score = formal_score(answers);
    let weighted = u32::from(fachlich_score) * 30
        + u32::from(kaufmaennisch_score) * 30
        + u32::from(finanziell_score) * 20
        + u32::from(formal_score) * 20;
    GzScoreImpact {
        fachlich_score,
        kaufmaennisch_score,
        finanziell_score,
        formal_score,
        overall: (weighted / 100) as u8,
    }
}

pub fn door_scores(answers: &AnswerSet) -> Vec<DoorScore> {
    let impact = calculate_gz_score_impact(answers);
    Door::ALL
        .into_iter()
        .map(|door| DoorScore::new(door, impact.score_for(door)))
        .collect()
}

fn fachlich_score(answers: &AnswerSet) -> u8 {
    let base: u8 = match answers.get(Q_BACKGROUND).map(str::to_ascii_uppercase).as_deref() {
        Some("A") => 100,
        Some("B") => 90,
        Some("C") => 80,
        Some("D") => 50,
        Some("E") => 30,
        _ => 0,
    };
    let bonus = if visible_text_longer_than(answers, Q_CAREER_CHANGE, CAREER_CHANGE_MIN_CHARS) {
        CAREER_CHANGE_BONUS
    } else {
        0
    };
    base.saturating_add(bonus).min(100)
}

fn kaufmaennisch_score(answers: &AnswerSet) -> u8 {
    let base: u8 = match answers.get(Q_COMMERCIAL).map(str::to_ascii_uppercase).as_deref() {
        Some("A") => 100,
        Some("B") => 85,
        Some("C") => 70,
        Some("D") => 45,
        Some("E") => 25,
        _ => 0,
    };
    let bonus = if visible_text_longer_than(answers, Q_TRAINING, TRAINING_MIN_CHARS) {
        TRAINING_BONUS
    } else {
        0
    };
    base.saturating_add(bonus).min(100)
}

fn finanziell_score(answers: &AnswerSet) -> u8 {
    let base: u8 = match answers.get(Q_EQUITY).map(str::to_ascii_uppercase).as_deref() {
        Some("A") => 100,
        Some("B") => 75,
        Some("C") => 50,
        Some("D") => 25,
        _ => 0,
    };
    let planned = is_visible(answers, Q_CAPITAL_NEED)
        && answers
            .get(Q_CAPITAL_NEED)
            .and_then(parse_euro_amount)
            .is_some_and(|amount| amount > 0);
    let bonus = if planned { CAPITAL_NEED_BONUS } else { 0 };
    base.saturating_add(bonus).min(100)
}

fn formal_score(answers: &AnswerSet) -> u8 {
    let claim = answers.get(Q_REMAINING_CLAIM);
    let full_time = answers.get(Q_FULL_TIME);
    let is_no = |answer: Option<&str>| answer.is_some_and(|a| a.eq_ignore_ascii_case("B"));
    let is_yes = |answer: Option<&str>| answer.is_some_and(|a| a.eq_ignore_ascii_case("A"));
    if is_no(claim) || is_no(full_time) {
        0
    } else if is_yes(claim) && is_yes(full_time) {
        100
    } else {
        FORMAL_UNKNOWN_SCORE
    }
}

fn is_visible(answers: &AnswerSet, question: &str) -> bool {
    find_question(question).is_some_and(|q| q.is_visible(answers))
}

fn visible_text_longer_than(answers: &AnswerSet, question: &str, min_chars: usize) -> bool {
    is_visible(answers, question)
        && answers
            .get(question)
            .is_some_and(|text| text.chars().count() > min_chars)
}

/// Parses amounts like `25000`, `25.000`, `25.000 €` or `25000 EUR`.
pub fn parse_euro_amount(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches("EUR")
        .trim_end_matches("Euro")
        .trim_end_matches('€')
        .chars()
        .filter(|c| !matches!(c, '.' | ' ' | '\''))
        .collect();
    let whole = cleaned.split(',').next()?;
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}
