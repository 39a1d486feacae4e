//! Display hints derived from short answer histories.
use std::collections::VecDeque;

const DIFFICULTY_WINDOW: usize = 5;
const MAX_CONCEPTS: usize = 10;
const MAX_INTERVAL: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Guided,
    Standard,
    Advanced,
}

/// Rolling window over the most recent answer quality scores.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DifficultyTracker {
    recent: VecDeque<u8>,
}

impl DifficultyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: u8) {
        if self.recent.len() == DIFFICULTY_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(score.min(100));
    }

    pub fn average(&self) -> Option<u8> {
        if self.recent.is_empty() {
            return None;
        }
        let sum: u32 = self.recent.iter().map(|&score| u32::from(score)).sum();
        Some((sum / self.recent.len() as u32) as u8)
    }

    pub fn last(&self) -> Option<u8> {
        self.recent.back().copied()
    }

    pub fn difficulty(&self) -> Difficulty {
        match self.average() {
            None => Difficulty::Standard,
            Some(avg) if avg >= 80 => Difficulty::Advanced,
            Some(avg) if avg >= 55 => Difficulty::Standard,
            Some(_) => Difficulty::Guided,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scaffolding {
    Minimal,
    Partial,
    Full,
}

impl Scaffolding {
    fn raised(self) -> Self {
        match self {
            Scaffolding::Minimal => Scaffolding::Partial,
            Scaffolding::Partial | Scaffolding::Full => Scaffolding::Full,
        }
    }

    pub fn shows_examples(self) -> bool {
        self >= Scaffolding::Partial
    }

    pub fn shows_templates(self) -> bool {
        self == Scaffolding::Full
    }
}

/// Help shown for a workshop module: generous early on, sparse later,
/// raised one level after a weak answer.
pub fn scaffolding_level(module: u32, last_score: Option<u8>) -> Scaffolding {
    let base = match module {
        0..=2 => Scaffolding::Full,
        3..=4 => Scaffolding::Partial,
        _ => Scaffolding::Minimal,
    };
    match last_score {
        Some(score) if score < 50 => base.raised(),
        _ => base,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub id: String,
    pub label: String,
    pub interval: u32,
    pub due_at: u64,
    pub reviews: u32,
}

/// Spaced repetition over a handful of workshop concepts. Time is counted in
/// steps (answered prompts), not wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConceptTracker {
    concepts: Vec<Concept>,
}

impl ConceptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Starts tracking a concept, first due one step after `now_step`.
    /// Returns false when the id is known or the tracker is full.
    pub fn track(&mut self, id: &str, label: &str, now_step: u64) -> bool {
        if self.concepts.len() >= MAX_CONCEPTS || self.concepts.iter().any(|c| c.id == id) {
            return false;
        }
        self.concepts.push(Concept {
            id: id.to_string(),
            label: label.to_string(),
            interval: 1,
            due_at: now_step + 1,
            reviews: 0,
        });
        true
    }

    pub fn due(&self, now_step: u64) -> Vec<&Concept> {
        self.concepts
            .iter()
            .filter(|concept| concept.due_at <= now_step)
            .collect()
    }

    pub fn review(&mut self, id: &str, success: bool, now_step: u64) -> bool {
        let Some(concept) = self.concepts.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        concept.interval = if success {
            (concept.interval * 2).min(MAX_INTERVAL)
        } else {
            1
        };
        concept.due_at = now_step + u64::from(concept.interval);
        concept.reviews += 1;
        true
    }
}
