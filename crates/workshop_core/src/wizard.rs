use crate::questions::{can_proceed, visible_questions, AnswerSet, Question, QUESTIONS};
use crate::scoring::{door_scores, DoorScore};

/// Step-by-step walk over the visible assessment questions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssessmentWizard {
    answers: AnswerSet,
    step: usize,
}

impl AssessmentWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: AnswerSet) -> Self {
        let mut wizard = Self { answers, step: 0 };
        wizard.prune_hidden();
        wizard
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current(&self) -> Option<&'static Question> {
        visible_questions(&self.answers).get(self.step).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    pub fn answer(&mut self, text: &str) {
        let Some(question) = self.current() else {
            return;
        };
        self.answers.set(question.id, text.trim());
        self.prune_hidden();
    }

    pub fn can_proceed(&self) -> bool {
        self.current()
            .is_some_and(|question| can_proceed(question, &self.answers))
    }

    /// Moves to the next visible question. Returns false when blocked.
    pub fn next(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        self.step += 1;
        true
    }

    pub fn back(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        true
    }

    pub fn progress_percent(&self) -> u8 {
        let total = visible_questions(&self.answers).len();
        if total == 0 {
            return 100;
        }
        ((self.step.min(total) * 100) / total) as u8
    }

    pub fn door_preview(&self) -> Vec<DoorScore> {
        door_scores(&self.answers)
    }

    // Answers of questions that just became hidden must not leak into scoring
    // or the submission.
    fn prune_hidden(&mut self) {
        loop {
            let hidden: Vec<&str> = QUESTIONS
                .iter()
                .filter(|question| {
                    self.answers.is_answered(question.id) && !question.is_visible(&self.answers)
                })
                .map(|question| question.id)
                .collect();
            if hidden.is_empty() {
                break;
            }
            for id in hidden {
                self.answers.remove(id);
            }
        }
    }
}
