//! Workshop core: pure chat store, question tables and scoring helpers.
mod annotations;
mod coaching;
mod effect;
mod hints;
mod message;
mod msg;
mod panels;
mod questions;
mod scoring;
mod section;
mod state;
mod update;
mod validation;
mod view_model;
mod wizard;

pub use annotations::{Annotations, ChecklistItem, StarredTip};
pub use coaching::{classify_answer, fallback_feedback, AnswerQuality, CoachingFeedback};
pub use effect::{DocumentFormat, Effect};
pub use hints::{
    scaffolding_level, Concept, ConceptTracker, Difficulty, DifficultyTracker, Scaffolding,
};
pub use message::{ChatMessage, MessageId, Role, Timestamp, UiHint};
pub use msg::{ChatReply, ChatStart, Msg, SessionStatus};
pub use panels::{
    endowment_reminder, gap_warnings, paywall, EndowmentReminder, GapWarning, PaywallView,
    FREE_SECTIONS,
};
pub use questions::{
    can_proceed, find_question, visible_questions, AnswerSet, ChoiceOption, Condition, Question,
    QuestionId, QuestionKind, QUESTIONS,
};
pub use scoring::{
    calculate_gz_score_impact, door_scores, parse_euro_amount, Door, DoorScore, DoorStatus,
    GzScoreImpact, DEFAULT_SCORE,
};
pub use section::{CompletionStatus, SectionInfo, SectionStatus};
pub use state::{ChatState, PersistedChat, SessionPhase, Transition, REQUEST_FAILED_TEXT};
pub use update::update;
pub use validation::{find_generic_phrase, validate_answer, ValidationIssue};
pub use view_model::{ChatViewModel, TransitionView};
pub use wizard::AssessmentWizard;

pub mod question_ids {
    //! Stable ids of the assessment questions.
    pub use crate::questions::{
        Q_BACKGROUND, Q_CAPITAL_NEED, Q_CAREER_CHANGE, Q_COMMERCIAL, Q_CUSTOMERS, Q_EQUITY,
        Q_FULL_TIME, Q_IDEA, Q_REMAINING_CLAIM, Q_TRAINING,
    };
}
