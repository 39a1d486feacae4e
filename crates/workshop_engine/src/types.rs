use std::fmt;

use workshop_core::{DocumentFormat, DoorScore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentStarted {
    pub session_id: String,
    pub assessment_id: Option<String>,
}

/// Personality profile returned with the assessment result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalityProfile {
    pub label: String,
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentOutcome {
    pub overall_score: u8,
    pub doors: Vec<DoorScore>,
    pub personality: Option<PersonalityProfile>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    pub number: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopOverview {
    pub session_id: String,
    pub modules: Vec<ModuleSummary>,
    pub current_module: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePrompt {
    pub id: String,
    pub question: String,
    pub example: Option<String>,
    pub template: Option<String>,
    pub concept: Option<String>,
    pub min_len: usize,
    pub max_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopModule {
    pub number: u32,
    pub title: String,
    pub intro: Option<String>,
    pub prompts: Vec<ModulePrompt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachingRequest {
    pub session_id: String,
    pub module: u32,
    pub question_id: String,
    pub answer: String,
}

/// Binary document as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBytes {
    pub format: DocumentFormat,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}
