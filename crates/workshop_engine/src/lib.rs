//! Workshop engine: backend API client, local storage and effect execution.
mod client;
mod coaching;
mod download;
mod dto;
mod engine;
mod filename;
mod persist;
mod types;

pub use client::{ClientSettings, ReqwestApi, WorkshopApi, SESSION_HEADER};
pub use coaching::{coach_with_retry, CoachingClient, RetryPolicy};
pub use download::{download_document, DownloadError};
pub use dto::{
    ChatMessageRequest, ChatMessageResponse, ChatStartResponse, CompletionDto, SectionDto,
    StartChatRequest, StatusResponse,
};
pub use engine::{EngineCommand, EngineConfig, EngineError, EngineEvent, EngineHandle};
pub use filename::deterministic_filename;
pub use persist::{
    ensure_output_dir, session_key, AtomicFileWriter, LocalStore, PersistError, StorageSlot,
    LAST_SESSION_KEY,
};
pub use types::{
    ApiError, AssessmentOutcome, AssessmentStarted, CoachingRequest, DocumentBytes, FailureKind,
    ModulePrompt, ModuleSummary, PersonalityProfile, WorkshopModule, WorkshopOverview,
};
