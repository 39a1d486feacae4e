use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use workshop_core::{AnswerSet, ChecklistItem, CoachingFeedback, DocumentFormat, SessionStatus};
use workshop_logging::{clear_session_tag, set_session_tag, workshop_debug, workshop_error};

use crate::client::{ClientSettings, ReqwestApi, WorkshopApi};
use crate::coaching::{CoachingClient, RetryPolicy};
use crate::download::{download_document, DownloadError};
use crate::dto::{ChatMessageRequest, ChatMessageResponse, ChatStartResponse, StartChatRequest};
use crate::persist::AtomicFileWriter;
use crate::types::{
    ApiError, AssessmentOutcome, AssessmentStarted, CoachingRequest, WorkshopModule,
    WorkshopOverview,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub client: ClientSettings,
    pub retry: RetryPolicy,
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            client: ClientSettings::default(),
            retry: RetryPolicy::default(),
            output_dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("api client setup failed: {0}")]
    Client(#[from] ApiError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("engine thread has stopped")]
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    StartChat(StartChatRequest),
    SendMessage(ChatMessageRequest),
    FetchStatus {
        session_id: String,
    },
    FetchChecklist {
        session_id: String,
    },
    DownloadDocument {
        session_id: String,
        title: Option<String>,
        format: DocumentFormat,
    },
    StartAssessment {
        session_id: String,
    },
    SubmitAssessment {
        session_id: String,
        answers: AnswerSet,
    },
    StartWorkshop {
        session_id: String,
    },
    FetchModule {
        session_id: String,
        number: u32,
    },
    RequestCoaching(CoachingRequest),
}

impl EngineCommand {
    /// Session the command belongs to; empty for a chat that has no id yet.
    pub fn session_id(&self) -> &str {
        match self {
            EngineCommand::StartChat(request) => &request.session_id,
            EngineCommand::SendMessage(request) => &request.session_id,
            EngineCommand::RequestCoaching(request) => &request.session_id,
            EngineCommand::FetchStatus { session_id }
            | EngineCommand::FetchChecklist { session_id }
            | EngineCommand::DownloadDocument { session_id, .. }
            | EngineCommand::StartAssessment { session_id }
            | EngineCommand::SubmitAssessment { session_id, .. }
            | EngineCommand::StartWorkshop { session_id }
            | EngineCommand::FetchModule { session_id, .. } => session_id,
        }
    }
}

#[derive(Debug)]
pub enum EngineEvent {
    ChatStarted(Result<ChatStartResponse, ApiError>),
    MessageAnswered(Result<ChatMessageResponse, ApiError>),
    StatusFetched(Result<SessionStatus, ApiError>),
    ChecklistFetched(Result<Vec<ChecklistItem>, ApiError>),
    DocumentDownloaded {
        format: DocumentFormat,
        result: Result<PathBuf, DownloadError>,
    },
    AssessmentStarted(Result<AssessmentStarted, ApiError>),
    AssessmentScored(Result<AssessmentOutcome, ApiError>),
    WorkshopStarted(Result<WorkshopOverview, ApiError>),
    ModuleFetched(Result<WorkshopModule, ApiError>),
    /// Coaching never fails; the feedback may be the local fallback.
    CoachingReady {
        question_id: String,
        feedback: CoachingFeedback,
    },
}

struct Worker {
    api: Arc<dyn WorkshopApi>,
    coaching: CoachingClient,
    writer: AtomicFileWriter,
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let api: Arc<dyn WorkshopApi> = Arc::new(ReqwestApi::new(config.client.clone())?);
        Self::with_api(api, config)
    }

    /// Runs the engine against any API implementation.
    pub fn with_api(api: Arc<dyn WorkshopApi>, config: EngineConfig) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let worker = Worker {
            coaching: CoachingClient::new(api.clone(), config.retry),
            api,
            writer: AtomicFileWriter::new(config.output_dir),
        };

        // Commands run one at a time, in the order they were sent.
        thread::Builder::new()
            .name("workshop-engine".into())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    tag_thread_with_session(&command);
                    let event = runtime.block_on(worker.handle(command));
                    if event_tx.send(event).is_err() {
                        workshop_error!("engine event dropped: receiver closed");
                    }
                }
                workshop_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx
            .send(command)
            .map_err(|_| EngineError::Disconnected)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Log lines emitted while handling `command` carry its session.
fn tag_thread_with_session(command: &EngineCommand) {
    match command.session_id() {
        "" => clear_session_tag(),
        id => set_session_tag(id),
    }
}

impl Worker {
    async fn handle(&self, command: EngineCommand) -> EngineEvent {
        let api = self.api.as_ref();
        match command {
            EngineCommand::StartChat(request) => {
                EngineEvent::ChatStarted(api.start_chat(&request).await)
            }
            EngineCommand::SendMessage(request) => {
                EngineEvent::MessageAnswered(api.send_message(&request).await)
            }
            EngineCommand::FetchStatus { session_id } => {
                EngineEvent::StatusFetched(api.fetch_status(&session_id).await)
            }
            EngineCommand::FetchChecklist { session_id } => {
                EngineEvent::ChecklistFetched(api.fetch_checklist(&session_id).await)
            }
            EngineCommand::DownloadDocument {
                session_id,
                title,
                format,
            } => {
                let result =
                    download_document(api, &self.writer, &session_id, title.as_deref(), format)
                        .await;
                EngineEvent::DocumentDownloaded { format, result }
            }
            EngineCommand::StartAssessment { session_id } => {
                EngineEvent::AssessmentStarted(api.start_assessment(&session_id).await)
            }
            EngineCommand::SubmitAssessment {
                session_id,
                answers,
            } => EngineEvent::AssessmentScored(api.submit_assessment(&session_id, &answers).await),
            EngineCommand::StartWorkshop { session_id } => {
                EngineEvent::WorkshopStarted(api.start_workshop(&session_id).await)
            }
            EngineCommand::FetchModule { session_id, number } => {
                EngineEvent::ModuleFetched(api.fetch_module(&session_id, number).await)
            }
            EngineCommand::RequestCoaching(request) => {
                let feedback = self.coaching.coach(&request).await;
                EngineEvent::CoachingReady {
                    question_id: request.question_id,
                    feedback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_thread_takes_the_command_session_tag() {
        tag_thread_with_session(&EngineCommand::FetchStatus {
            session_id: "0f3a9c71-aaaa".into(),
        });
        assert_eq!(workshop_logging::session_tag(), "0f3a9c71");

        tag_thread_with_session(&EngineCommand::StartChat(StartChatRequest {
            session_id: String::new(),
            user_name: None,
            user_email: None,
        }));
        assert_eq!(workshop_logging::session_tag(), "-");
    }
}
