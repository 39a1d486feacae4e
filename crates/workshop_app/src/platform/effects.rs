use std::time::{Duration, Instant};

use chrono::Utc;
use workshop_core::{Effect, Msg, Timestamp};
use workshop_engine::{
    ChatMessageRequest, EngineCommand, EngineEvent, EngineHandle, LocalStore, StartChatRequest,
};
use workshop_logging::{workshop_debug, workshop_error, workshop_info, workshop_warn};

use super::persistence;

pub(crate) fn now() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Executes effects against the engine and local storage, and turns engine
/// events back into messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    store: LocalStore,
    document_title: String,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle, store: LocalStore, document_title: String) -> Self {
        Self {
            engine,
            store,
            document_title,
        }
    }

    pub(crate) fn store(&self) -> &LocalStore {
        &self.store
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartChat {
                    session_id,
                    user_name,
                    user_email,
                } => self.send(EngineCommand::StartChat(StartChatRequest {
                    session_id,
                    user_name,
                    user_email,
                })),
                Effect::SendMessage {
                    session_id,
                    text,
                    section,
                } => {
                    workshop_debug!("sending message len={} section={:?}", text.len(), section);
                    self.send(EngineCommand::SendMessage(ChatMessageRequest {
                        session_id,
                        message: text,
                        section,
                    }));
                }
                Effect::FetchStatus { session_id } => {
                    self.send(EngineCommand::FetchStatus { session_id })
                }
                Effect::FetchChecklist { session_id } => {
                    self.send(EngineCommand::FetchChecklist { session_id })
                }
                Effect::PersistSession(snapshot) => persistence::save_chat(&self.store, &snapshot),
                Effect::PersistAnnotations {
                    session_id,
                    checklist,
                    starred_tips,
                } => persistence::save_annotations(
                    &self.store,
                    &session_id,
                    &checklist,
                    &starred_tips,
                ),
                Effect::PersistSidebar {
                    session_id,
                    collapsed,
                } => persistence::save_sidebar(&self.store, &session_id, collapsed),
                Effect::DownloadDocument { session_id, format } => {
                    workshop_info!("downloading {}", format.extension());
                    self.send(EngineCommand::DownloadDocument {
                        session_id,
                        title: Some(self.document_title.clone()),
                        format,
                    });
                }
            }
        }
    }

    pub(crate) fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().and_then(event_to_msg)
    }

    /// Blocks until `pick` accepts an event or `timeout` elapses. Events
    /// `pick` rejects are dropped.
    pub(crate) fn await_event<T>(
        &self,
        timeout: Duration,
        mut pick: impl FnMut(EngineEvent) -> Option<T>,
    ) -> Option<T> {
        let deadline = Instant::now() + timeout;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            let event = self.engine.recv_timeout(remaining)?;
            if let Some(value) = pick(event) {
                return Some(value);
            }
        }
        workshop_warn!("no engine response within {:?}", timeout);
        None
    }

    pub(crate) fn send(&self, command: EngineCommand) {
        if let Err(err) = self.engine.send(command) {
            workshop_error!("cannot reach engine: {}", err);
        }
    }
}

/// Chat-related events as messages; everything else is ignored.
pub(crate) fn event_to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ChatStarted(result) => Some(match result {
            Ok(response) => Msg::ChatStarted(response.into_chat_start(now())),
            Err(err) => failed("start", err),
        }),
        EngineEvent::MessageAnswered(result) => Some(match result {
            Ok(response) => Msg::ReplyReceived(response.into_chat_reply(now())),
            Err(err) => failed("message", err),
        }),
        EngineEvent::StatusFetched(result) => Some(match result {
            Ok(status) => Msg::StatusReceived(status),
            Err(err) => failed("status", err),
        }),
        // The checklist is fetched alongside other requests and must not fail them.
        EngineEvent::ChecklistFetched(result) => match result {
            Ok(items) => Some(Msg::ChecklistReceived(items)),
            Err(err) => {
                workshop_warn!("checklist unavailable: {}", err);
                None
            }
        },
        EngineEvent::DocumentDownloaded { format, result } => Some(match result {
            Ok(path) => Msg::DocumentSaved {
                path: path.display().to_string(),
            },
            Err(err) => {
                workshop_warn!("{} download failed: {}", format.extension(), err);
                Msg::DocumentFailed {
                    reason: err.to_string(),
                }
            }
        }),
        other => {
            workshop_debug!("ignoring engine event {:?}", other);
            None
        }
    }
}

fn failed(request: &str, err: impl std::fmt::Display) -> Msg {
    workshop_warn!("{} request failed: {}", request, err);
    Msg::RequestFailed {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workshop_core::{ChecklistItem, DocumentFormat, SessionStatus};
    use workshop_engine::{ApiError, DownloadError, FailureKind};

    fn api_error() -> ApiError {
        ApiError {
            kind: FailureKind::Timeout,
            message: "timed out".into(),
        }
    }

    #[test]
    fn failed_requests_become_request_failed() {
        let msg = event_to_msg(EngineEvent::StatusFetched(Err(api_error())));
        assert!(matches!(msg, Some(Msg::RequestFailed { .. })));
    }

    #[test]
    fn status_is_forwarded() {
        let status = SessionStatus {
            sections: Vec::new(),
            current_section: None,
            progress: 40,
            completion: None,
            is_complete: false,
        };
        assert_eq!(
            event_to_msg(EngineEvent::StatusFetched(Ok(status.clone()))),
            Some(Msg::StatusReceived(status))
        );
    }

    #[test]
    fn checklist_failure_is_swallowed() {
        assert_eq!(event_to_msg(EngineEvent::ChecklistFetched(Err(api_error()))), None);
        let items = vec![ChecklistItem {
            id: "c1".into(),
            label: "Lebenslauf".into(),
            done: false,
        }];
        assert_eq!(
            event_to_msg(EngineEvent::ChecklistFetched(Ok(items.clone()))),
            Some(Msg::ChecklistReceived(items))
        );
    }

    #[test]
    fn download_outcomes_map_to_notices() {
        let failed = event_to_msg(EngineEvent::DocumentDownloaded {
            format: DocumentFormat::Pdf,
            result: Err(DownloadError::Empty),
        });
        assert!(matches!(failed, Some(Msg::DocumentFailed { .. })));

        let saved = event_to_msg(EngineEvent::DocumentDownloaded {
            format: DocumentFormat::Pdf,
            result: Ok("output/plan.pdf".into()),
        });
        assert_eq!(
            saved,
            Some(Msg::DocumentSaved {
                path: "output/plan.pdf".into()
            })
        );
    }
}
