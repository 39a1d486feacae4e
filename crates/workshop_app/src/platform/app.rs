use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::Result;
use workshop_core::{update, ChatState, ChatViewModel, Msg, Role, StarredTip};
use workshop_logging::{set_session_tag, workshop_info};

use super::config::AppConfig;
use super::effects::{now, EffectRunner};
use super::input::{parse_chat_line, resolve_reference, ChatCommand, HELP_TEXT};
use super::persistence;
use super::render::ChatRenderer;

const TICK: Duration = Duration::from_millis(75);

pub(crate) struct ChatApp {
    state: ChatState,
    runner: EffectRunner,
    renderer: ChatRenderer,
}

impl ChatApp {
    pub(crate) fn new(runner: EffectRunner, session_id: String) -> Self {
        set_session_tag(&session_id);
        Self {
            state: ChatState::new(session_id),
            runner,
            renderer: ChatRenderer::new(),
        }
    }

    /// Restores local state and either resumes or opens the session.
    pub(crate) fn start(&mut self, config: &AppConfig) {
        let session_id = self.state.session_id().to_string();
        let store = self.runner.store().clone();
        self.dispatch(persistence::load_local_state(&store, &session_id));
        match persistence::load_chat(&store, &session_id) {
            Some(snapshot) => self.dispatch(Msg::RestoreSession(snapshot)),
            None => self.dispatch(Msg::StartRequested {
                user_name: config.user_name.clone(),
                user_email: config.user_email.clone(),
            }),
        }
    }

    pub(crate) fn run(&mut self, lines: mpsc::Receiver<String>) -> Result<()> {
        println!("Tippen Sie /help für alle Befehle.");
        loop {
            while let Some(msg) = self.runner.poll() {
                self.dispatch(msg);
            }
            match lines.recv_timeout(TICK) {
                Ok(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => self.dispatch(Msg::Tick),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        workshop_info!("chat closed");
        Ok(())
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let view = self.state.view();
        match parse_chat_line(line) {
            ChatCommand::Quit => return false,
            ChatCommand::Empty => {}
            ChatCommand::Help => println!("{HELP_TEXT}"),
            ChatCommand::Invalid(usage) => println!("Verwendung: {usage}"),
            ChatCommand::Send(text) => {
                self.dispatch(Msg::InputChanged(text));
                self.dispatch(Msg::MessageSubmitted { timestamp: now() });
            }
            ChatCommand::Retry => self.dispatch(Msg::RetryClicked),
            ChatCommand::Next => self.dispatch(Msg::TransitionDismissed),
            ChatCommand::Status => self.dispatch(Msg::RefreshRequested),
            ChatCommand::Sidebar => self.dispatch(Msg::SidebarToggled),
            ChatCommand::Download(format) => self.dispatch(Msg::DocumentRequested { format }),
            ChatCommand::Star => match latest_tip(&view) {
                Some(tip) => self.dispatch(Msg::TipStarred(tip)),
                None => println!("Noch keine Antwort zum Merken."),
            },
            ChatCommand::Unstar(reference) => {
                let ids: Vec<&str> = view.starred_tips.iter().map(|t| t.id.as_str()).collect();
                match resolve_reference(&reference, &ids) {
                    Some(id) => self.dispatch(Msg::TipUnstarred { id: id.to_string() }),
                    None => println!("Kein Tipp {reference}."),
                }
            }
            ChatCommand::Check(reference) => {
                let ids: Vec<&str> = view.checklist.iter().map(|c| c.id.as_str()).collect();
                match resolve_reference(&reference, &ids) {
                    Some(id) => self.dispatch(Msg::ChecklistToggled { id: id.to_string() }),
                    None => println!("Kein Checklistenpunkt {reference}."),
                }
            }
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);

        if let Some(view) = view {
            // The backend may assign a different session id on start.
            set_session_tag(&view.session_id);
            for line in self.renderer.render(&view) {
                println!("{line}");
            }
        }
    }
}

fn latest_tip(view: &ChatViewModel) -> Option<StarredTip> {
    view.messages
        .iter()
        .rev()
        .find(|message| message.role == Role::Assistant)
        .map(|message| StarredTip {
            id: format!("tip-{}", message.id),
            text: message.text.clone(),
            section: message.section.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use workshop_core::ChatMessage;

    #[test]
    fn latest_tip_uses_last_assistant_message() {
        let mut view = ChatViewModel::default();
        assert_eq!(latest_tip(&view), None);

        view.messages = vec![
            ChatMessage {
                id: 1,
                role: Role::Assistant,
                text: "Nennen Sie Zahlen.".into(),
                timestamp: 1,
                section: Some("idea".into()),
                step: None,
                hint: None,
            },
            ChatMessage {
                id: 2,
                role: Role::User,
                text: "ok".into(),
                timestamp: 2,
                section: Some("idea".into()),
                step: None,
                hint: None,
            },
        ];
        let tip = latest_tip(&view).unwrap();
        assert_eq!(tip.id, "tip-1");
        assert_eq!(tip.section.as_deref(), Some("idea"));
    }
}
