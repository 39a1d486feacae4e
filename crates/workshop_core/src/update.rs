use crate::{ChatState, Effect, Msg, SessionPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ChatState, msg: Msg) -> (ChatState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested {
            user_name,
            user_email,
        } => {
            if state.phase() != SessionPhase::Idle || state.is_loading() {
                return (state, Vec::new());
            }
            state.set_user(user_name.clone(), user_email.clone());
            let request = Effect::StartChat {
                session_id: state.session_id().to_string(),
                user_name,
                user_email,
            };
            vec![state.begin_request(request)]
        }
        Msg::ChatStarted(start) => {
            if state.phase() != SessionPhase::Idle {
                return (state, Vec::new());
            }
            state.finish_request();
            state.apply_start(start);
            vec![
                Effect::PersistSession(state.snapshot()),
                Effect::FetchChecklist {
                    session_id: state.session_id().to_string(),
                },
            ]
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::MessageSubmitted { timestamp } => {
            if !state.accepts_input() || state.input().trim().is_empty() {
                return (state, Vec::new());
            }
            let text = state.take_input().trim().to_string();
            state.push_message(crate::Role::User, text.clone(), timestamp, None);
            let request = Effect::SendMessage {
                session_id: state.session_id().to_string(),
                text,
                section: state.current_section().map(ToOwned::to_owned),
            };
            vec![state.begin_request(request)]
        }
        Msg::ReplyReceived(reply) => {
            // A reply can only answer a message sent from the active phase.
            if !state.is_loading() || state.phase() != SessionPhase::Active {
                return (state, Vec::new());
            }
            state.finish_request();
            state.apply_reply(reply);
            vec![Effect::PersistSession(state.snapshot())]
        }
        Msg::TransitionDismissed => {
            if state.phase() != SessionPhase::Transitioning || !state.dismiss_transition() {
                return (state, Vec::new());
            }
            vec![Effect::PersistSession(state.snapshot())]
        }
        Msg::RequestFailed { reason: _ } => {
            if !state.is_loading() {
                return (state, Vec::new());
            }
            state.fail_request();
            Vec::new()
        }
        Msg::RetryClicked => state.retry_request().into_iter().collect(),
        Msg::StatusReceived(status) => {
            if state.phase() == SessionPhase::Idle && !state.is_loading() {
                return (state, Vec::new());
            }
            state.finish_request();
            state.apply_status(status);
            vec![Effect::PersistSession(state.snapshot())]
        }
        Msg::RestoreSession(snapshot) => {
            if state.phase() != SessionPhase::Idle
                || !state.messages().is_empty()
                || state.is_loading()
            {
                return (state, Vec::new());
            }
            state.restore(snapshot);
            let session_id = state.session_id().to_string();
            vec![
                state.begin_request(Effect::FetchStatus {
                    session_id: session_id.clone(),
                }),
                Effect::FetchChecklist { session_id },
            ]
        }
        Msg::LocalStateRestored {
            sidebar_collapsed,
            checklist,
            starred_tips,
        } => {
            state.restore_local(sidebar_collapsed, checklist, starred_tips);
            Vec::new()
        }
        Msg::RefreshRequested => {
            if state.phase() == SessionPhase::Idle || state.is_loading() {
                return (state, Vec::new());
            }
            let request = Effect::FetchStatus {
                session_id: state.session_id().to_string(),
            };
            vec![state.begin_request(request)]
        }
        Msg::ChecklistReceived(items) => {
            if state.annotations_mut().merge_checklist(items) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ChecklistToggled { id } => {
            if !state.annotations_mut().toggle(&id) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![persist_annotations(&state)]
        }
        Msg::TipStarred(tip) => {
            if !state.annotations_mut().star(tip) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![persist_annotations(&state)]
        }
        Msg::TipUnstarred { id } => {
            if !state.annotations_mut().unstar(&id) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![persist_annotations(&state)]
        }
        Msg::SidebarToggled => {
            let collapsed = state.toggle_sidebar();
            vec![Effect::PersistSidebar {
                session_id: state.session_id().to_string(),
                collapsed,
            }]
        }
        Msg::DocumentRequested { format } => {
            if !state.can_download() {
                state.set_notice("Dokumente stehen bereit, sobald Ihr Businessplan vollständig ist.");
                return (state, Vec::new());
            }
            state.set_notice(format!("Dokument ({}) wird erstellt...", format.extension()));
            vec![Effect::DownloadDocument {
                session_id: state.session_id().to_string(),
                format,
            }]
        }
        Msg::DocumentSaved { path } => {
            state.set_notice(format!("Dokument gespeichert: {path}"));
            Vec::new()
        }
        Msg::DocumentFailed { reason: _ } => {
            state.set_notice("Das Dokument konnte nicht geladen werden.");
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn persist_annotations(state: &ChatState) -> Effect {
    Effect::PersistAnnotations {
        session_id: state.session_id().to_string(),
        checklist: state.checklist().to_vec(),
        starred_tips: state.starred_tips().to_vec(),
    }
}
