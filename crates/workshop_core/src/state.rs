use crate::annotations::Annotations;
use crate::msg::{ChatReply, ChatStart, SessionStatus};
use crate::panels::{endowment_reminder, paywall};
use crate::view_model::{ChatViewModel, TransitionView};
use crate::{
    ChatMessage, ChecklistItem, CompletionStatus, Effect, MessageId, Role, SectionInfo,
    SectionStatus, StarredTip, Timestamp, UiHint,
};

/// Shown for every failed request; the technical reason only goes to the log.
pub const REQUEST_FAILED_TEXT: &str = "Verbindung fehlgeschlagen. Bitte erneut versuchen.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    Transitioning,
    Complete,
}

/// Summary of a section the backend just closed, shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub finished_section: Option<String>,
    pub generated_text: Option<String>,
    pub next_section: Option<String>,
    /// The backend reported the whole plan as finished with this section.
    pub completes_session: bool,
}

/// The part of a session kept in local storage between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedChat {
    pub session_id: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub progress: u8,
    pub current_section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatState {
    session_id: String,
    user_name: Option<String>,
    user_email: Option<String>,
    phase: SessionPhase,
    messages: Vec<ChatMessage>,
    next_message_id: MessageId,
    input: String,
    loading: bool,
    error: Option<String>,
    pending_request: Option<Effect>,
    progress: u8,
    current_section: Option<String>,
    current_step: Option<u32>,
    sections: Vec<SectionInfo>,
    completion: Option<CompletionStatus>,
    transition: Option<Transition>,
    annotations: Annotations,
    sidebar_collapsed: bool,
    unlocked: bool,
    notice: Option<String>,
    dirty: bool,
}

impl ChatState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            next_message_id: 1,
            ..Self::default()
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    pub fn sections(&self) -> &[SectionInfo] {
        &self.sections
    }

    pub fn completion(&self) -> Option<&CompletionStatus> {
        self.completion.as_ref()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn starred_tips(&self) -> &[StarredTip] {
        self.annotations.starred_tips()
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        self.annotations.checklist()
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn view(&self) -> ChatViewModel {
        let current_section_title = self
            .current_section
            .as_deref()
            .and_then(|id| self.section(id))
            .map(|section| section.title.clone());
        let answered = self.messages.iter().filter(|m| m.is_user()).count();
        ChatViewModel {
            session_id: self.session_id.clone(),
            phase: self.phase,
            messages: self.messages.clone(),
            input: self.input.clone(),
            input_enabled: self.accepts_input(),
            loading: self.loading,
            error: self.error.clone(),
            can_retry: self.error.is_some() && self.pending_request.is_some(),
            progress: self.progress,
            current_section_title,
            current_step: self.current_step,
            sections: self.sections.clone(),
            completion: self.completion.clone(),
            transition: self.transition.as_ref().map(|transition| TransitionView {
                finished_title: transition
                    .finished_section
                    .as_deref()
                    .and_then(|id| self.section(id))
                    .map(|section| section.title.clone()),
                generated_text: transition.generated_text.clone(),
                next_title: transition
                    .next_section
                    .as_deref()
                    .and_then(|id| self.section(id))
                    .map(|section| section.title.clone()),
            }),
            checklist: self.annotations.checklist().to_vec(),
            starred_tips: self.annotations.starred_tips().to_vec(),
            sidebar_collapsed: self.sidebar_collapsed,
            paywall: paywall(&self.sections, self.current_section.as_deref(), self.unlocked),
            endowment_reminder: endowment_reminder(self.progress, answered),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn snapshot(&self) -> PersistedChat {
        PersistedChat {
            session_id: self.session_id.clone(),
            user_name: self.user_name.clone(),
            user_email: self.user_email.clone(),
            progress: self.progress,
            current_section: self.current_section.clone(),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn accepts_input(&self) -> bool {
        self.phase == SessionPhase::Active && !self.loading
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    pub(crate) fn set_user(&mut self, name: Option<String>, email: Option<String>) {
        self.user_name = name;
        self.user_email = email;
    }

    /// Marks a request as in flight and remembers it for a manual retry.
    pub(crate) fn begin_request(&mut self, request: Effect) -> Effect {
        self.loading = true;
        self.error = None;
        self.pending_request = Some(request.clone());
        self.mark_dirty();
        request
    }

    pub(crate) fn finish_request(&mut self) {
        self.loading = false;
        self.error = None;
        self.pending_request = None;
        self.mark_dirty();
    }

    pub(crate) fn fail_request(&mut self) {
        self.loading = false;
        self.error = Some(REQUEST_FAILED_TEXT.to_string());
        self.mark_dirty();
    }

    pub(crate) fn retry_request(&mut self) -> Option<Effect> {
        if self.error.is_none() || self.loading {
            return None;
        }
        let request = self.pending_request.clone()?;
        Some(self.begin_request(request))
    }

    pub(crate) fn push_message(
        &mut self,
        role: Role,
        text: String,
        timestamp: Timestamp,
        hint: Option<UiHint>,
    ) {
        let id = self.next_message_id.max(1);
        self.next_message_id = id + 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            timestamp,
            section: self.current_section.clone(),
            step: self.current_step,
            hint,
        });
        self.mark_dirty();
    }

    pub(crate) fn apply_start(&mut self, start: ChatStart) {
        if !start.session_id.is_empty() {
            self.session_id = start.session_id;
        }
        self.phase = SessionPhase::Active;
        self.sections = start.sections;
        self.progress = start.progress.min(100);
        self.unlocked = start.unlocked;
        self.current_section = start
            .current_section
            .or_else(|| self.first_open_section());
        self.current_step = None;
        if let Some(id) = self.current_section.clone() {
            self.set_section_status(&id, SectionStatus::InProgress);
        }
        self.push_message(Role::Assistant, start.message, start.received_at, start.hint);
    }

    pub(crate) fn apply_reply(&mut self, reply: ChatReply) {
        self.push_message(Role::Assistant, reply.message, reply.received_at, reply.hint);
        self.progress = reply.progress.min(100);
        if reply.completion.is_some() {
            self.completion = reply.completion;
        }
        if reply.current_step.is_some() {
            self.current_step = reply.current_step;
        }

        if reply.section_completed {
            let finished = self.current_section.clone();
            if let Some(id) = finished.as_deref() {
                self.set_section_status(id, SectionStatus::Completed);
            }
            let next_section = if reply.is_complete {
                None
            } else {
                reply
                    .next_section
                    .or_else(|| finished.as_deref().and_then(|id| self.section_after(id)))
            };
            self.transition = Some(Transition {
                finished_section: finished,
                generated_text: reply.section_text,
                next_section,
                completes_session: reply.is_complete,
            });
            self.phase = SessionPhase::Transitioning;
        } else if reply.is_complete {
            self.phase = SessionPhase::Complete;
        } else if let Some(section) = reply.current_section {
            if self.current_section.as_deref() != Some(section.as_str()) {
                self.select_section(section);
            }
        }
    }

    pub(crate) fn dismiss_transition(&mut self) -> bool {
        let Some(transition) = self.transition.take() else {
            return false;
        };
        match transition.next_section.filter(|_| !transition.completes_session) {
            Some(next) => {
                self.select_section(next);
                self.phase = SessionPhase::Active;
            }
            None => {
                self.phase = SessionPhase::Complete;
            }
        }
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_status(&mut self, status: SessionStatus) {
        if !status.sections.is_empty() {
            self.sections = status.sections;
        }
        self.progress = status.progress.min(100);
        self.completion = status.completion;
        if status.current_section.is_some() {
            self.current_section = status.current_section;
        }
        match self.phase {
            SessionPhase::Idle | SessionPhase::Active if status.is_complete => {
                self.phase = SessionPhase::Complete;
            }
            SessionPhase::Idle => self.phase = SessionPhase::Active,
            _ => {}
        }
        self.mark_dirty();
    }

    pub(crate) fn restore(&mut self, snapshot: PersistedChat) {
        if !snapshot.session_id.is_empty() {
            self.session_id = snapshot.session_id;
        }
        self.user_name = snapshot.user_name;
        self.user_email = snapshot.user_email;
        self.progress = snapshot.progress.min(100);
        self.current_section = snapshot.current_section;
        self.mark_dirty();
    }

    pub(crate) fn restore_local(
        &mut self,
        sidebar_collapsed: bool,
        checklist: Vec<ChecklistItem>,
        starred_tips: Vec<StarredTip>,
    ) {
        self.sidebar_collapsed = sidebar_collapsed;
        self.annotations = Annotations::new(checklist, starred_tips);
        self.mark_dirty();
    }

    pub(crate) fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    pub(crate) fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.mark_dirty();
        self.sidebar_collapsed
    }

    pub(crate) fn can_download(&self) -> bool {
        self.completion.as_ref().is_some_and(|c| c.can_finish)
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    fn section(&self, id: &str) -> Option<&SectionInfo> {
        self.sections.iter().find(|section| section.id == id)
    }

    fn select_section(&mut self, id: String) {
        self.set_section_status(&id, SectionStatus::InProgress);
        self.current_section = Some(id);
        self.current_step = None;
        self.mark_dirty();
    }

    fn set_section_status(&mut self, id: &str, status: SectionStatus) {
        if let Some(section) = self.sections.iter_mut().find(|section| section.id == id) {
            section.status = status;
        }
    }

    fn first_open_section(&self) -> Option<String> {
        self.sections
            .iter()
            .filter(|section| section.status != SectionStatus::Completed)
            .min_by_key(|section| section.ordinal)
            .map(|section| section.id.clone())
    }

    fn section_after(&self, id: &str) -> Option<String> {
        let ordinal = self.section(id)?.ordinal;
        self.sections
            .iter()
            .filter(|section| section.ordinal > ordinal && section.status != SectionStatus::Completed)
            .min_by_key(|section| section.ordinal)
            .map(|section| section.id.clone())
    }
}
