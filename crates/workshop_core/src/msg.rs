use crate::{
    ChecklistItem, CompletionStatus, DocumentFormat, PersistedChat, SectionInfo, StarredTip,
    Timestamp, UiHint,
};

/// Opening payload of a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStart {
    pub session_id: String,
    pub message: String,
    pub hint: Option<UiHint>,
    pub sections: Vec<SectionInfo>,
    pub current_section: Option<String>,
    pub progress: u8,
    pub unlocked: bool,
    pub received_at: Timestamp,
}

/// Assistant answer to a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub message: String,
    pub hint: Option<UiHint>,
    pub current_section: Option<String>,
    pub current_step: Option<u32>,
    pub progress: u8,
    pub section_completed: bool,
    pub section_text: Option<String>,
    pub next_section: Option<String>,
    pub is_complete: bool,
    pub completion: Option<CompletionStatus>,
    pub received_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub sections: Vec<SectionInfo>,
    pub current_section: Option<String>,
    pub progress: u8,
    pub completion: Option<CompletionStatus>,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to open a chat session.
    StartRequested {
        user_name: Option<String>,
        user_email: Option<String>,
    },
    /// Backend opened the session.
    ChatStarted(ChatStart),
    /// User edited the message draft.
    InputChanged(String),
    /// User sent the current draft.
    MessageSubmitted { timestamp: Timestamp },
    /// Backend answered the last message.
    ReplyReceived(ChatReply),
    /// User closed the section summary.
    TransitionDismissed,
    /// A start, message or status request failed.
    RequestFailed { reason: String },
    /// User clicked retry on the error panel.
    RetryClicked,
    /// Backend reported the session status.
    StatusReceived(SessionStatus),
    /// Restore a session from local storage.
    RestoreSession(PersistedChat),
    /// Restore annotations and sidebar state from local storage.
    LocalStateRestored {
        sidebar_collapsed: bool,
        checklist: Vec<ChecklistItem>,
        starred_tips: Vec<StarredTip>,
    },
    /// User asked to reload the session status.
    RefreshRequested,
    ChecklistReceived(Vec<ChecklistItem>),
    ChecklistToggled { id: String },
    TipStarred(StarredTip),
    TipUnstarred { id: String },
    SidebarToggled,
    DocumentRequested { format: DocumentFormat },
    DocumentSaved { path: String },
    DocumentFailed { reason: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
