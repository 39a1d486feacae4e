use crate::panels::{EndowmentReminder, PaywallView};
use crate::{ChatMessage, ChecklistItem, CompletionStatus, SectionInfo, SessionPhase, StarredTip};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionView {
    pub finished_title: Option<String>,
    pub generated_text: Option<String>,
    pub next_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatViewModel {
    pub session_id: String,
    pub phase: SessionPhase,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub input_enabled: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub can_retry: bool,
    pub progress: u8,
    pub current_section_title: Option<String>,
    pub current_step: Option<u32>,
    pub sections: Vec<SectionInfo>,
    pub completion: Option<CompletionStatus>,
    pub transition: Option<TransitionView>,
    pub checklist: Vec<ChecklistItem>,
    pub starred_tips: Vec<StarredTip>,
    pub sidebar_collapsed: bool,
    pub paywall: Option<PaywallView>,
    pub endowment_reminder: Option<EndowmentReminder>,
    pub notice: Option<String>,
    pub dirty: bool,
}
