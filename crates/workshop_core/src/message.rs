pub type MessageId = u64;

/// Unix timestamp in milliseconds, supplied by the caller.
pub type Timestamp = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Display hint the backend attaches to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiHint {
    QuickReplies(Vec<String>),
    Example(String),
    Template(String),
    Warning(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub timestamp: Timestamp,
    pub section: Option<String>,
    pub step: Option<u32>,
    pub hint: Option<UiHint>,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
