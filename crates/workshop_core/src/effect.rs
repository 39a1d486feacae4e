use crate::{ChecklistItem, PersistedChat, StarredTip};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartChat {
        session_id: String,
        user_name: Option<String>,
        user_email: Option<String>,
    },
    SendMessage {
        session_id: String,
        text: String,
        section: Option<String>,
    },
    FetchStatus { session_id: String },
    FetchChecklist { session_id: String },
    PersistSession(PersistedChat),
    PersistAnnotations {
        session_id: String,
        checklist: Vec<ChecklistItem>,
        starred_tips: Vec<StarredTip>,
    },
    PersistSidebar { session_id: String, collapsed: bool },
    DownloadDocument {
        session_id: String,
        format: DocumentFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Xlsx,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Xlsx => "xlsx",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" | "word" => Some(DocumentFormat::Docx),
            "xlsx" | "excel" => Some(DocumentFormat::Xlsx),
            _ => None,
        }
    }
}
