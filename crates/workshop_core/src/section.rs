#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionStatus {
    #[default]
    Locked,
    Available,
    InProgress,
    Completed,
}

impl SectionStatus {
    /// Parses the backend's status label; unknown labels read as `Locked`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "available" => Self::Available,
            "in_progress" | "inprogress" | "active" => Self::InProgress,
            "completed" | "complete" | "done" => Self::Completed,
            _ => Self::Locked,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Available => "available",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub id: String,
    pub ordinal: u32,
    pub title: String,
    pub status: SectionStatus,
    pub quality_score: Option<u8>,
}

/// Snapshot of how far the business plan is filled in, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionStatus {
    pub percent: u8,
    pub min_percent_to_finish: u8,
    pub can_finish: bool,
    pub missing_sections: Vec<String>,
}
