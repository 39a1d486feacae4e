//! Wire payloads. Responses are camelCase; snake_case keys are accepted as aliases.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use workshop_core::{
    ChatReply, ChatStart, ChecklistItem, CoachingFeedback, CompletionStatus, Door, DoorScore,
    DoorStatus, SectionInfo, SectionStatus, SessionStatus, Timestamp, UiHint, DEFAULT_SCORE,
};

use crate::types::{
    AssessmentOutcome, AssessmentStarted, ModulePrompt, ModuleSummary, PersonalityProfile,
    WorkshopModule, WorkshopOverview,
};

const DEFAULT_PROMPT_MIN_LEN: usize = 50;
const DEFAULT_PROMPT_MAX_LEN: usize = 2000;

fn percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

fn score_or_default(value: Option<f64>) -> u8 {
    value.map_or(DEFAULT_SCORE, percent)
}

/// Decodes a `uiHint` object; unknown or malformed hints are dropped.
pub(crate) fn ui_hint_from_value(value: &Value) -> Option<UiHint> {
    let kind = value.get("type")?.as_str()?;
    let text = || {
        value
            .get("text")
            .or_else(|| value.get("content"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    };
    match kind.to_ascii_lowercase().replace('-', "_").as_str() {
        "quick_replies" | "quickreplies" | "options" => {
            let options = value
                .get("options")
                .or_else(|| value.get("replies"))?
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect();
            Some(UiHint::QuickReplies(options))
        }
        "example" => text().map(UiHint::Example),
        "template" => text().map(UiHint::Template),
        "warning" => text().map(UiHint::Warning),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionBody<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartChatRequest {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub session_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitAssessmentBody<'a> {
    pub session_id: &'a str,
    pub answers: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoachingBody<'a> {
    pub session_id: &'a str,
    pub module: u32,
    pub question_id: &'a str,
    pub answer: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDto {
    pub id: String,
    #[serde(default, alias = "order", alias = "number")]
    pub ordinal: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "quality_score", alias = "score")]
    pub quality_score: Option<f64>,
}

impl From<SectionDto> for SectionInfo {
    fn from(dto: SectionDto) -> Self {
        SectionInfo {
            id: dto.id,
            ordinal: dto.ordinal,
            title: dto.title,
            status: dto
                .status
                .as_deref()
                .map_or(SectionStatus::Locked, SectionStatus::from_label),
            quality_score: dto.quality_score.map(percent),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionDto {
    #[serde(default, alias = "percentage", alias = "fill_percentage", alias = "fillPercentage")]
    pub percent: f64,
    #[serde(default, alias = "min_percent_to_finish")]
    pub min_percent_to_finish: Option<f64>,
    #[serde(default, alias = "can_finish")]
    pub can_finish: bool,
    #[serde(default, alias = "missing_sections")]
    pub missing_sections: Vec<String>,
}

impl From<CompletionDto> for CompletionStatus {
    fn from(dto: CompletionDto) -> Self {
        CompletionStatus {
            percent: percent(dto.percent),
            min_percent_to_finish: dto.min_percent_to_finish.map_or(0, percent),
            can_finish: dto.can_finish,
            missing_sections: dto.missing_sections,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStartResponse {
    #[serde(default, alias = "session_id")]
    pub session_id: String,
    #[serde(default, alias = "greeting")]
    pub message: String,
    #[serde(default, alias = "ui_hint")]
    pub ui_hint: Option<Value>,
    #[serde(default)]
    pub sections: Vec<SectionDto>,
    #[serde(default, alias = "current_section")]
    pub current_section: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default, alias = "is_premium", alias = "unlocked")]
    pub is_premium: bool,
}

impl ChatStartResponse {
    pub fn into_chat_start(self, received_at: Timestamp) -> ChatStart {
        ChatStart {
            session_id: self.session_id,
            message: self.message,
            hint: self.ui_hint.as_ref().and_then(ui_hint_from_value),
            sections: self.sections.into_iter().map(SectionInfo::from).collect(),
            current_section: self.current_section,
            progress: percent(self.progress),
            unlocked: self.is_premium,
            received_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    #[serde(default, alias = "response", alias = "reply")]
    pub message: String,
    #[serde(default, alias = "ui_hint")]
    pub ui_hint: Option<Value>,
    #[serde(default, alias = "current_section")]
    pub current_section: Option<String>,
    #[serde(default, alias = "current_step")]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default, alias = "section_completed")]
    pub section_completed: bool,
    #[serde(default, alias = "section_text", alias = "generatedText", alias = "generated_text")]
    pub section_text: Option<String>,
    #[serde(default, alias = "next_section")]
    pub next_section: Option<String>,
    #[serde(default, alias = "is_complete")]
    pub is_complete: bool,
    #[serde(default)]
    pub completion: Option<CompletionDto>,
}

impl ChatMessageResponse {
    pub fn into_chat_reply(self, received_at: Timestamp) -> ChatReply {
        ChatReply {
            message: self.message,
            hint: self.ui_hint.as_ref().and_then(ui_hint_from_value),
            current_section: self.current_section,
            current_step: self.current_step,
            progress: percent(self.progress),
            section_completed: self.section_completed,
            section_text: self.section_text,
            next_section: self.next_section,
            is_complete: self.is_complete,
            completion: self.completion.map(CompletionStatus::from),
            received_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub sections: Vec<SectionDto>,
    #[serde(default, alias = "current_section")]
    pub current_section: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub completion: Option<CompletionDto>,
    #[serde(default, alias = "is_complete")]
    pub is_complete: bool,
}

impl From<StatusResponse> for SessionStatus {
    fn from(dto: StatusResponse) -> Self {
        SessionStatus {
            sections: dto.sections.into_iter().map(SectionInfo::from).collect(),
            current_section: dto.current_section,
            progress: percent(dto.progress),
            completion: dto.completion.map(CompletionStatus::from),
            is_complete: dto.is_complete,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChecklistItemDto {
    pub id: String,
    #[serde(default, alias = "text", alias = "title")]
    pub label: String,
    #[serde(default, alias = "completed", alias = "checked")]
    pub done: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChecklistResponse {
    #[serde(default, alias = "checklist")]
    pub items: Vec<ChecklistItemDto>,
}

impl From<ChecklistResponse> for Vec<ChecklistItem> {
    fn from(dto: ChecklistResponse) -> Self {
        dto.items
            .into_iter()
            .map(|item| ChecklistItem {
                id: item.id,
                label: item.label,
                done: item.done,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssessmentStartResponse {
    #[serde(default, alias = "session_id")]
    pub session_id: String,
    #[serde(default, alias = "assessment_id")]
    pub assessment_id: Option<String>,
}

impl From<AssessmentStartResponse> for AssessmentStarted {
    fn from(dto: AssessmentStartResponse) -> Self {
        AssessmentStarted {
            session_id: dto.session_id,
            assessment_id: dto.assessment_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DoorDto {
    #[serde(alias = "name", alias = "id")]
    pub door: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersonalityDto {
    #[serde(alias = "type", alias = "type_label", alias = "typeLabel")]
    pub label: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssessmentResultResponse {
    #[serde(default, alias = "overall_score", alias = "score")]
    pub overall_score: Option<f64>,
    #[serde(default, alias = "gz_doors", alias = "gzDoors")]
    pub doors: Vec<DoorDto>,
    #[serde(default, alias = "personality_profile", alias = "personalityProfile")]
    pub personality: Option<PersonalityDto>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl From<AssessmentResultResponse> for AssessmentOutcome {
    fn from(dto: AssessmentResultResponse) -> Self {
        let doors = dto
            .doors
            .into_iter()
            .filter_map(|door| {
                let kind = Door::from_key(&door.door)?;
                let mut score = DoorScore::from_server(kind, door.score.map(percent));
                if let Some(status) = door.status.as_deref().and_then(DoorStatus::from_key) {
                    score.status = status;
                }
                Some(score)
            })
            .collect();
        AssessmentOutcome {
            overall_score: score_or_default(dto.overall_score),
            doors,
            personality: dto.personality.map(|p| PersonalityProfile {
                label: p.label,
                traits: p.traits,
            }),
            recommendation: dto.recommendation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModuleSummaryDto {
    #[serde(alias = "module", alias = "id")]
    pub number: u32,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkshopStartResponse {
    #[serde(default, alias = "session_id")]
    pub session_id: String,
    #[serde(default)]
    pub modules: Vec<ModuleSummaryDto>,
    #[serde(default, alias = "current_module")]
    pub current_module: Option<u32>,
}

impl From<WorkshopStartResponse> for WorkshopOverview {
    fn from(dto: WorkshopStartResponse) -> Self {
        WorkshopOverview {
            session_id: dto.session_id,
            current_module: dto.current_module.unwrap_or(1),
            modules: dto
                .modules
                .into_iter()
                .map(|module| ModuleSummary {
                    number: module.number,
                    title: module.title,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptDto {
    pub id: String,
    #[serde(alias = "text", alias = "prompt")]
    pub question: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default, alias = "min_length", alias = "minLength")]
    pub min_len: Option<usize>,
    #[serde(default, alias = "max_length", alias = "maxLength")]
    pub max_len: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModuleResponse {
    #[serde(alias = "module")]
    pub number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "introduction")]
    pub intro: Option<String>,
    #[serde(default, alias = "questions")]
    pub prompts: Vec<PromptDto>,
}

impl From<ModuleResponse> for WorkshopModule {
    fn from(dto: ModuleResponse) -> Self {
        WorkshopModule {
            number: dto.number,
            title: dto.title,
            intro: dto.intro,
            prompts: dto
                .prompts
                .into_iter()
                .map(|prompt| ModulePrompt {
                    id: prompt.id,
                    question: prompt.question,
                    example: prompt.example,
                    template: prompt.template,
                    concept: prompt.concept,
                    min_len: prompt.min_len.unwrap_or(DEFAULT_PROMPT_MIN_LEN),
                    max_len: prompt.max_len.unwrap_or(DEFAULT_PROMPT_MAX_LEN),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoachingResponse {
    #[serde(default, alias = "coaching", alias = "message")]
    pub feedback: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl From<CoachingResponse> for CoachingFeedback {
    fn from(dto: CoachingResponse) -> Self {
        CoachingFeedback {
            feedback: dto.feedback,
            score: score_or_default(dto.score),
            suggestions: dto.suggestions,
            quality: None,
            is_fallback: false,
        }
    }
}
