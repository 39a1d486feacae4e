use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use workshop_core::{AnswerSet, ChecklistItem, CoachingFeedback, DocumentFormat, SessionStatus};
use workshop_logging::{workshop_debug, workshop_warn};

use crate::dto::{
    AssessmentResultResponse, AssessmentStartResponse, ChatMessageRequest, ChatMessageResponse,
    ChatStartResponse, ChecklistResponse, CoachingBody, CoachingResponse, ModuleResponse,
    SessionBody, StartChatRequest, StatusResponse, SubmitAssessmentBody, WorkshopStartResponse,
};
use crate::types::{
    ApiError, AssessmentOutcome, AssessmentStarted, CoachingRequest, DocumentBytes, FailureKind,
    WorkshopModule, WorkshopOverview,
};

/// Header carrying the client-generated session id on every request.
pub const SESSION_HEADER: &str = "X-Session-ID";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Applied to the coaching endpoint only.
    pub coaching_timeout: Duration,
    pub max_document_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            coaching_timeout: Duration::from_secs(30),
            max_document_bytes: 25 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait WorkshopApi: Send + Sync {
    async fn start_assessment(&self, session_id: &str) -> Result<AssessmentStarted, ApiError>;

    async fn submit_assessment(
        &self,
        session_id: &str,
        answers: &AnswerSet,
    ) -> Result<AssessmentOutcome, ApiError>;

    async fn start_workshop(&self, session_id: &str) -> Result<WorkshopOverview, ApiError>;

    async fn fetch_module(&self, session_id: &str, number: u32)
        -> Result<WorkshopModule, ApiError>;

    async fn request_coaching(&self, request: &CoachingRequest)
        -> Result<CoachingFeedback, ApiError>;

    async fn start_chat(&self, request: &StartChatRequest) -> Result<ChatStartResponse, ApiError>;

    async fn send_message(
        &self,
        request: &ChatMessageRequest,
    ) -> Result<ChatMessageResponse, ApiError>;

    async fn fetch_status(&self, session_id: &str) -> Result<SessionStatus, ApiError>;

    async fn fetch_checklist(&self, session_id: &str) -> Result<Vec<ChecklistItem>, ApiError>;

    async fn download_document(
        &self,
        session_id: &str,
        format: DocumentFormat,
    ) -> Result<DocumentBytes, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(settings.base_url.trim_end_matches('/'))
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &[&str],
        session_id: &str,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        workshop_debug!("{} {}", method, url);
        Ok(self
            .client
            .request(method, url)
            .header(SESSION_HEADER, session_id))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &[&str], session_id: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path, session_id)?;
        send_json(builder).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &[&str],
        session_id: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let mut builder = self
            .request(Method::POST, path, session_id)?
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        send_json(builder).await
    }
}

#[async_trait::async_trait]
impl WorkshopApi for ReqwestApi {
    async fn start_assessment(&self, session_id: &str) -> Result<AssessmentStarted, ApiError> {
        let response: AssessmentStartResponse = self
            .post_json(
                &["api", "assessment", "start"],
                session_id,
                &SessionBody { session_id },
                None,
            )
            .await?;
        let mut started = AssessmentStarted::from(response);
        if started.session_id.is_empty() {
            started.session_id = session_id.to_string();
        }
        Ok(started)
    }

    async fn submit_assessment(
        &self,
        session_id: &str,
        answers: &AnswerSet,
    ) -> Result<AssessmentOutcome, ApiError> {
        let body = SubmitAssessmentBody {
            session_id,
            answers: answers.iter().collect::<BTreeMap<_, _>>(),
        };
        let response: AssessmentResultResponse = self
            .post_json(&["api", "assessment", "submit"], session_id, &body, None)
            .await?;
        Ok(response.into())
    }

    async fn start_workshop(&self, session_id: &str) -> Result<WorkshopOverview, ApiError> {
        let response: WorkshopStartResponse = self
            .post_json(
                &["api", "workshop", "start"],
                session_id,
                &SessionBody { session_id },
                None,
            )
            .await?;
        let mut overview = WorkshopOverview::from(response);
        if overview.session_id.is_empty() {
            overview.session_id = session_id.to_string();
        }
        Ok(overview)
    }

    async fn fetch_module(
        &self,
        session_id: &str,
        number: u32,
    ) -> Result<WorkshopModule, ApiError> {
        let number = number.to_string();
        let response: ModuleResponse = self
            .get_json(&["api", "workshop", "module", number.as_str()], session_id)
            .await?;
        Ok(response.into())
    }

    async fn request_coaching(
        &self,
        request: &CoachingRequest,
    ) -> Result<CoachingFeedback, ApiError> {
        let body = CoachingBody {
            session_id: &request.session_id,
            module: request.module,
            question_id: &request.question_id,
            answer: &request.answer,
        };
        let response: CoachingResponse = self
            .post_json(
                &["api", "workshop", "coaching"],
                &request.session_id,
                &body,
                Some(self.settings.coaching_timeout),
            )
            .await?;
        Ok(response.into())
    }

    async fn start_chat(&self, request: &StartChatRequest) -> Result<ChatStartResponse, ApiError> {
        self.post_json(
            &["api", "workshop-chat", "start"],
            &request.session_id,
            request,
            None,
        )
        .await
    }

    async fn send_message(
        &self,
        request: &ChatMessageRequest,
    ) -> Result<ChatMessageResponse, ApiError> {
        self.post_json(
            &["api", "workshop-chat", "message"],
            &request.session_id,
            request,
            None,
        )
        .await
    }

    async fn fetch_status(&self, session_id: &str) -> Result<SessionStatus, ApiError> {
        let response: StatusResponse = self
            .get_json(&["api", "workshop-chat", "status", session_id], session_id)
            .await?;
        Ok(response.into())
    }

    async fn fetch_checklist(&self, session_id: &str) -> Result<Vec<ChecklistItem>, ApiError> {
        let response: ChecklistResponse = self
            .get_json(&["api", "workshop-chat", "checklist", session_id], session_id)
            .await?;
        Ok(response.into())
    }

    async fn download_document(
        &self,
        session_id: &str,
        format: DocumentFormat,
    ) -> Result<DocumentBytes, ApiError> {
        let response = self
            .request(
                Method::GET,
                &["api", "documents", session_id, format.extension()],
                session_id,
            )?
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_document_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "document too large",
                ));
            }
        }

        let content_type = header_string(&response, CONTENT_TYPE);
        if let Some(ct) = content_type.as_deref() {
            if !is_content_type_allowed(format, ct) {
                return Err(ApiError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unexpected document type",
                ));
            }
        }
        let filename = header_string(&response, CONTENT_DISPOSITION)
            .as_deref()
            .and_then(filename_from_disposition);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "document too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(DocumentBytes {
            format,
            content_type,
            filename,
            bytes,
        })
    }
}

async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    let response = builder.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    if !status.is_success() {
        workshop_warn!("request to {} failed with {}", response.url(), status);
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn is_content_type_allowed(format: DocumentFormat, content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    let expected = match format {
        DocumentFormat::Pdf => "application/pdf",
        DocumentFormat::Docx => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        DocumentFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    };
    ct.eq_ignore_ascii_case(expected) || ct.eq_ignore_ascii_case("application/octet-stream")
}

fn filename_from_disposition(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let name = part.strip_prefix("filename=")?;
        let name = name.trim_matches('"').trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
