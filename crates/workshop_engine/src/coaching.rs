use std::sync::Arc;
use std::time::Duration;

use workshop_core::{fallback_feedback, CoachingFeedback};
use workshop_logging::{workshop_info, workshop_warn};

use crate::client::WorkshopApi;
use crate::types::CoachingRequest;

/// Linear backoff: the n-th retry waits `backoff * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

/// Coaching calls that always produce feedback.
#[derive(Clone)]
pub struct CoachingClient {
    api: Arc<dyn WorkshopApi>,
    policy: RetryPolicy,
}

impl CoachingClient {
    pub fn new(api: Arc<dyn WorkshopApi>, policy: RetryPolicy) -> Self {
        Self { api, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn coach(&self, request: &CoachingRequest) -> CoachingFeedback {
        coach_with_retry(self.api.as_ref(), request, self.policy).await
    }
}

pub async fn coach_with_retry(
    api: &dyn WorkshopApi,
    request: &CoachingRequest,
    policy: RetryPolicy,
) -> CoachingFeedback {
    let mut attempt = 0;
    loop {
        match api.request_coaching(request).await {
            Ok(feedback) => return feedback,
            Err(err) if attempt < policy.retries => {
                attempt += 1;
                workshop_warn!(
                    "coaching for {} failed ({}), retry {}/{}",
                    request.question_id,
                    err,
                    attempt,
                    policy.retries
                );
                tokio::time::sleep(policy.delay_for(attempt)).await;
            }
            Err(err) => {
                workshop_info!(
                    "coaching for {} unavailable ({}), using local feedback",
                    request.question_id,
                    err
                );
                return fallback_feedback(&request.answer);
            }
        }
    }
}
