use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workshop_core::{fallback_feedback, AnswerQuality};
use workshop_engine::{
    coach_with_retry, ClientSettings, CoachingClient, CoachingRequest, ReqwestApi, RetryPolicy,
};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        retries: 2,
        backoff: Duration::from_millis(5),
    }
}

fn request(answer: &str) -> CoachingRequest {
    CoachingRequest {
        session_id: "s-1".into(),
        module: 1,
        question_id: "m1_q1".into(),
        answer: answer.into(),
    }
}

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[test]
fn backoff_is_linear() {
    let policy = RetryPolicy {
        retries: 2,
        backoff: Duration::from_millis(100),
    };
    assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    assert_eq!(RetryPolicy::default().retries, 2);
}

#[tokio::test]
async fn server_feedback_is_returned_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop/coaching"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feedback": "Sehr konkret.",
            "score": 82,
            "suggestions": ["Zahlen ergänzen"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let feedback = coach_with_retry(&api_for(&server), &request("Antwort"), fast_policy()).await;
    assert_eq!(feedback.feedback, "Sehr konkret.");
    assert_eq!(feedback.score, 82);
    assert!(!feedback.is_fallback);
}

#[tokio::test]
async fn retries_after_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop/coaching"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/workshop/coaching"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"feedback": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let feedback = coach_with_retry(&api_for(&server), &request("Antwort"), fast_policy()).await;
    assert_eq!(feedback.feedback, "ok");
    assert!(!feedback.is_fallback);
}

#[tokio::test]
async fn exhausted_retries_return_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop/coaching"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let answer = "zu kurz";
    let client = CoachingClient::new(Arc::new(api_for(&server)), fast_policy());
    let feedback = client.coach(&request(answer)).await;

    assert_eq!(feedback, fallback_feedback(answer));
    assert!(feedback.is_fallback);
    assert_eq!(feedback.quality, Some(AnswerQuality::TooShort));
}
