use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workshop_core::question_ids::{Q_BACKGROUND, Q_IDEA};
use workshop_core::{AnswerSet, Door, DoorStatus, SectionStatus, UiHint, DEFAULT_SCORE};
use workshop_engine::{
    ChatMessageRequest, ClientSettings, CoachingRequest, FailureKind, ReqwestApi,
    StartChatRequest, WorkshopApi,
};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[test]
fn rejects_invalid_base_url() {
    let err = ReqwestApi::new(ClientSettings {
        base_url: "not a url".into(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn start_chat_sends_session_header_and_decodes_camel_case() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop-chat/start"))
        .and(header("X-Session-ID", "s-1"))
        .and(body_partial_json(json!({"sessionId": "s-1", "userName": "Anna"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessionId": "s-1",
            "message": "Willkommen!",
            "uiHint": {"type": "quick_replies", "options": ["Ja", "Nein"]},
            "sections": [
                {"id": "idea", "ordinal": 1, "title": "Geschäftsidee", "status": "available"},
                {"id": "market", "ordinal": 2, "title": "Markt"}
            ],
            "currentSection": "idea",
            "progress": 12.6,
            "isPremium": true
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let request = StartChatRequest {
        session_id: "s-1".into(),
        user_name: Some("Anna".into()),
        user_email: None,
    };
    let start = api.start_chat(&request).await.expect("start").into_chat_start(7);

    assert_eq!(start.session_id, "s-1");
    assert_eq!(start.progress, 13);
    assert!(start.unlocked);
    assert_eq!(start.received_at, 7);
    assert_eq!(
        start.hint,
        Some(UiHint::QuickReplies(vec!["Ja".into(), "Nein".into()]))
    );
    assert_eq!(start.sections[0].status, SectionStatus::Available);
    assert_eq!(start.sections[1].status, SectionStatus::Locked);
}

#[tokio::test]
async fn send_message_accepts_snake_case_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop-chat/message"))
        .and(body_partial_json(json!({"message": "Ich plane ein Café"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Danke!",
            "current_section": "market",
            "current_step": 2,
            "progress": 40,
            "section_completed": true,
            "generated_text": "Zusammenfassung",
            "next_section": "market",
            "is_complete": false,
            "completion": {"fill_percentage": 40, "can_finish": false, "missing_sections": ["finance"]}
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let request = ChatMessageRequest {
        session_id: "s-1".into(),
        message: "Ich plane ein Café".into(),
        section: Some("idea".into()),
    };
    let reply = api.send_message(&request).await.expect("reply").into_chat_reply(1);

    assert_eq!(reply.message, "Danke!");
    assert!(reply.section_completed);
    assert_eq!(reply.section_text.as_deref(), Some("Zusammenfassung"));
    assert_eq!(reply.next_section.as_deref(), Some("market"));
    assert_eq!(reply.current_step, Some(2));
    let completion = reply.completion.expect("completion");
    assert_eq!(completion.percent, 40);
    assert_eq!(completion.missing_sections, vec!["finance".to_string()]);
}

#[tokio::test]
async fn status_and_checklist_use_session_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workshop-chat/status/s-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sections": [{"id": "idea", "ordinal": 1, "title": "Idee", "status": "completed", "qualityScore": 81}],
            "currentSection": "market",
            "progress": 55,
            "isComplete": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/workshop-chat/checklist/s-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "c1", "label": "Lebenslauf", "done": true}, {"id": "c2", "text": "Angebote"}]
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let status = api.fetch_status("s-9").await.expect("status");
    assert_eq!(status.progress, 55);
    assert_eq!(status.sections[0].quality_score, Some(81));
    assert_eq!(status.current_section.as_deref(), Some("market"));

    let checklist = api.fetch_checklist("s-9").await.expect("checklist");
    assert_eq!(checklist.len(), 2);
    assert!(checklist[0].done);
    assert_eq!(checklist[1].label, "Angebote");
    assert!(!checklist[1].done);
}

#[tokio::test]
async fn assessment_result_falls_back_to_default_scores() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/assessment/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"assessmentId": "a-1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/assessment/submit"))
        .and(body_partial_json(json!({"answers": {"q2_hintergrund": "A"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gz_doors": [
                {"door": "fachlich", "score": 90},
                {"door": "finanziell", "status": "blocked"},
                {"door": "unknown", "score": 10}
            ],
            "personality": {"type": "Macher", "traits": ["pragmatisch"]}
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let started = api.start_assessment("s-2").await.expect("start");
    assert_eq!(started.session_id, "s-2");
    assert_eq!(started.assessment_id.as_deref(), Some("a-1"));

    let answers = AnswerSet::new()
        .with(Q_BACKGROUND, "A")
        .with(Q_IDEA, "Ein mobiles Fahrradreparatur-Angebot für Pendler");
    let outcome = api.submit_assessment("s-2", &answers).await.expect("submit");
    assert_eq!(outcome.overall_score, DEFAULT_SCORE);
    assert_eq!(outcome.doors.len(), 2);
    assert_eq!(outcome.doors[0].door, Door::Fachlich);
    assert_eq!(outcome.doors[0].status, DoorStatus::Passed);
    assert_eq!(outcome.doors[1].score, DEFAULT_SCORE);
    assert_eq!(outcome.doors[1].status, DoorStatus::Blocked);
    assert_eq!(outcome.personality.expect("profile").label, "Macher");
}

#[tokio::test]
async fn workshop_module_defaults_prompt_lengths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessionId": "w-1",
            "modules": [{"number": 1, "title": "Geschäftsidee"}, {"number": 2, "title": "Markt"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/workshop/module/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "module": 2,
            "title": "Markt",
            "questions": [{"id": "m2_q1", "text": "Wer sind Ihre Kunden?", "minLength": 80}]
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let overview = api.start_workshop("w-1").await.expect("overview");
    assert_eq!(overview.current_module, 1);
    assert_eq!(overview.modules.len(), 2);

    let module = api.fetch_module("w-1", 2).await.expect("module");
    assert_eq!(module.prompts[0].question, "Wer sind Ihre Kunden?");
    assert_eq!(module.prompts[0].min_len, 80);
    assert_eq!(module.prompts[0].max_len, 2000);
}

#[tokio::test]
async fn non_success_status_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workshop-chat/status/s-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_status("s-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn garbage_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workshop-chat/checklist/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_checklist("s-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn coaching_request_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workshop/coaching"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"feedback": "spät"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let api = ReqwestApi::new(ClientSettings {
        base_url: server.uri(),
        coaching_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");
    let request = CoachingRequest {
        session_id: "s-1".into(),
        module: 1,
        question_id: "m1_q1".into(),
        answer: "Antwort".into(),
    };
    let err = api.request_coaching(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = ReqwestApi::new(ClientSettings {
        base_url: format!("http://{addr}"),
        ..ClientSettings::default()
    })
    .expect("client");
    let err = api.fetch_status("s-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn session_ids_are_encoded_as_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api/workshop-chat/status/a%2Fb%3Fc%23d"))
        .and(header("X-Session-ID", "a/b?c#d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"progress": 55})))
        .expect(1)
        .mount(&server)
        .await;

    let api = ReqwestApi::new(ClientSettings {
        base_url: format!("{}/backend/", server.uri()),
        ..ClientSettings::default()
    })
    .expect("client");
    let status = api.fetch_status("a/b?c#d").await.expect("status");
    assert_eq!(status.progress, 55);
}
