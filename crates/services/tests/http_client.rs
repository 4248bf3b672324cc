use std::sync::Arc;

use serde_json::json;
use services::{ApiError, ClientConfig, HttpStudyApi, StudyApi, StudyService, StudyServiceError};
use study_core::{SyncRequest, SyncTicket};
use study_core::model::{Difficulty, GenerateRequest, ProgressAction, SessionId, UserId};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

fn user() -> UserId {
    UserId::new("ada").expect("user id")
}

async fn setup() -> (MockServer, HttpStudyApi) {
    let server = MockServer::start().await;
    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .expect("mock server uri");
    let api = HttpStudyApi::new(&config).expect("http client");
    (server, api)
}

#[tokio::test]
async fn lists_sessions_most_recent_first() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/sessions/list/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 2,
            "sessions": [
                {
                    "session_id": "ada_20240101_090000",
                    "syllabus": "Rust",
                    "difficulty": "beginner",
                    "days": 3,
                    "total_topics": 6,
                    "completed_count": 1,
                    "completion_percentage": 17,
                    "created_at": "2024-01-01T09:00:00.000000",
                    "last_updated": "2024-01-01T09:00:00.000000",
                    "progress": {}
                },
                {
                    "session_id": "ada_20240105_090000",
                    "syllabus": "Go",
                    "difficulty": "advanced",
                    "days": "N/A",
                    "total_topics": "4",
                    "completed_count": 0,
                    "completion_percentage": 0,
                    "created_at": "2024-01-05T09:00:00",
                    "last_updated": null
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = StudyService::new(Arc::new(api));
    let sessions = service.list_sessions(&user()).await.expect("list");

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].session_id.as_str(), "ada_20240105_090000");
    assert_eq!(sessions[0].total_topics, 4);
    assert_eq!(sessions[0].days, "N/A");
    assert_eq!(sessions[1].days, "3");
    assert_eq!(sessions[1].completion_percentage, 17);
}

#[tokio::test]
async fn resume_sends_user_and_parses_fenced_plan() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/session/ada_20240101_090000"))
        .and(query_param("user_id", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "session": {
                "session_id": "ada_20240101_090000",
                "user_id": "ada",
                "study_plan": "```json\n{\"plan\": [{\"day\": 1, \"time_slot\": \"09:00 - 10:00\", \"topic\": \"Ownership\"}, {\"day\": 1, \"time_slot\": \"11:00\", \"topic\": \"Borrowing\"}]}\n```",
                "notes": "<h1>Notes</h1>",
                "resources": "<ul><li>Book</li></ul>",
                "notes_file": "notes/ada.md",
                "progress": {"Ownership": {"completed": true, "completed_at": "2024-01-01T10:00:00"}}
            }
        })))
        .mount(&server)
        .await;

    let service = StudyService::new(Arc::new(api));
    let id = SessionId::new("ada_20240101_090000").expect("session id");
    let session = service.resume(&id, &user()).await.expect("resume");

    assert_eq!(session.plan.len(), 2);
    assert_eq!(session.plan.entries()[1].topic, "Borrowing");
    assert_eq!(session.notes_file, "notes/ada.md");
    assert_eq!(session.completed_topics(), 1);
}

#[tokio::test]
async fn generate_posts_validated_request() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_json(json!({
            "user_id": "ada",
            "syllabus": "Rust basics",
            "days": 2,
            "difficulty": "beginner"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "session_id": "ada_20240101_090000",
            "study_plan": [
                {"day": 1, "time_slot": "09:00", "topic": "Syntax"},
                {"day": 2, "time_slot": "09:00", "topic": "Traits"}
            ],
            "notes": "<p>notes</p>",
            "resources": "<p>links</p>",
            "notes_file": null,
            "trace_summary": {
                "total_traces": 1,
                "total_duration": 3.5,
                "traces": [{"agent": "StudyPlanAgent", "function": "generate", "status": "success", "duration": 3.5}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = StudyService::new(Arc::new(api));
    let request = GenerateRequest {
        user_id: user(),
        syllabus: "Rust basics".into(),
        days: 2,
        difficulty: Difficulty::Beginner,
    };
    let session = service.generate(&request).await.expect("generate");

    assert_eq!(session.id.as_str(), "ada_20240101_090000");
    assert_eq!(session.plan.len(), 2);
    assert_eq!(session.notes_file, "N/A");
    assert_eq!(session.trace_summary.total_traces, 1);
    assert!(session.progress.is_empty());
}

#[tokio::test]
async fn progress_update_returns_stats() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/progress/ada_1"))
        .and(body_json(json!({"user_id": "ada", "topic": "Traits", "action": "uncomplete"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Marked Traits as incomplete",
            "stats": {"completed_count": 0, "total_topics": 2, "completion_percentage": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = StudyService::new(Arc::new(api));
    let request = SyncRequest {
        topic: "Traits".into(),
        action: ProgressAction::Uncomplete,
        ticket: SyncTicket::default(),
    };
    let stats = service
        .record_progress(&SessionId::new("ada_1").expect("id"), &user(), &request)
        .await
        .expect("progress")
        .expect("stats");
    assert_eq!(stats.total_topics, 2);
    assert_eq!(stats.completed_count, 0);
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "quota exceeded"})),
        )
        .mount(&server)
        .await;

    let request = GenerateRequest {
        user_id: user(),
        syllabus: "Rust".into(),
        days: 1,
        difficulty: Difficulty::Advanced,
    };
    match api.generate(&request).await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unsuccessful_envelope_is_an_error() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/sessions/list/ada"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "disk unavailable"})),
        )
        .mount(&server)
        .await;

    match api.list_sessions(&user()).await {
        Err(ApiError::Unsuccessful(message)) => assert_eq!(message, "disk unavailable"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn missing_session_maps_to_unknown_session() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/session/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = StudyService::new(Arc::new(api));
    let id = SessionId::new("ghost").expect("id");
    assert!(matches!(
        service.resume(&id, &user()).await,
        Err(StudyServiceError::UnknownSession(missing)) if missing == id
    ));
}
