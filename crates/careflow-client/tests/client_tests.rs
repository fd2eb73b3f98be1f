mod common;

use std::sync::Arc;

use serde_json::json;

use careflow_client::schema::{
    AppointmentFilter, AppointmentStatus, LoginRequest, NewComment, ReportUpload, Role,
    TermSearchRequest,
};
use careflow_client::{
    ApiClient, ApiError, AuthState, ClientConfig, FileTokenStore, MemoryTokenStore, ScheduleSource,
    ScheduleView, TokenStore,
};
use common::{Recorded, Reply, StubServer};

fn user_json() -> serde_json::Value {
    json!({"id": "65a1f0", "email": "kim@careflow.ai", "name": "Kim", "role": "receptionist"})
}

fn appointment_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id, "patient_id": "p1", "patient_name": "John Doe",
        "doctor_id": "d1", "doctor_name": "Smith",
        "date": "2024-01-15", "time": "10:00 AM", "reason": "Annual checkup",
        "status": status, "comments": []
    })
}

fn client_for(server: &StubServer, store: Arc<dyn TokenStore>) -> ApiClient {
    let config = ClientConfig::default().with_base_url(server.base_url.clone());
    ApiClient::new(config, AuthState::new(store)).unwrap()
}

async fn signed_in_client(server: &StubServer) -> ApiClient {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok-123"));
    let config = ClientConfig::default().with_base_url(server.base_url.clone());
    ApiClient::new(config, AuthState::restore(store).await.unwrap()).unwrap()
}

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "kim@careflow.ai".into(),
        password: "hunter22".into(),
        role: Role::Receptionist,
    }
}

#[tokio::test]
async fn test_login_token_is_sent_on_later_calls() {
    let server = StubServer::start(|req: &Recorded| match (req.method.as_str(), req.path()) {
        ("POST", "/api/auth/login") => Reply::json(
            200,
            json!({"access_token": "tok-123", "token_type": "bearer", "user": user_json()}),
        ),
        ("GET", "/api/appointments") => {
            Reply::json(200, json!([appointment_json("a1", "scheduled")]))
        }
        _ => Reply::not_found(),
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token")));
    let client = client_for(&server, store.clone());

    let user = client.login(&login_request()).await.unwrap();
    assert_eq!(user.role, Role::Receptionist);
    assert_eq!(store.load().await.unwrap().as_deref(), Some("tok-123"));

    let filter = AppointmentFilter {
        status: Some(AppointmentStatus::Scheduled),
        doctor: Some("d1".into()),
        ..AppointmentFilter::default()
    };
    let appointments = client.list_appointments(&filter).await.unwrap();
    assert_eq!(appointments.len(), 1);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(requests[0].json()["role"], "receptionist");
    assert_eq!(requests[1].header("authorization"), Some("Bearer tok-123"));
    assert_eq!(requests[1].query(), Some("status=scheduled&doctor=d1"));
}

#[tokio::test]
async fn test_no_token_never_reaches_server() {
    let server = StubServer::start(|_: &Recorded| Reply::json(200, json!([]))).await;
    let client = client_for(&server, Arc::new(MemoryTokenStore::default()));

    let err = client
        .list_appointments(&AppointmentFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    assert!(client.current_user().await.is_err());
    assert!(client
        .search_term(&TermSearchRequest {
            query: "angina".into()
        })
        .await
        .is_err());
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn test_rejected_login_keeps_session_empty() {
    let server = StubServer::start(|_: &Recorded| {
        Reply::json(401, json!({"detail": "Incorrect email or password"}))
    })
    .await;
    let store = Arc::new(MemoryTokenStore::default());
    let client = client_for(&server, store.clone());

    let err = client.login(&login_request()).await.unwrap_err();
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Incorrect email or password");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!client.auth().is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_login_payload_is_not_sent() {
    let server = StubServer::start(|_: &Recorded| Reply::not_found()).await;
    let client = client_for(&server, Arc::new(MemoryTokenStore::default()));

    let bad = LoginRequest {
        email: "not-an-email".into(),
        ..login_request()
    };
    assert!(matches!(
        client.login(&bad).await,
        Err(ApiError::Validation(_))
    ));
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn test_restore_session_with_valid_token() {
    let server = StubServer::start(|req: &Recorded| match req.path() {
        "/api/auth/me" => Reply::json(200, user_json()),
        _ => Reply::not_found(),
    })
    .await;
    let client = signed_in_client(&server).await;

    let user = client.restore_session().await.unwrap().unwrap();
    assert_eq!(user.name, "Kim");
    assert_eq!(client.auth().user().await, Some(user));
    assert_eq!(server.requests()[0].header("authorization"), Some("Bearer tok-123"));
}

#[tokio::test]
async fn test_restore_session_clears_rejected_token() {
    let server = StubServer::start(|_: &Recorded| {
        Reply::json(401, json!({"detail": "Could not validate credentials"}))
    })
    .await;
    let store = Arc::new(MemoryTokenStore::with_token("expired"));
    let config = ClientConfig::default().with_base_url(server.base_url.clone());
    let client = ApiClient::new(config, AuthState::restore(store.clone()).await.unwrap()).unwrap();

    assert_eq!(client.restore_session().await.unwrap(), None);
    assert!(!client.auth().is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let server =
        StubServer::start(|_: &Recorded| Reply::json(200, json!({"terms": "angina"}))).await;
    let client = signed_in_client(&server).await;

    assert!(matches!(
        client.popular_terms().await,
        Err(ApiError::Decode(_))
    ));
}

#[tokio::test]
async fn test_logout_clears_token_even_when_server_fails() {
    let server =
        StubServer::start(|_: &Recorded| Reply::json(500, json!({"detail": "boom"}))).await;
    let store = Arc::new(MemoryTokenStore::with_token("tok-123"));
    let config = ClientConfig::default().with_base_url(server.base_url.clone());
    let client = ApiClient::new(config, AuthState::restore(store.clone()).await.unwrap()).unwrap();

    let err = client.logout().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert!(!client.auth().is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), None);
    assert_eq!(server.requests()[0].path(), "/api/auth/logout");
}

#[tokio::test]
async fn test_cancel_comment_and_delete() {
    let server = StubServer::start(|req: &Recorded| match (req.method.as_str(), req.path()) {
        ("PUT", "/api/appointments/a1") => {
            let status = req.json()["status"].as_str().unwrap_or("scheduled").to_string();
            Reply::json(200, appointment_json("a1", &status))
        }
        ("POST", "/api/appointments/a1/comments") => Reply::json(
            201,
            json!({
                "id": "c9", "user_id": "65a1f0", "user_name": "Kim",
                "user_role": "receptionist", "content": req.json()["content"],
                "timestamp": "2024-01-12T08:15:00.5"
            }),
        ),
        ("DELETE", "/api/appointments/a1") => Reply::json(
            200,
            json!({"success": true, "message": "Appointment deleted successfully"}),
        ),
        _ => Reply::not_found(),
    })
    .await;
    let client = signed_in_client(&server).await;

    let cancelled = client.cancel_appointment("a1").await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let comment = client
        .add_comment(
            "a1",
            &NewComment {
                content: "Patient called to cancel.".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(comment.content, "Patient called to cancel.");

    let ack = client.delete_appointment("a1").await.unwrap();
    assert!(ack.success);

    let requests = server.requests();
    assert_eq!(requests[0].json(), json!({"status": "cancelled"}));
    assert_eq!(requests[2].method, "DELETE");

    let err = client.delete_appointment("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "API returned 404: Not Found");
}

#[tokio::test]
async fn test_users_filtered_by_role() {
    let server = StubServer::start(|req: &Recorded| match req.path() {
        "/api/users" => Reply::json(200, json!([user_json()])),
        _ => Reply::not_found(),
    })
    .await;
    let client = signed_in_client(&server).await;

    let users = client.list_users(Some(Role::Doctor)).await.unwrap();
    assert_eq!(users.len(), 1);
    client.list_users(None).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].query(), Some("role=doctor"));
    assert_eq!(requests[1].query(), None);
}

#[tokio::test]
async fn test_report_upload_is_multipart() {
    let server = StubServer::start(|req: &Recorded| match req.path() {
        "/api/ai/nurse/analyze-report" => Reply::json(
            200,
            json!({"analysis": "Values within range.", "summary": "Normal", "file_name": "labs.pdf"}),
        ),
        _ => Reply::not_found(),
    })
    .await;
    let client = signed_in_client(&server).await;

    let upload = ReportUpload::new("labs.pdf", b"%PDF-1.4 fake report".to_vec()).unwrap();
    let result = client.analyze_report(&upload).await.unwrap();
    assert_eq!(result.summary, "Normal");

    let request = &server.requests()[0];
    assert!(request
        .header("content-type")
        .unwrap()
        .starts_with("multipart/form-data"));
    let body = request.body_text().to_ascii_lowercase();
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"labs.pdf\""));
    assert!(body.contains("application/pdf"));
    assert!(body.contains("%pdf-1.4 fake report"));
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let server = StubServer::start(|req: &Recorded| match req.path() {
        "/health" => Reply::json(
            200,
            json!({"status": "healthy", "service": "CareFlowAI API", "database": "MongoDB"}),
        ),
        _ => Reply::not_found(),
    })
    .await;
    let client = client_for(&server, Arc::new(MemoryTokenStore::default()));

    assert!(client.health().await.unwrap().is_healthy());
}

#[tokio::test]
async fn test_schedule_falls_back_on_server_error() {
    let server =
        StubServer::start(|_: &Recorded| Reply::json(500, json!({"detail": "db down"}))).await;
    let client = signed_in_client(&server).await;

    let view = ScheduleView::load(&client, ScheduleSource::Live).await;
    assert_eq!(view.source, ScheduleSource::Mock);
    assert_eq!(
        view.error.as_deref(),
        Some("Failed to load appointments from server. Using mock data.")
    );
    assert_eq!(view.appointments.len(), 3);
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_schedule_live_load() {
    let server = StubServer::start(|_: &Recorded| {
        Reply::json(
            200,
            json!([appointment_json("a1", "scheduled"), appointment_json("a2", "completed")]),
        )
    })
    .await;
    let client = signed_in_client(&server).await;

    let view = ScheduleView::load(&client, ScheduleSource::Live).await;
    assert_eq!(view.source, ScheduleSource::Live);
    assert!(view.error.is_none());
    assert_eq!(view.filtered(Some(AppointmentStatus::Completed)).len(), 1);
    assert_eq!(view.filtered(None).len(), 2);
}
