use pretty_assertions::assert_eq;
use ragdesk_backend_client::{
    AnalyticsBackend, BackendConfig, BackendError, FetchRecordsRequest, FlagUpdateRequest,
    HttpBackend, RoleUpdateRequest, TaskStatusSource, wait_for_terminal,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&BackendConfig::new(format!("{}/api", server.uri()))).unwrap()
}

#[tokio::test]
async fn fetch_posts_request_and_returns_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get-rag-analytics-data"))
        .and(body_partial_json(json!({"persona": "Strategist", "mode": "docsearch"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "source": "a.pdf"},
            {"id": 2, "source": "b.pdf"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = backend(&server)
        .await
        .fetch_records(&FetchRecordsRequest::new("analyst", "Strategist"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["source"], "b.pdf");
}

#[tokio::test]
async fn flag_update_sends_wire_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/update-embedding-flags"))
        .and(body_json(json!({
            "persona": "Strategist",
            "ids_to_update": "2, 3",
            "flag_name": "quarantine",
            "flag_update_mode": "raise_flag"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend(&server)
        .await
        .update_embedding_flags(&FlagUpdateRequest {
            persona: "Strategist".to_string(),
            ids_to_update: "2, 3".to_string(),
            flag_name: "quarantine".to_string(),
            flag_update_mode: "raise_flag".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply["message"], "Updated");
}

#[tokio::test]
async fn error_shaped_reply_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/update-embeddings-roles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Error: unknown ids"})),
        )
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .update_embedding_roles(&RoleUpdateRequest {
            user_id: "Admin".to_string(),
            persona: "Strategist".to_string(),
            ids_to_update: "9".to_string(),
            new_role: "Admin, User".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.user_notice("Update Access Roles"),
        "Update Access Roles - Message: Error: unknown ids. Please try again later."
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get-rag-analytics-data"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .await
        .fetch_records(&FetchRecordsRequest::new("analyst", "Strategist"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 503, ref body } if body == "down"));
}

#[tokio::test]
async fn task_status_stream_reaches_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task_status/task-7"))
        .and(header("accept", "text/event-stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(
                    "data: {\"state\":\"PENDING\"}\n\n\
                     data: {\"state\":\"SUCCESS\",\"result\":\"done\"}\n\n",
                ),
        )
        .mount(&server)
        .await;

    let backend = backend(&server).await;
    let stream = backend.subscribe("task-7").await.unwrap();
    assert_eq!(wait_for_terminal("task-7", stream).await.unwrap(), json!("done"));
}
