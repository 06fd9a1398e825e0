use filedesk_core::{HistoryEntry, Voice};
use filedesk_engine::{ApiClient, ApiSettings, WorkflowError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiSettings {
        base_url: server.uri(),
    })
    .unwrap()
}

#[tokio::test]
async fn voices_and_history_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tts-voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "en-US-A", "name": "English (US) A" },
            { "id": "de-DE-B", "name": "German B" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "j1", "date": "2024-05-01 10:00", "type": "word-to-pdf", "files": ["a.pdf"] }
        ])))
        .mount(&server)
        .await;
    let api = client(&server);

    let voices = api.voices().await.unwrap();
    assert_eq!(
        voices[0],
        Voice {
            id: "en-US-A".to_string(),
            name: "English (US) A".to_string()
        }
    );
    assert_eq!(voices.len(), 2);

    let history = api.history().await.unwrap();
    assert_eq!(
        history,
        vec![HistoryEntry {
            id: "j1".to_string(),
            date: "2024-05-01 10:00".to_string(),
            kind: "word-to-pdf".to_string(),
            files: vec!["a.pdf".to_string()],
        }]
    );
}

#[tokio::test]
async fn live_session_start_posts_camel_case_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start-excel-session"))
        .and(body_json(serde_json::json!({
            "filename": "capture",
            "saveLocation": "/data"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "session_id": "s-42" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ws-port"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "port": 8765 })))
        .mount(&server)
        .await;
    let api = client(&server);

    let session_id = api.start_live_session("capture", "/data").await.unwrap();
    assert_eq!(session_id, "s-42");
    let port = api.ws_port().await.unwrap();
    assert_eq!(api.live_url(port), "ws://127.0.0.1:8765");
}

#[tokio::test]
async fn browse_reports_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/browse-directory"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "No directory selected" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).browse_directory().await.unwrap_err();
    assert_eq!(err.to_string(), "No directory selected");
}

#[tokio::test]
async fn download_and_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/job1/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shutdown"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Server shutting down..."))
        .expect(1)
        .mount(&server)
        .await;
    let api = client(&server);

    let bytes = api.download("/download/job1/report.pdf").await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.7");
    api.shutdown().await.unwrap();

    let err = api.download("/download/job1/missing.pdf").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Transport(_)));
}

#[tokio::test]
async fn json_artifacts_download_verbatim() {
    let server = MockServer::start().await;
    let pretty = "{\n  \"zeta\": 1,\n  \"alpha\": 2\n}\n";
    Mock::given(method("GET"))
        .and(path("/download/job1/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(pretty, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/job2/report.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"error":"none","rows":3}"#, "application/json"),
        )
        .mount(&server)
        .await;
    let api = client(&server);

    let bytes = api.download("/download/job1/data.json").await.unwrap();
    assert_eq!(&bytes[..], pretty.as_bytes());
    let bytes = api.download("/download/job2/report.json").await.unwrap();
    assert_eq!(&bytes[..], br#"{"error":"none","rows":3}"#);
}

#[test]
fn bad_server_url_is_rejected() {
    let err = ApiClient::new(ApiSettings {
        base_url: "not a url".to_string(),
    })
    .unwrap_err();
    assert!(matches!(err, WorkflowError::Transport(_)));
}
