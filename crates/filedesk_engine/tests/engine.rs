use std::fs;
use std::time::Duration;

use filedesk_core::{speech_file_name, DownloadTarget, FileCategory, Panel, PendingFile};
use filedesk_engine::{ApiSettings, EngineCommand, EngineEvent, EngineHandle, EngineSettings};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    for _ in 0..500 {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("engine produced no event");
}

fn engine(server: &MockServer, download_dir: &TempDir) -> EngineHandle {
    EngineHandle::new(EngineSettings {
        api: ApiSettings {
            base_url: server.uri(),
        },
        download_dir: download_dir.path().join("downloads"),
        ws_port: None,
    })
    .unwrap()
}

#[tokio::test]
async fn downloads_are_written_and_failures_named() {
    filedesk_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/job1/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, &temp);

    engine.send(EngineCommand::Download {
        origin: Panel::WordToPdf,
        targets: vec![
            DownloadTarget::from_path("/download/job1/report.pdf"),
            DownloadTarget::from_path("/download/job2/gone.pdf"),
        ],
    });

    match next_event(&engine).await {
        EngineEvent::DownloadsFinished {
            origin,
            saved,
            failed,
        } => {
            assert_eq!(origin, Panel::WordToPdf);
            assert_eq!(saved, vec![temp.path().join("downloads").join("report.pdf")]);
            assert_eq!(fs::read(&saved[0]).unwrap(), b"%PDF");
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].0, "gone.pdf");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn speech_rows_are_saved_in_order_with_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"ID3".to_vec(), "audio/mpeg"))
        .expect(2)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, &temp);

    engine.send(EngineCommand::Synthesize {
        voice_id: "v1".to_string(),
        texts: vec!["one".to_string(), "two".to_string()],
    });

    assert_eq!(
        next_event(&engine).await,
        EngineEvent::SpeechProgress {
            completed: 1,
            total: 2
        }
    );
    assert_eq!(
        next_event(&engine).await,
        EngineEvent::SpeechProgress {
            completed: 2,
            total: 2
        }
    );
    match next_event(&engine).await {
        EngineEvent::SpeechFinished(Ok(clips)) => {
            let names: Vec<_> = clips.iter().map(|c| c.file_name.clone()).collect();
            assert_eq!(names, vec![speech_file_name(0), speech_file_name(1)]);
            assert!(clips.iter().all(|c| c.saved_path.exists()));
            assert_eq!(clips[1].text, "two");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn live_port_lookup_failure_closes_the_channel() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, &temp);

    engine.send(EngineCommand::OpenLiveChannel {
        session_id: "s1".to_string(),
    });

    assert!(matches!(
        next_event(&engine).await,
        EngineEvent::Live(filedesk_engine::LiveSignal::TransportError(_))
    ));
    assert_eq!(
        next_event(&engine).await,
        EngineEvent::Live(filedesk_engine::LiveSignal::Closed)
    );
}

#[tokio::test]
async fn second_live_channel_is_refused_and_closed() {
    let server = MockServer::start().await;
    // Accepts TCP but never answers the WebSocket handshake.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let stalled = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });
    let temp = TempDir::new().unwrap();
    let engine = EngineHandle::new(EngineSettings {
        api: ApiSettings {
            base_url: server.uri(),
        },
        download_dir: temp.path().to_path_buf(),
        ws_port: Some(port),
    })
    .unwrap();

    engine.send(EngineCommand::OpenLiveChannel {
        session_id: "s1".to_string(),
    });
    engine.send(EngineCommand::OpenLiveChannel {
        session_id: "s2".to_string(),
    });

    assert_eq!(
        next_event(&engine).await,
        EngineEvent::Live(filedesk_engine::LiveSignal::TransportError(
            "a live session is already running".to_string()
        ))
    );
    assert_eq!(
        next_event(&engine).await,
        EngineEvent::Live(filedesk_engine::LiveSignal::Closed)
    );
    stalled.abort();
}

#[tokio::test]
async fn speech_sheet_is_read_off_the_runtime() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rows.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "first").unwrap();
    sheet.write_string(1, 0, "second").unwrap();
    workbook.save(&path).unwrap();
    let engine = engine(&server, &temp);

    engine.send(EngineCommand::ReadSpeechRows {
        file: PendingFile {
            id: 1,
            name: "rows.xlsx".to_string(),
            path,
            size: 0,
            mime: None,
            category: FileCategory::Spreadsheet,
        },
    });

    assert_eq!(
        next_event(&engine).await,
        EngineEvent::SpeechRowsRead(Ok(vec!["first".to_string(), "second".to_string()]))
    );
}
