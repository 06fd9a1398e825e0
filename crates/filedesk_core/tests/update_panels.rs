use std::path::PathBuf;

use filedesk_core::{
    update, AppState, ConvertedArtifact, DownloadTarget, DropTarget, Effect, FormatOptions,
    HistoryEntry, Job, JobStatus, LivePhase, LiveServerEvent, Msg, OfferedFile, Panel, Voice,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    filedesk_logging::initialize_for_tests();
}

fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter().fold((state, Vec::new()), |(state, _), msg| update(state, msg))
}

fn offered(target: DropTarget, name: &str, mime: Option<&str>) -> Msg {
    let mut file = OfferedFile::new(name, format!("/in/{name}"), 2048);
    if let Some(mime) = mime {
        file = file.with_mime(mime);
    }
    Msg::FilesOffered {
        target,
        files: vec![file],
    }
}

#[test]
fn formatter_saves_under_modified_name() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            offered(DropTarget::FormatterFiles, "sheet.xlsx", None),
            Msg::FormatterOptionsChanged(FormatOptions::all()),
            Msg::FormatClicked,
        ],
    );
    match effects.as_slice() {
        [Effect::FormatSpreadsheet {
            file,
            options,
            save_as,
        }] => {
            assert_eq!(file.name, "sheet.xlsx");
            assert_eq!(*options, FormatOptions::all());
            assert_eq!(save_as, "sheet_modified.xlsx");
        }
        other => panic!("unexpected effects {other:?}"),
    }
    assert_eq!(state.view().formatter.status, "Formatting sheet.xlsx...");
    assert!(!state.view().formatter.format_enabled);

    let (state, _) = update(
        state,
        Msg::FormatFinished(Ok(PathBuf::from("/out/sheet_modified.xlsx"))),
    );
    assert_eq!(
        state.view().formatter.status,
        "Formatted and saved as sheet_modified.xlsx"
    );
    assert!(state.view().formatter.format_enabled);
}

#[test]
fn formatter_without_file_reports_status() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::FormatClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().formatter.status, "No file selected for formatting");
}

#[test]
fn formatter_error_is_passed_through() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            offered(DropTarget::FormatterFiles, "sheet.xlsx", None),
            Msg::FormatClicked,
            Msg::FormatFinished(Err("Error processing Excel: bad zip".to_string())),
        ],
    );
    assert_eq!(
        state.view().formatter.status,
        "Error during formatting: Error processing Excel: bad zip"
    );
}

#[test]
fn video_flow_uploads_then_processes_then_cleans_up() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            offered(DropTarget::Video, "demo.mp4", Some("video/mp4")),
            offered(DropTarget::Script, "demo.xlsx", None),
            Msg::ProcessVideoClicked,
        ],
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::UploadVideoScript { video, script }]
            if video.name == "demo.mp4" && script.name == "demo.xlsx"
    ));
    assert_eq!(state.view().video.progress, Some(10));

    let (state, effects) = update(state, Msg::VideoUploaded(Ok(Job::uploaded("j9"))));
    assert_eq!(state.view().video.progress, Some(50));
    assert_eq!(
        effects,
        vec![Effect::ProcessJob {
            job: Job::uploaded("j9")
        }]
    );

    let mut done = Job::uploaded("j9");
    done.download_path = Some("/download/j9/demo-DOCX.docx".to_string());
    done.mark_done(vec!["demo-DOCX.docx".to_string()]);
    let (state, _) = update(state, Msg::VideoProcessed(Ok(done)));
    let view = state.view().video;
    assert_eq!(view.progress, Some(100));
    assert_eq!(view.download_path.as_deref(), Some("/download/j9/demo-DOCX.docx"));
    assert!(view.cleanup_enabled);

    let (state, effects) = update(state, Msg::ResultDownloadClicked(Panel::Video));
    assert_eq!(
        effects,
        vec![Effect::Download {
            origin: Panel::Video,
            targets: vec![DownloadTarget {
                path: "/download/j9/demo-DOCX.docx".to_string(),
                file_name: "demo-DOCX.docx".to_string(),
            }],
        }]
    );

    let (state, effects) = update(state, Msg::VideoCleanupClicked);
    assert_eq!(
        effects,
        vec![Effect::Cleanup {
            origin: Panel::Video,
            job_id: "j9".to_string()
        }]
    );
    let (state, _) = update(
        state,
        Msg::CleanupFinished {
            origin: Panel::Video,
            job_id: "j9".to_string(),
            result: Ok(()),
        },
    );
    assert!(!state.view().video.cleanup_enabled);
    let (_state, effects) = update(state, Msg::VideoCleanupClicked);
    assert!(effects.is_empty());
}

#[test]
fn video_requires_both_files() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            offered(DropTarget::Video, "demo.mp4", Some("video/mp4")),
            Msg::ProcessVideoClicked,
        ],
    );
    assert!(effects.is_empty());
    assert!(!state.view().video.process_enabled);
}

#[test]
fn video_upload_failure_is_prefixed_and_recoverable() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            offered(DropTarget::Video, "demo.mp4", Some("video/mp4")),
            offered(DropTarget::Script, "demo.xlsx", None),
            Msg::ProcessVideoClicked,
            Msg::VideoUploaded(Err("disk full".to_string())),
        ],
    );
    let view = state.view().video;
    assert_eq!(view.error.as_deref(), Some("Upload failed: disk full"));
    assert!(view.process_enabled);
    assert!(!view.cleanup_enabled);
}

#[test]
fn speech_validates_before_synthesizing() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SynthesizeClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().speech.error.as_deref(),
        Some("Please select a voice.")
    );

    let (state, effects) = apply(
        state,
        vec![Msg::VoiceSelected("en-US-A".to_string()), Msg::SynthesizeClicked],
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().speech.error.as_deref(),
        Some("Please enter some text to convert.")
    );

    let (state, effects) = apply(
        state,
        vec![Msg::SpeechRowsLoaded(vec![]), Msg::SynthesizeClicked],
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().speech.error.as_deref(),
        Some("Please upload an Excel file first.")
    );
}

#[test]
fn speech_rows_skip_blanks_and_track_progress() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            Msg::VoiceSelected("v1".to_string()),
            Msg::SpeechRowsLoaded(vec![
                " Hello ".to_string(),
                "".to_string(),
                "World".to_string(),
            ]),
            Msg::SynthesizeClicked,
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::Synthesize {
            voice_id: "v1".to_string(),
            texts: vec!["Hello".to_string(), "World".to_string()],
        }]
    );
    assert_eq!(state.view().speech.progress, Some((0, 2)));

    let (state, _) = update(state, Msg::SpeechProgress { completed: 1, total: 2 });
    assert_eq!(state.view().speech.progress, Some((1, 2)));
}

#[test]
fn speech_sheet_is_read_then_previewed() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        offered(DropTarget::SpeechRows, "lines.txt", Some("text/plain")),
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().speech.error.as_deref(),
        Some("Please upload a valid Excel file (.xlsx or .xls)")
    );

    let (state, effects) = update(state, offered(DropTarget::SpeechRows, "lines.xlsx", None));
    match effects.as_slice() {
        [Effect::ReadSpeechRows { file }] => assert_eq!(file.path, PathBuf::from("/in/lines.xlsx")),
        other => panic!("unexpected effects: {other:?}"),
    }
    assert_eq!(state.view().speech.error, None);

    let rows: Vec<String> = (1..=7).map(|n| format!("Line {n}")).collect();
    let (state, _) = update(state, Msg::SpeechSheetRead(Ok(rows)));
    let view = state.view().speech;
    assert!(view.rows_mode);
    assert_eq!(view.rows_total, 7);
    assert_eq!(
        view.rows_preview,
        vec!["Line 1", "Line 2", "Line 3", "Line 4", "Line 5"]
    );

    let (state, _) = update(state, Msg::SpeechSheetRead(Err("no worksheet".to_string())));
    assert_eq!(
        state.view().speech.error.as_deref(),
        Some("Error reading Excel file: no worksheet")
    );
}

#[test]
fn speech_downloads_report_as_notice() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::DownloadsFinished {
            origin: Panel::Speech,
            saved: vec![PathBuf::from("/out/speech_1.mp3")],
            failed: Vec::new(),
        },
    );
    let view = state.view().speech;
    assert_eq!(view.notice.as_deref(), Some("Saved speech_1.mp3"));
    assert_eq!(view.error, None);
}

#[test]
fn voice_filter_is_case_insensitive() {
    init_logging();
    let voices = vec![
        Voice {
            id: "a".to_string(),
            name: "English (US) Wavenet-A".to_string(),
        },
        Voice {
            id: "b".to_string(),
            name: "German Standard-B".to_string(),
        },
    ];
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::VoicesRequested,
            Msg::VoicesLoaded(Ok(voices)),
            Msg::VoiceFilterChanged("wavenet".to_string()),
        ],
    );
    let view = state.view().speech;
    assert!(!view.voices_loading);
    assert_eq!(view.voices.len(), 1);
    assert_eq!(view.voices[0].id, "a");
}

#[test]
fn checklist_result_becomes_download_link() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            offered(DropTarget::Checklist, "plan.docx", None),
            Msg::ProcessChecklistClicked,
        ],
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::GenerateChecklist { file }] if file.name == "plan.docx"
    ));

    let (state, _) = update(
        state,
        Msg::ChecklistFinished(Ok(ConvertedArtifact::new("c1", "plan-checklist.docx"))),
    );
    let view = state.view().checklist;
    assert_eq!(
        view.download_path.as_deref(),
        Some("/download/c1/plan-checklist.docx")
    );
    assert!(view.process_enabled);
}

#[test]
fn checklist_rejects_doc_files() {
    init_logging();
    let (state, _) = update(AppState::new(), offered(DropTarget::Checklist, "plan.doc", None));
    let view = state.view().checklist;
    assert_eq!(view.file, None);
    assert_eq!(
        view.error.as_deref(),
        Some("Please select a valid Word document (.docx)")
    );
}

#[test]
fn live_session_full_cycle_with_handoff() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartLiveClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().live.error.as_deref(),
        Some("Please enter a filename and choose a save location")
    );

    let (state, effects) = apply(
        state,
        vec![
            Msg::LiveFilenameChanged("capture".to_string()),
            Msg::SaveLocationChanged("/data".to_string()),
            Msg::StartLiveClicked,
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::StartLiveSession {
            filename: "capture".to_string(),
            save_location: "/data".to_string(),
        }]
    );
    assert!(!state.view().live.start_enabled);

    let (state, effects) = update(state, Msg::LiveSessionStarted(Ok("s-1".to_string())));
    assert_eq!(
        effects,
        vec![Effect::OpenLiveChannel {
            session_id: "s-1".to_string()
        }]
    );

    let (state, _) = apply(
        state,
        vec![
            Msg::LiveChannelOpened,
            Msg::LiveEventReceived(LiveServerEvent::Update {
                text: "row one".to_string(),
            }),
            Msg::LiveEventReceived(LiveServerEvent::Update {
                text: "row two".to_string(),
            }),
        ],
    );
    let view = state.view().live;
    assert_eq!(view.phase, LivePhase::Active);
    assert_eq!(view.rows, vec!["row one".to_string(), "row two".to_string()]);
    assert_eq!(view.scroll_to, Some(1));
    assert!(view.done_enabled);

    let (state, effects) = update(state, Msg::LiveDoneClicked);
    assert_eq!(effects, vec![Effect::SendLiveDone]);

    let (state, _) = apply(
        state,
        vec![
            Msg::LiveEventReceived(LiveServerEvent::Saved {
                path: "/data/capture.xlsx".to_string(),
            }),
            Msg::LiveChannelClosed,
        ],
    );
    let view = state.view().live;
    assert_eq!(view.phase, LivePhase::Idle);
    assert_eq!(view.session_id, "");
    assert!(view.start_enabled);
    assert!(view.handoff_enabled);
    assert_eq!(
        view.notice.as_deref(),
        Some("Excel file saved successfully at: /data/capture.xlsx")
    );

    let (state, _) = update(state, Msg::SendToFormatterClicked);
    assert_eq!(state.formatter_files().len(), 1);
    assert_eq!(state.formatter_files()[0].name, "capture.xlsx");
    assert_eq!(
        state.view().formatter.selected.as_deref(),
        Some("capture.xlsx")
    );
    assert!(!state.view().live.handoff_enabled);
}

#[test]
fn live_transport_error_resets_start() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::LiveFilenameChanged("capture".to_string()),
            Msg::SaveLocationChanged("/data".to_string()),
            Msg::StartLiveClicked,
            Msg::LiveSessionStarted(Ok("s-2".to_string())),
            Msg::LiveChannelOpened,
            Msg::LiveTransportError("connection reset".to_string()),
            Msg::LiveChannelClosed,
        ],
    );
    let view = state.view().live;
    assert_eq!(view.session_id, "");
    assert!(view.start_enabled);
    assert!(!view.handoff_enabled);
    assert_eq!(
        view.error.as_deref(),
        Some("Error in Excel monitoring: connection reset")
    );
}

#[test]
fn history_delete_reloads_on_success_and_reports_failure() {
    init_logging();
    let entry = HistoryEntry {
        id: "j1".to_string(),
        date: "2024-05-01".to_string(),
        kind: "video".to_string(),
        files: vec!["out.docx".to_string()],
    };
    let (state, _) = apply(
        AppState::new(),
        vec![Msg::HistoryRequested, Msg::HistoryLoaded(Ok(vec![entry]))],
    );
    assert_eq!(state.view().history.entries.len(), 1);

    let (state, effects) = update(state, Msg::DeleteJobClicked("j1".to_string()));
    assert_eq!(
        effects,
        vec![Effect::Cleanup {
            origin: Panel::History,
            job_id: "j1".to_string()
        }]
    );
    let (state, effects) = update(
        state,
        Msg::CleanupFinished {
            origin: Panel::History,
            job_id: "j1".to_string(),
            result: Ok(()),
        },
    );
    assert_eq!(effects, vec![Effect::LoadHistory]);

    let (state, effects) = update(
        state,
        Msg::CleanupFinished {
            origin: Panel::History,
            job_id: "gone".to_string(),
            result: Err("Job not found".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().history.notice.as_deref(),
        Some("Failed to delete job: Job not found")
    );

    let (state, _) = update(state, Msg::HistoryLoaded(Ok(Vec::new())));
    assert_eq!(state.view().history.status, "No processing history found.");
}

#[test]
fn shutdown_failure_reenables_the_action() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ShutdownClicked);
    assert_eq!(effects, vec![Effect::Shutdown]);
    assert!(!state.view().shutdown_enabled);

    let (state, _) = update(state, Msg::ShutdownFinished(Err("502 Bad Gateway".to_string())));
    assert!(state.view().shutdown_enabled);
    assert_eq!(
        state.view().shutdown_notice.as_deref(),
        Some("Error shutting down server: 502 Bad Gateway")
    );
}

#[test]
fn job_status_freezes_once_terminal() {
    let mut job = Job::uploaded("j1");
    job.mark_processing();
    assert_eq!(job.status(), JobStatus::Processing);
    job.mark_failed("boom");
    job.mark_done(vec!["late.pdf".to_string()]);
    assert_eq!(job.status(), JobStatus::Failed);
    assert!(job.outputs.is_empty());
    assert_eq!(job.error.as_deref(), Some("boom"));
}

#[test]
fn handoff_uses_the_requested_workbook_name() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::LiveFilenameChanged("capture".to_string()),
            Msg::SaveLocationChanged("/data/2026".to_string()),
            Msg::StartLiveClicked,
            Msg::LiveSessionStarted(Ok("s-3".to_string())),
            Msg::LiveChannelOpened,
            Msg::LiveEventReceived(LiveServerEvent::Saved {
                path: "/data/2026/capture_final_1.xlsx".to_string(),
            }),
            Msg::LiveChannelClosed,
            Msg::SendToFormatterClicked,
        ],
    );
    let files = state.formatter_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "capture.xlsx");
    assert_eq!(files[0].path, PathBuf::from("/data/2026/capture_final_1.xlsx"));
}
