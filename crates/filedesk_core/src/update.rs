use std::path::Path;

use crate::state::SpeechInput;
use crate::{
    modified_file_name, AppState, ConvertedArtifact, DownloadTarget, DropTarget, Effect, FileId,
    Job, LiveAction, LiveServerEvent, Msg, OfferedFile, Panel,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that leave the state untouched (including disabled actions)
/// return no effects and do not mark the state dirty.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let changed = match msg {
        Msg::FilesOffered { target, files } => Some(files_offered(&mut state, target, files)),

        Msg::WordSourceToggled(id) => state.word.sources.toggle(id).map(|_| Vec::new()),
        Msg::WordSourceRemoved(id) => state.word.sources.remove(id).map(|_| Vec::new()),
        Msg::ConvertSelectedClicked => convert_selected(&mut state),
        Msg::WordBatchFinished { outcomes } => Some(word_batch_finished(&mut state, outcomes)),
        Msg::ArtifactToggled(key) => state.word.artifacts.toggle(key).map(|_| Vec::new()),
        Msg::ArtifactRemoved(key) => state.word.artifacts.remove(key).map(|_| Vec::new()),
        Msg::DownloadSelectedClicked => {
            let targets: Vec<_> = state
                .word
                .artifacts
                .selected()
                .map(|(_, artifact)| DownloadTarget::from_artifact(artifact))
                .collect();
            if targets.is_empty() {
                None
            } else {
                Some(vec![Effect::Download {
                    origin: Panel::WordToPdf,
                    targets,
                }])
            }
        }

        Msg::FormatterFileSelected(id) => {
            if state.formatter.files.iter().any(|f| f.id == id) {
                state.formatter.selected = Some(id);
                Some(Vec::new())
            } else {
                None
            }
        }
        Msg::FormatterOptionsChanged(options) => {
            state.formatter.options = options;
            Some(Vec::new())
        }
        Msg::FormatClicked => format_clicked(&mut state),
        Msg::FormatFinished(result) => {
            state.formatter.busy = false;
            state.formatter.status = match result {
                Ok(path) => format!("Formatted and saved as {}", display_name(&path)),
                Err(message) => format!("Error during formatting: {message}"),
            };
            Some(Vec::new())
        }

        Msg::ProcessVideoClicked => process_video(&mut state),
        Msg::VideoUploaded(result) => Some(video_uploaded(&mut state, result)),
        Msg::VideoProcessed(result) => {
            let video = &mut state.video;
            video.busy = false;
            match result {
                Ok(job) => {
                    video.progress = Some(100);
                    video.download_path = job.primary_download_path();
                    video.notice =
                        Some("Your document has been generated successfully!".to_string());
                    video.job = Some(job);
                }
                Err(message) => {
                    video.progress = None;
                    video.error = Some(format!("Processing failed: {message}"));
                    if let Some(job) = video.job.as_mut() {
                        job.mark_failed(message);
                    }
                }
            }
            Some(Vec::new())
        }
        Msg::VideoCleanupClicked => {
            let job_id = state.video.job.as_ref().and_then(|job| job.id.clone());
            match job_id {
                Some(job_id) if !state.video.cleaned => Some(vec![Effect::Cleanup {
                    origin: Panel::Video,
                    job_id,
                }]),
                _ => None,
            }
        }

        Msg::VoicesRequested => {
            if state.speech.voices_loading {
                None
            } else {
                state.speech.voices_loading = true;
                Some(vec![Effect::LoadVoices])
            }
        }
        Msg::VoicesLoaded(result) => {
            state.speech.voices_loading = false;
            match result {
                Ok(voices) => state.speech.voices = voices,
                Err(message) => {
                    state.speech.voices.clear();
                    state.speech.error = Some(format!("Failed to load voices: {message}"));
                }
            }
            Some(Vec::new())
        }
        Msg::VoiceFilterChanged(filter) => {
            state.speech.filter = filter;
            Some(Vec::new())
        }
        Msg::VoiceSelected(voice_id) => {
            state.speech.voice = Some(voice_id);
            Some(Vec::new())
        }
        Msg::SpeechTextChanged(text) => {
            state.speech.text = text;
            state.speech.input = SpeechInput::Text;
            Some(Vec::new())
        }
        Msg::SpeechRowsLoaded(rows) => {
            load_rows(&mut state, rows);
            Some(Vec::new())
        }
        Msg::SpeechSheetRead(result) => {
            match result {
                Ok(rows) => load_rows(&mut state, rows),
                Err(message) => {
                    state.speech.error = Some(format!("Error reading Excel file: {message}"))
                }
            }
            Some(Vec::new())
        }
        Msg::SynthesizeClicked => synthesize_clicked(&mut state),
        Msg::SpeechProgress { completed, total } => {
            state.speech.progress = Some((completed, total));
            Some(Vec::new())
        }
        Msg::SpeechFinished(result) => {
            state.speech.busy = false;
            state.speech.progress = None;
            match result {
                Ok(clips) => state.speech.clips = clips,
                Err(message) => {
                    state.speech.clips.clear();
                    state.speech.error = Some(format!("Conversion failed: {message}"));
                }
            }
            Some(Vec::new())
        }

        Msg::ProcessChecklistClicked => {
            let checklist = &mut state.checklist;
            match checklist.file.clone() {
                _ if checklist.busy => None,
                None => {
                    checklist.error = Some("Please select a Word document first.".to_string());
                    Some(Vec::new())
                }
                Some(file) => {
                    checklist.busy = true;
                    checklist.progress = Some(50);
                    checklist.result = None;
                    checklist.error = None;
                    checklist.notice = None;
                    Some(vec![Effect::GenerateChecklist { file }])
                }
            }
        }
        Msg::ChecklistFinished(result) => {
            let checklist = &mut state.checklist;
            checklist.busy = false;
            match result {
                Ok(artifact) => {
                    checklist.progress = Some(100);
                    checklist.result = Some(artifact);
                    checklist.notice =
                        Some("Your checklist has been generated successfully!".to_string());
                }
                Err(message) => {
                    checklist.progress = None;
                    checklist.error = Some(message);
                }
            }
            Some(Vec::new())
        }

        Msg::LiveFilenameChanged(filename) => {
            state.live.filename = filename;
            Some(Vec::new())
        }
        Msg::SaveLocationChanged(location) => {
            state.live.save_location = location;
            Some(Vec::new())
        }
        Msg::BrowseClicked => Some(vec![Effect::BrowseDirectory]),
        Msg::DirectoryBrowsed(result) => {
            match result {
                Ok(path) => state.live.save_location = path,
                Err(message) => {
                    state.live.error = Some(format!("Error selecting directory: {message}"))
                }
            }
            Some(Vec::new())
        }
        Msg::StartLiveClicked => start_live(&mut state),
        Msg::LiveSessionStarted(result) => {
            let live = &mut state.live;
            live.starting = false;
            match result {
                Ok(session_id) => match live.session.begin(session_id.clone()) {
                    Ok(()) => Some(vec![Effect::OpenLiveChannel { session_id }]),
                    Err(err) => {
                        live.error = Some(err.to_string());
                        Some(Vec::new())
                    }
                },
                Err(message) => {
                    live.error = Some(format!("Failed to start Excel session: {message}"));
                    Some(Vec::new())
                }
            }
        }
        Msg::LiveChannelOpened => state.live.session.opened().map(|_| Vec::new()),
        Msg::LiveEventReceived(event) => live_event(&mut state, event),
        Msg::LiveTransportError(message) => {
            state.live.session.fail(message.clone());
            state.live.error = Some(format!("Error in Excel monitoring: {message}"));
            Some(Vec::new())
        }
        Msg::LiveChannelClosed => {
            state.live.session.closed();
            Some(Vec::new())
        }
        Msg::LiveDoneClicked => {
            if state.live.session.phase() == crate::LivePhase::Active {
                Some(vec![Effect::SendLiveDone])
            } else {
                None
            }
        }
        Msg::SendToFormatterClicked => send_to_formatter(&mut state),

        Msg::HistoryRequested => {
            state.history.loading = true;
            Some(vec![Effect::LoadHistory])
        }
        Msg::HistoryLoaded(result) => {
            let history = &mut state.history;
            history.loading = false;
            match result {
                Ok(entries) => {
                    history.status = if entries.is_empty() {
                        "No processing history found.".to_string()
                    } else {
                        String::new()
                    };
                    history.entries = entries;
                }
                Err(message) => history.status = format!("Error loading history: {message}"),
            }
            Some(Vec::new())
        }
        Msg::HistoryDownloadClicked { job_id, filename } => Some(vec![Effect::Download {
            origin: Panel::History,
            targets: vec![DownloadTarget::from_artifact(&ConvertedArtifact::new(
                job_id, filename,
            ))],
        }]),
        Msg::DeleteJobClicked(job_id) => Some(vec![Effect::Cleanup {
            origin: Panel::History,
            job_id,
        }]),

        Msg::ResultDownloadClicked(panel) => result_download(&state, panel),
        Msg::DownloadsFinished {
            origin,
            saved,
            failed,
        } => {
            let mut parts = Vec::new();
            if !saved.is_empty() {
                let names: Vec<_> = saved.iter().map(|path| display_name(path)).collect();
                parts.push(format!("Saved {}", names.join(", ")));
            }
            for (name, message) in &failed {
                parts.push(format!("Download of {name} failed: {message}"));
            }
            set_notice(&mut state, origin, parts.join("; "));
            Some(Vec::new())
        }
        Msg::CleanupFinished {
            origin,
            job_id,
            result,
        } => Some(cleanup_finished(&mut state, origin, job_id, result)),

        Msg::ShutdownClicked => {
            if state.shutting_down {
                None
            } else {
                state.shutting_down = true;
                Some(vec![Effect::Shutdown])
            }
        }
        Msg::ShutdownFinished(result) => {
            state.shutdown_notice = Some(match result {
                Ok(()) => "Server is shutting down.".to_string(),
                Err(message) => {
                    state.shutting_down = false;
                    format!("Error shutting down server: {message}")
                }
            });
            Some(Vec::new())
        }

        Msg::Tick | Msg::NoOp => None,
    };

    match changed {
        Some(effects) => {
            state.mark_dirty();
            (state, effects)
        }
        None => (state, Vec::new()),
    }
}

fn files_offered(state: &mut AppState, target: DropTarget, files: Vec<OfferedFile>) -> Vec<Effect> {
    let rejected = state.offer(target, files);
    let error = rejected.first().map(|err| err.message.clone());
    match target {
        DropTarget::WordSources => {
            if error.is_some() {
                state.word.error = error;
            }
        }
        DropTarget::FormatterFiles => {
            if let Some(message) = error {
                state.formatter.status = message;
            }
        }
        DropTarget::Video | DropTarget::Script => {
            if error.is_some() {
                state.video.error = error;
            }
        }
        DropTarget::Checklist => {
            if error.is_some() {
                state.checklist.error = error;
            } else {
                state.checklist.error = None;
                state.checklist.result = None;
            }
        }
        DropTarget::SpeechRows => match (error, state.speech.sheet.clone()) {
            (Some(message), _) => state.speech.error = Some(message),
            (None, Some(file)) => {
                state.speech.error = None;
                return vec![Effect::ReadSpeechRows { file }];
            }
            (None, None) => {}
        },
    }
    Vec::new()
}

fn load_rows(state: &mut AppState, rows: Vec<String>) {
    state.speech.rows = rows
        .iter()
        .map(|row| row.trim())
        .filter(|row| !row.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    state.speech.input = SpeechInput::Rows;
}

fn convert_selected(state: &mut AppState) -> Option<Vec<Effect>> {
    let word = &mut state.word;
    if word.busy || !word.sources.has_selection() {
        return None;
    }
    let files: Vec<_> = word.sources.selected().map(|(_, f)| f.clone()).collect();
    word.busy = true;
    word.progress = Some(0);
    word.error = None;
    word.notice = None;
    Some(vec![Effect::ConvertWordBatch { files }])
}

fn word_batch_finished(
    state: &mut AppState,
    outcomes: Vec<(FileId, Result<ConvertedArtifact, String>)>,
) -> Vec<Effect> {
    let mut first_error = None;
    let mut failed_names = Vec::new();
    for (file_id, outcome) in outcomes {
        match outcome {
            Ok(artifact) => {
                state.word.sources.remove(file_id);
                state.push_artifact(artifact);
            }
            Err(message) => {
                if let Some(file) = state.word.sources.get(file_id) {
                    failed_names.push(file.name.clone());
                }
                first_error.get_or_insert(message);
            }
        }
    }

    let word = &mut state.word;
    word.busy = false;
    if first_error.is_some() {
        word.progress = None;
        word.error = first_error;
        if !failed_names.is_empty() {
            word.notice = Some(format!("Not converted: {}", failed_names.join(", ")));
        }
    } else {
        word.progress = Some(100);
    }
    Vec::new()
}

fn format_clicked(state: &mut AppState) -> Option<Vec<Effect>> {
    let formatter = &mut state.formatter;
    if formatter.busy {
        return None;
    }
    let file = formatter
        .selected
        .and_then(|id| formatter.files.iter().find(|f| f.id == id))
        .cloned();
    match file {
        None => {
            formatter.status = "No file selected for formatting".to_string();
            Some(Vec::new())
        }
        Some(file) => {
            formatter.busy = true;
            formatter.status = format!("Formatting {}...", file.name);
            let save_as = modified_file_name(&file.name);
            Some(vec![Effect::FormatSpreadsheet {
                file,
                options: formatter.options,
                save_as,
            }])
        }
    }
}

fn process_video(state: &mut AppState) -> Option<Vec<Effect>> {
    let video = &mut state.video;
    if video.busy {
        return None;
    }
    let (Some(video_file), Some(script_file)) = (video.video.clone(), video.script.clone()) else {
        return None;
    };
    video.busy = true;
    video.progress = Some(10);
    video.job = Some(Job::pending());
    video.download_path = None;
    video.cleaned = false;
    video.error = None;
    video.notice = None;
    Some(vec![Effect::UploadVideoScript {
        video: video_file,
        script: script_file,
    }])
}

fn video_uploaded(state: &mut AppState, result: Result<Job, String>) -> Vec<Effect> {
    let video = &mut state.video;
    match result {
        Ok(job) => {
            video.progress = Some(50);
            video.job = Some(job.clone());
            vec![Effect::ProcessJob { job }]
        }
        Err(message) => {
            video.busy = false;
            video.progress = None;
            video.error = Some(format!("Upload failed: {message}"));
            if let Some(job) = video.job.as_mut() {
                job.mark_failed(message);
            }
            Vec::new()
        }
    }
}

fn synthesize_clicked(state: &mut AppState) -> Option<Vec<Effect>> {
    let speech = &mut state.speech;
    if speech.busy {
        return None;
    }
    let voice_id = match speech.voice.as_deref() {
        Some(voice) if !voice.is_empty() => voice.to_string(),
        _ => {
            speech.error = Some("Please select a voice.".to_string());
            return Some(Vec::new());
        }
    };
    let texts = match speech.input {
        SpeechInput::Text => {
            let text = speech.text.trim();
            if text.is_empty() {
                speech.error = Some("Please enter some text to convert.".to_string());
                return Some(Vec::new());
            }
            vec![text.to_string()]
        }
        SpeechInput::Rows => {
            if speech.rows.is_empty() {
                speech.error = Some("Please upload an Excel file first.".to_string());
                return Some(Vec::new());
            }
            speech.rows.clone()
        }
    };
    speech.busy = true;
    speech.error = None;
    speech.notice = None;
    speech.clips.clear();
    speech.progress = Some((0, texts.len()));
    Some(vec![Effect::Synthesize { voice_id, texts }])
}

fn start_live(state: &mut AppState) -> Option<Vec<Effect>> {
    let live = &mut state.live;
    if live.starting || !live.session.can_start() {
        return None;
    }
    let filename = live.filename.trim().to_string();
    let save_location = live.save_location.trim().to_string();
    if filename.is_empty() || save_location.is_empty() {
        live.error = Some("Please enter a filename and choose a save location".to_string());
        return Some(Vec::new());
    }
    live.starting = true;
    live.handed_off = false;
    live.workbook = Some(format!("{filename}.xlsx"));
    live.error = None;
    live.notice = None;
    Some(vec![Effect::StartLiveSession {
        filename,
        save_location,
    }])
}

fn live_event(state: &mut AppState, event: LiveServerEvent) -> Option<Vec<Effect>> {
    let live = &mut state.live;
    match live.session.apply(event) {
        LiveAction::Ignore => None,
        LiveAction::RowAppended { .. } => Some(Vec::new()),
        LiveAction::Close => {
            if let Some(path) = live.session.saved_path() {
                live.notice = Some(format!("Excel file saved successfully at: {path}"));
            }
            live.filename.clear();
            live.save_location.clear();
            Some(Vec::new())
        }
    }
}

fn send_to_formatter(state: &mut AppState) -> Option<Vec<Effect>> {
    if state.live.handed_off {
        return None;
    }
    let saved = state.live.session.saved_path()?.to_string();
    let path = Path::new(&saved).to_path_buf();
    let name = state
        .live
        .workbook
        .clone()
        .unwrap_or_else(|| display_name(&path));
    state.add_formatter_file(name, path);
    state.live.handed_off = true;
    state.live.notice = Some("Workbook sent to the formatter".to_string());
    Some(Vec::new())
}

fn result_download(state: &AppState, panel: Panel) -> Option<Vec<Effect>> {
    let target = match panel {
        Panel::Video => state
            .video
            .download_path
            .as_ref()
            .map(|path| DownloadTarget::from_path(path.clone())),
        Panel::Checklist => state
            .checklist
            .result
            .as_ref()
            .map(DownloadTarget::from_artifact),
        _ => None,
    }?;
    Some(vec![Effect::Download {
        origin: panel,
        targets: vec![target],
    }])
}

fn cleanup_finished(
    state: &mut AppState,
    origin: Panel,
    job_id: String,
    result: Result<(), String>,
) -> Vec<Effect> {
    match (origin, result) {
        (Panel::History, Ok(())) => {
            state.history.notice = None;
            state.history.loading = true;
            vec![Effect::LoadHistory]
        }
        (Panel::History, Err(message)) => {
            state.history.notice = Some(format!("Failed to delete job: {message}"));
            Vec::new()
        }
        (Panel::Video, Ok(())) => {
            state.video.cleaned = true;
            state.video.notice = Some("Temporary files have been deleted.".to_string());
            Vec::new()
        }
        (Panel::Video, Err(message)) => {
            state.video.notice = Some(format!("Failed to delete temporary files: {message}"));
            Vec::new()
        }
        (panel, Ok(())) => {
            set_notice(state, panel, format!("Deleted job {job_id}"));
            Vec::new()
        }
        (panel, Err(message)) => {
            set_notice(state, panel, format!("Failed to delete job {job_id}: {message}"));
            Vec::new()
        }
    }
}

fn set_notice(state: &mut AppState, panel: Panel, notice: String) {
    match panel {
        Panel::WordToPdf => state.word.notice = Some(notice),
        Panel::Formatter => state.formatter.status = notice,
        Panel::Video => state.video.notice = Some(notice),
        Panel::Speech => state.speech.notice = Some(notice),
        Panel::Checklist => state.checklist.notice = Some(notice),
        Panel::Live => state.live.notice = Some(notice),
        Panel::History => state.history.notice = Some(notice),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
