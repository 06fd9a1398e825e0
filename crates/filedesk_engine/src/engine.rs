use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use filedesk_core::{speech_file_name, ConvertedArtifact, DownloadTarget, PendingFile, SpeechClip};
use filedesk_logging::{desk_debug, desk_error, desk_info, desk_warn};

use crate::api::{ApiClient, ApiSettings};
use crate::batch::convert_batch;
use crate::live::{LiveChannel, LiveSignal, LiveSink};
use crate::persist::DownloadDir;
use crate::sheet::first_column_rows;
use crate::workflow::{HttpWorkflow, JobWorkflow, SubmitRequest};
use crate::{EngineCommand, EngineEvent, WorkflowError};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub api: ApiSettings,
    /// Where downloads and binary results are written.
    pub download_dir: PathBuf,
    /// Live channel port; asked from the server when `None`.
    pub ws_port: Option<u16>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            download_dir: PathBuf::from("./downloads"),
            ws_port: None,
        }
    }
}

/// Background thread owning the tokio runtime.
///
/// Commands are handled concurrently; at most one live channel exists at a
/// time. Dropping every clone of the handle stops the thread and any live
/// session.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, WorkflowError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = Arc::new(Worker {
            workflow: HttpWorkflow::new(ApiClient::new(settings.api.clone())?),
            downloads: DownloadDir::new(settings.download_dir.clone()),
            ws_port: settings.ws_port,
        });

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    desk_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let sink = Arc::new(ChannelSink {
                tx: event_tx.clone(),
            });
            let mut live: Option<LiveChannel> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::OpenLiveChannel { session_id } => {
                        if live.as_ref().is_some_and(|channel| !channel.is_finished()) {
                            desk_warn!("Refusing live session {}: one is running", session_id);
                            sink.emit(LiveSignal::TransportError(
                                "a live session is already running".to_string(),
                            ));
                            sink.emit(LiveSignal::Closed);
                            continue;
                        }
                        match runtime.block_on(worker.live_url()) {
                            Ok(url) => {
                                live = Some(LiveChannel::spawn(
                                    runtime.handle(),
                                    url,
                                    session_id,
                                    sink.clone(),
                                ));
                            }
                            Err(err) => {
                                sink.emit(LiveSignal::TransportError(err.to_string()));
                                sink.emit(LiveSignal::Closed);
                            }
                        }
                    }
                    EngineCommand::SendLiveDone => {
                        let sent = live.as_ref().is_some_and(LiveChannel::send_done);
                        if !sent {
                            desk_debug!("No live session to finish");
                        }
                    }
                    command => {
                        let worker = worker.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            worker.handle(command, &event_tx).await;
                        });
                    }
                }
            }

            if let Some(channel) = live.take() {
                channel.stop();
            }
            runtime.shutdown_timeout(Duration::from_secs(1));
            desk_info!("Engine thread stopped");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            desk_error!("Engine thread is gone; command dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

struct ChannelSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl LiveSink for ChannelSink {
    fn emit(&self, signal: LiveSignal) {
        let _ = self.tx.send(EngineEvent::Live(signal));
    }
}

struct Worker {
    workflow: HttpWorkflow,
    downloads: DownloadDir,
    ws_port: Option<u16>,
}

impl Worker {
    async fn live_url(&self) -> Result<String, WorkflowError> {
        let port = match self.ws_port {
            Some(port) => port,
            None => self.workflow.api().ws_port().await?,
        };
        Ok(self.workflow.api().live_url(port))
    }

    async fn handle(&self, command: EngineCommand, events: &mpsc::Sender<EngineEvent>) {
        let api = self.workflow.api();
        let event = match command {
            EngineCommand::ConvertBatch { files } => {
                EngineEvent::BatchConverted(convert_batch(&self.workflow, files).await)
            }
            EngineCommand::FormatSpreadsheet {
                file,
                options,
                save_as,
            } => EngineEvent::SpreadsheetFormatted(
                self.fetch_file(SubmitRequest::format_spreadsheet(file, options), &save_as)
                    .await,
            ),
            EngineCommand::UploadVideoScript { video, script } => EngineEvent::VideoUploaded(
                self.workflow
                    .submit(SubmitRequest::upload_video_script(video, script))
                    .await
                    .map(|submitted| submitted.job),
            ),
            EngineCommand::ProcessJob { job } => {
                EngineEvent::JobProcessed(self.workflow.advance(job).await)
            }
            EngineCommand::GenerateChecklist { file } => {
                EngineEvent::ChecklistGenerated(self.generate_checklist(file).await)
            }
            EngineCommand::LoadVoices => EngineEvent::VoicesLoaded(api.voices().await),
            EngineCommand::ReadSpeechRows { file } => {
                let path = file.path;
                let rows = tokio::task::spawn_blocking(move || first_column_rows(&path))
                    .await
                    .unwrap_or_else(|err| Err(WorkflowError::Spreadsheet(err.to_string())));
                EngineEvent::SpeechRowsRead(rows)
            }
            EngineCommand::Synthesize { voice_id, texts } => {
                EngineEvent::SpeechFinished(self.synthesize(&voice_id, texts, events).await)
            }
            EngineCommand::Download { origin, targets } => {
                let (saved, failed) = self.download_all(targets).await;
                EngineEvent::DownloadsFinished {
                    origin,
                    saved,
                    failed,
                }
            }
            EngineCommand::Cleanup { origin, job_id } => {
                let result = self.workflow.cleanup(&job_id).await;
                EngineEvent::CleanupFinished {
                    origin,
                    job_id,
                    result,
                }
            }
            EngineCommand::BrowseDirectory => {
                EngineEvent::DirectoryBrowsed(api.browse_directory().await)
            }
            EngineCommand::StartLiveSession {
                filename,
                save_location,
            } => EngineEvent::LiveSessionStarted(
                api.start_live_session(&filename, &save_location).await,
            ),
            EngineCommand::LoadHistory => EngineEvent::HistoryLoaded(api.history().await),
            EngineCommand::Shutdown => EngineEvent::ShutdownFinished(api.shutdown().await),
            EngineCommand::OpenLiveChannel { .. } | EngineCommand::SendLiveDone => return,
        };
        let _ = events.send(event);
    }

    /// Submit, materialize the binary answer, keep it as `file_name`, then revoke the blob.
    async fn fetch_file(
        &self,
        request: SubmitRequest,
        file_name: &str,
    ) -> Result<PathBuf, WorkflowError> {
        let submitted = self.workflow.submit(request).await?;
        let presentation = self.workflow.present_result(submitted)?;
        let Some(blob) = presentation.blob else {
            return Err(WorkflowError::Upload(
                "server returned a link instead of a file".to_string(),
            ));
        };
        let saved = blob.persist(&self.downloads, Some(file_name))?;
        blob.revoke()?;
        desk_info!("Saved {:?}", saved);
        Ok(saved)
    }

    async fn generate_checklist(
        &self,
        file: PendingFile,
    ) -> Result<ConvertedArtifact, WorkflowError> {
        let submitted = self
            .workflow
            .submit(SubmitRequest::generate_checklist(file))
            .await?;
        submitted
            .artifact()
            .ok_or_else(|| WorkflowError::Upload("no checklist returned".to_string()))
    }

    async fn synthesize(
        &self,
        voice_id: &str,
        texts: Vec<String>,
        events: &mpsc::Sender<EngineEvent>,
    ) -> Result<Vec<SpeechClip>, WorkflowError> {
        let total = texts.len();
        let mut clips = Vec::with_capacity(total);
        for (index, text) in texts.into_iter().enumerate() {
            let file_name = speech_file_name(index);
            let saved_path = self
                .fetch_file(SubmitRequest::text_to_speech(&text, voice_id), &file_name)
                .await?;
            clips.push(SpeechClip {
                text,
                file_name,
                saved_path,
            });
            let _ = events.send(EngineEvent::SpeechProgress {
                completed: index + 1,
                total,
            });
        }
        Ok(clips)
    }

    async fn download_all(
        &self,
        targets: Vec<DownloadTarget>,
    ) -> (Vec<PathBuf>, Vec<(String, String)>) {
        let mut saved = Vec::new();
        let mut failed = Vec::new();
        for target in targets {
            match self.download_one(&target).await {
                Ok(path) => saved.push(path),
                Err(err) => {
                    desk_warn!("Download of {} failed: {}", target.path, err);
                    failed.push((target.file_name, err.to_string()));
                }
            }
        }
        (saved, failed)
    }

    async fn download_one(&self, target: &DownloadTarget) -> Result<PathBuf, WorkflowError> {
        let bytes = self.workflow.api().download(&target.path).await?;
        Ok(self.downloads.save(&target.file_name, &bytes)?)
    }
}

