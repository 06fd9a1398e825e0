use std::path::PathBuf;

use filedesk_core::{
    ConvertedArtifact, DownloadTarget, FormatOptions, HistoryEntry, Job, Panel, PendingFile,
    SpeechClip, Voice,
};

use crate::batch::BatchReport;
use crate::live::LiveSignal;
use crate::WorkflowError;

/// Work sent to the engine thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    ConvertBatch {
        files: Vec<PendingFile>,
    },
    FormatSpreadsheet {
        file: PendingFile,
        options: FormatOptions,
        save_as: String,
    },
    UploadVideoScript {
        video: PendingFile,
        script: PendingFile,
    },
    ProcessJob {
        job: Job,
    },
    GenerateChecklist {
        file: PendingFile,
    },
    LoadVoices,
    ReadSpeechRows {
        file: PendingFile,
    },
    Synthesize {
        voice_id: String,
        texts: Vec<String>,
    },
    Download {
        origin: Panel,
        targets: Vec<DownloadTarget>,
    },
    Cleanup {
        origin: Panel,
        job_id: String,
    },
    BrowseDirectory,
    StartLiveSession {
        filename: String,
        save_location: String,
    },
    OpenLiveChannel {
        session_id: String,
    },
    SendLiveDone,
    LoadHistory,
    Shutdown,
}

/// Results reported back from the engine thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BatchConverted(BatchReport),
    SpreadsheetFormatted(Result<PathBuf, WorkflowError>),
    VideoUploaded(Result<Job, WorkflowError>),
    JobProcessed(Result<Job, WorkflowError>),
    ChecklistGenerated(Result<ConvertedArtifact, WorkflowError>),
    VoicesLoaded(Result<Vec<Voice>, WorkflowError>),
    SpeechRowsRead(Result<Vec<String>, WorkflowError>),
    SpeechProgress {
        completed: usize,
        total: usize,
    },
    SpeechFinished(Result<Vec<SpeechClip>, WorkflowError>),
    DownloadsFinished {
        origin: Panel,
        saved: Vec<PathBuf>,
        failed: Vec<(String, String)>,
    },
    CleanupFinished {
        origin: Panel,
        job_id: String,
        result: Result<(), WorkflowError>,
    },
    DirectoryBrowsed(Result<String, WorkflowError>),
    LiveSessionStarted(Result<String, WorkflowError>),
    Live(LiveSignal),
    HistoryLoaded(Result<Vec<HistoryEntry>, WorkflowError>),
    ShutdownFinished(Result<(), WorkflowError>),
}
