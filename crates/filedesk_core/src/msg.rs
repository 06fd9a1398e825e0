use std::path::PathBuf;

use crate::{
    ConvertedArtifact, DropTarget, FileId, FormatOptions, HistoryEntry, Job, LiveServerEvent,
    OfferedFile, Panel, SpeechClip, Voice,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Files were picked or dropped onto a drop target.
    FilesOffered {
        target: DropTarget,
        files: Vec<OfferedFile>,
    },

    WordSourceToggled(FileId),
    WordSourceRemoved(FileId),
    ConvertSelectedClicked,
    /// Every request of a conversion batch has finished, one outcome per file.
    WordBatchFinished {
        outcomes: Vec<(FileId, Result<ConvertedArtifact, String>)>,
    },
    ArtifactToggled(u64),
    ArtifactRemoved(u64),
    DownloadSelectedClicked,

    FormatterFileSelected(FileId),
    FormatterOptionsChanged(FormatOptions),
    FormatClicked,
    FormatFinished(Result<PathBuf, String>),

    ProcessVideoClicked,
    VideoUploaded(Result<Job, String>),
    VideoProcessed(Result<Job, String>),
    VideoCleanupClicked,

    VoicesRequested,
    VoicesLoaded(Result<Vec<Voice>, String>),
    VoiceFilterChanged(String),
    VoiceSelected(String),
    SpeechTextChanged(String),
    SpeechRowsLoaded(Vec<String>),
    SpeechSheetRead(Result<Vec<String>, String>),
    SynthesizeClicked,
    SpeechProgress { completed: usize, total: usize },
    SpeechFinished(Result<Vec<SpeechClip>, String>),

    ProcessChecklistClicked,
    ChecklistFinished(Result<ConvertedArtifact, String>),

    LiveFilenameChanged(String),
    SaveLocationChanged(String),
    BrowseClicked,
    DirectoryBrowsed(Result<String, String>),
    StartLiveClicked,
    LiveSessionStarted(Result<String, String>),
    LiveChannelOpened,
    LiveEventReceived(LiveServerEvent),
    LiveTransportError(String),
    LiveChannelClosed,
    LiveDoneClicked,
    SendToFormatterClicked,

    HistoryRequested,
    HistoryLoaded(Result<Vec<HistoryEntry>, String>),
    HistoryDownloadClicked { job_id: String, filename: String },
    DeleteJobClicked(String),

    /// A server-side artifact download was requested from a result panel.
    ResultDownloadClicked(Panel),
    DownloadsFinished {
        origin: Panel,
        saved: Vec<PathBuf>,
        failed: Vec<(String, String)>,
    },
    CleanupFinished {
        origin: Panel,
        job_id: String,
        result: Result<(), String>,
    },

    ShutdownClicked,
    ShutdownFinished(Result<(), String>),

    /// Render tick; never changes state.
    Tick,
    NoOp,
}
