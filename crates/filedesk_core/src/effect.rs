use crate::{DownloadTarget, FormatOptions, Job, Panel, PendingFile};

/// Work the controller asks the outside world to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit every file concurrently and report once all have finished.
    ConvertWordBatch { files: Vec<PendingFile> },
    FormatSpreadsheet {
        file: PendingFile,
        options: FormatOptions,
        save_as: String,
    },
    UploadVideoScript { video: PendingFile, script: PendingFile },
    ProcessJob { job: Job },
    GenerateChecklist { file: PendingFile },
    LoadVoices,
    /// Read the first column of a spreadsheet's first sheet.
    ReadSpeechRows { file: PendingFile },
    /// Texts are synthesized one after another, in order.
    Synthesize { voice_id: String, texts: Vec<String> },
    Download {
        origin: Panel,
        targets: Vec<DownloadTarget>,
    },
    Cleanup { origin: Panel, job_id: String },
    BrowseDirectory,
    StartLiveSession {
        filename: String,
        save_location: String,
    },
    OpenLiveChannel { session_id: String },
    SendLiveDone,
    LoadHistory,
    Shutdown,
}
