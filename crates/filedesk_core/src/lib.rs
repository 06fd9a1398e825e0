//! Filedesk core: pure controller state, the live session machine, and view-model helpers.
mod accept;
mod drop_zone;
mod effect;
mod file;
mod job;
mod live;
mod msg;
mod queue;
mod records;
mod state;
mod update;
mod view_model;

pub use accept::{AcceptRule, FileCategory, ValidationError};
pub use drop_zone::{DropZone, FileIds};
pub use effect::Effect;
pub use file::{format_file_size, modified_file_name, FileId, OfferedFile, PendingFile};
pub use job::{download_path, ConvertedArtifact, Job, JobStatus};
pub use live::{LiveAction, LivePhase, LiveServerEvent, LiveSession, LiveSessionError};
pub use msg::Msg;
pub use queue::SelectableQueue;
pub use records::{filter_voices, speech_file_name, FormatOptions, HistoryEntry, SpeechClip, Voice};
pub use state::{AppState, DownloadTarget, DropTarget, Panel};
pub use update::update;
pub use view_model::{
    AppViewModel, ChecklistView, FormatterView, HistoryView, LiveView, QueueRowView, SpeechView,
    VideoView, WordView,
};
