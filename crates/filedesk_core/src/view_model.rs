use crate::{FormatOptions, HistoryEntry, LivePhase, SpeechClip, Voice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRowView {
    pub key: u64,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordView {
    pub sources: Vec<QueueRowView>,
    pub artifacts: Vec<QueueRowView>,
    pub convert_enabled: bool,
    pub download_enabled: bool,
    pub progress: Option<u8>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatterView {
    pub files: Vec<String>,
    pub selected: Option<String>,
    pub options: FormatOptions,
    pub format_enabled: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoView {
    pub video: Option<String>,
    pub script: Option<String>,
    pub process_enabled: bool,
    pub progress: Option<u8>,
    pub download_path: Option<String>,
    pub cleanup_enabled: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpeechView {
    /// Voices after the name filter.
    pub voices: Vec<Voice>,
    pub voices_loading: bool,
    pub selected_voice: Option<String>,
    pub rows_mode: bool,
    pub sheet: Option<String>,
    /// First rows of the loaded column.
    pub rows_preview: Vec<String>,
    pub rows_total: usize,
    pub convert_enabled: bool,
    /// `(completed, total)` while synthesizing.
    pub progress: Option<(usize, usize)>,
    pub clips: Vec<SpeechClip>,
    pub download_all_visible: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChecklistView {
    pub file: Option<String>,
    pub process_enabled: bool,
    pub progress: Option<u8>,
    pub download_path: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveView {
    pub phase: LivePhase,
    pub session_id: String,
    pub rows: Vec<String>,
    pub scroll_to: Option<usize>,
    pub start_enabled: bool,
    pub done_enabled: bool,
    pub handoff_enabled: bool,
    pub saved_path: Option<String>,
    pub save_location: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
    pub status: String,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub word: WordView,
    pub formatter: FormatterView,
    pub video: VideoView,
    pub speech: SpeechView,
    pub checklist: ChecklistView,
    pub live: LiveView,
    pub history: HistoryView,
    pub shutdown_enabled: bool,
    pub shutdown_notice: Option<String>,
    pub dirty: bool,
}
