use std::path::PathBuf;

use crate::drop_zone::{DropZone, FileIds};
use crate::view_model::{
    AppViewModel, ChecklistView, FormatterView, HistoryView, LiveView, QueueRowView, SpeechView,
    VideoView, WordView,
};
use crate::{
    filter_voices, AcceptRule, ConvertedArtifact, FileId, FormatOptions, HistoryEntry, Job,
    LiveSession, PendingFile, SelectableQueue, SpeechClip, Voice,
};

/// Which feature a message, effect, or notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    WordToPdf,
    Formatter,
    Video,
    Speech,
    Checklist,
    Live,
    History,
}

/// Drop targets; the video panel has two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    WordSources,
    FormatterFiles,
    Video,
    Script,
    Checklist,
    /// Spreadsheet whose first column feeds speech synthesis.
    SpeechRows,
}

impl DropTarget {
    pub fn zone(self) -> DropZone {
        DropZone::new(match self {
            DropTarget::WordSources => AcceptRule::word_document(),
            DropTarget::FormatterFiles => AcceptRule::formatter_spreadsheet(),
            DropTarget::Video => AcceptRule::video(),
            DropTarget::Script => AcceptRule::script(),
            DropTarget::Checklist => AcceptRule::checklist_document(),
            DropTarget::SpeechRows => AcceptRule::speech_rows(),
        })
    }
}

/// A server file to fetch and the local name to store it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub path: String,
    pub file_name: String,
}

impl DownloadTarget {
    pub fn from_artifact(artifact: &ConvertedArtifact) -> Self {
        Self {
            path: artifact.download_path(),
            file_name: artifact.name.clone(),
        }
    }

    /// Uses the last path segment as the local name.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("download")
            .to_string();
        Self { path, file_name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct WordPanel {
    pub(crate) sources: SelectableQueue<PendingFile>,
    pub(crate) artifacts: SelectableQueue<ConvertedArtifact>,
    pub(crate) next_artifact: u64,
    pub(crate) busy: bool,
    pub(crate) progress: Option<u8>,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FormatterPanel {
    pub(crate) files: Vec<PendingFile>,
    pub(crate) selected: Option<FileId>,
    pub(crate) options: FormatOptions,
    pub(crate) busy: bool,
    pub(crate) status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct VideoPanel {
    pub(crate) video: Option<PendingFile>,
    pub(crate) script: Option<PendingFile>,
    pub(crate) job: Option<Job>,
    pub(crate) busy: bool,
    pub(crate) progress: Option<u8>,
    pub(crate) download_path: Option<String>,
    pub(crate) cleaned: bool,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum SpeechInput {
    #[default]
    Text,
    Rows,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SpeechPanel {
    pub(crate) voices: Vec<Voice>,
    pub(crate) voices_loading: bool,
    pub(crate) filter: String,
    pub(crate) voice: Option<String>,
    pub(crate) input: SpeechInput,
    pub(crate) text: String,
    pub(crate) sheet: Option<PendingFile>,
    pub(crate) rows: Vec<String>,
    pub(crate) busy: bool,
    pub(crate) progress: Option<(usize, usize)>,
    pub(crate) clips: Vec<SpeechClip>,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ChecklistPanel {
    pub(crate) file: Option<PendingFile>,
    pub(crate) busy: bool,
    pub(crate) progress: Option<u8>,
    pub(crate) result: Option<ConvertedArtifact>,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LivePanel {
    pub(crate) filename: String,
    /// `{filename}.xlsx` of the running or last session.
    pub(crate) workbook: Option<String>,
    pub(crate) save_location: String,
    pub(crate) session: LiveSession,
    pub(crate) starting: bool,
    pub(crate) handed_off: bool,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct HistoryPanel {
    pub(crate) entries: Vec<HistoryEntry>,
    pub(crate) loading: bool,
    pub(crate) status: String,
    pub(crate) notice: Option<String>,
}

/// Everything one controller owns; no state lives outside this value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) ids: FileIds,
    pub(crate) word: WordPanel,
    pub(crate) formatter: FormatterPanel,
    pub(crate) video: VideoPanel,
    pub(crate) speech: SpeechPanel,
    pub(crate) checklist: ChecklistPanel,
    pub(crate) live: LivePanel,
    pub(crate) history: HistoryPanel,
    pub(crate) shutting_down: bool,
    pub(crate) shutdown_notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_session(&self) -> &LiveSession {
        &self.live.session
    }

    /// Ids of the artifact queue in display order.
    pub fn artifact_ids(&self) -> Vec<u64> {
        self.word.artifacts.iter().map(|(key, _, _)| key).collect()
    }

    pub fn formatter_files(&self) -> &[PendingFile] {
        &self.formatter.files
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            word: WordView {
                sources: self
                    .word
                    .sources
                    .iter()
                    .map(|(key, file, selected)| QueueRowView {
                        key,
                        label: file.name.clone(),
                        selected,
                    })
                    .collect(),
                artifacts: self
                    .word
                    .artifacts
                    .iter()
                    .map(|(key, artifact, selected)| QueueRowView {
                        key,
                        label: artifact.name.clone(),
                        selected,
                    })
                    .collect(),
                convert_enabled: !self.word.busy && self.word.sources.has_selection(),
                download_enabled: self.word.artifacts.has_selection(),
                progress: self.word.progress,
                error: self.word.error.clone(),
                notice: self.word.notice.clone(),
            },
            formatter: FormatterView {
                files: self.formatter.files.iter().map(|f| f.name.clone()).collect(),
                selected: self
                    .formatter
                    .selected
                    .and_then(|id| self.formatter.files.iter().find(|f| f.id == id))
                    .map(|f| f.name.clone()),
                options: self.formatter.options,
                format_enabled: !self.formatter.busy && self.formatter.selected.is_some(),
                status: self.formatter.status.clone(),
            },
            video: VideoView {
                video: self.video.video.as_ref().map(describe_file),
                script: self.video.script.as_ref().map(describe_file),
                process_enabled: !self.video.busy
                    && self.video.video.is_some()
                    && self.video.script.is_some(),
                progress: self.video.progress,
                download_path: self.video.download_path.clone(),
                cleanup_enabled: !self.video.cleaned
                    && self
                        .video
                        .job
                        .as_ref()
                        .is_some_and(|job| job.id.is_some()),
                error: self.video.error.clone(),
                notice: self.video.notice.clone(),
            },
            speech: SpeechView {
                voices: filter_voices(&self.speech.voices, &self.speech.filter)
                    .into_iter()
                    .cloned()
                    .collect(),
                voices_loading: self.speech.voices_loading,
                selected_voice: self.speech.voice.clone(),
                rows_mode: self.speech.input == SpeechInput::Rows,
                sheet: self.speech.sheet.as_ref().map(describe_file),
                rows_preview: self
                    .speech
                    .rows
                    .iter()
                    .take(ROWS_PREVIEW)
                    .cloned()
                    .collect(),
                rows_total: self.speech.rows.len(),
                convert_enabled: !self.speech.busy,
                progress: self.speech.progress,
                clips: self.speech.clips.clone(),
                download_all_visible: self.speech.clips.len() > 1,
                error: self.speech.error.clone(),
                notice: self.speech.notice.clone(),
            },
            checklist: ChecklistView {
                file: self.checklist.file.as_ref().map(describe_file),
                process_enabled: !self.checklist.busy && self.checklist.file.is_some(),
                progress: self.checklist.progress,
                download_path: self
                    .checklist
                    .result
                    .as_ref()
                    .map(ConvertedArtifact::download_path),
                error: self.checklist.error.clone(),
                notice: self.checklist.notice.clone(),
            },
            live: LiveView {
                phase: self.live.session.phase(),
                session_id: self.live.session.session_id().to_string(),
                rows: self.live.session.rows().to_vec(),
                scroll_to: self.live.session.scroll_to(),
                start_enabled: !self.live.starting && self.live.session.can_start(),
                done_enabled: self.live.session.phase() == crate::LivePhase::Active,
                handoff_enabled: self.live.session.handoff_ready() && !self.live.handed_off,
                saved_path: self.live.session.saved_path().map(str::to_string),
                save_location: self.live.save_location.clone(),
                error: self.live.error.clone(),
                notice: self.live.notice.clone(),
            },
            history: HistoryView {
                entries: self.history.entries.clone(),
                loading: self.history.loading,
                status: self.history.status.clone(),
                notice: self.history.notice.clone(),
            },
            shutdown_enabled: !self.shutting_down,
            shutdown_notice: self.shutdown_notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn offer(
        &mut self,
        target: DropTarget,
        files: Vec<crate::OfferedFile>,
    ) -> Vec<crate::ValidationError> {
        let zone = target.zone();
        let ids = &mut self.ids;
        match target {
            DropTarget::WordSources => {
                let sources = &mut self.word.sources;
                zone.offer(files, ids, |file| sources.insert(file.id, file))
            }
            DropTarget::FormatterFiles => {
                let formatter = &mut self.formatter;
                zone.offer(files, ids, |file| {
                    if formatter.selected.is_none() {
                        formatter.selected = Some(file.id);
                    }
                    formatter.files.push(file);
                })
            }
            DropTarget::Video => {
                // Single-file targets keep the last accepted file.
                let slot = &mut self.video.video;
                zone.offer(files, ids, |file| *slot = Some(file))
            }
            DropTarget::Script => {
                let slot = &mut self.video.script;
                zone.offer(files, ids, |file| *slot = Some(file))
            }
            DropTarget::Checklist => {
                let slot = &mut self.checklist.file;
                zone.offer(files, ids, |file| *slot = Some(file))
            }
            DropTarget::SpeechRows => {
                let slot = &mut self.speech.sheet;
                zone.offer(files, ids, |file| *slot = Some(file))
            }
        }
    }

    pub(crate) fn push_artifact(&mut self, artifact: ConvertedArtifact) {
        self.word.next_artifact += 1;
        let key = self.word.next_artifact;
        self.word.artifacts.insert(key, artifact);
    }

    pub(crate) fn add_formatter_file(&mut self, name: String, path: PathBuf) {
        let id = self.ids.next_id();
        let mime = crate::AcceptRule::formatter_spreadsheet().mime_types[0].to_string();
        self.formatter.files.push(PendingFile {
            id,
            name,
            path,
            size: 0,
            mime: Some(mime),
            category: crate::FileCategory::Spreadsheet,
        });
        self.formatter.selected = Some(id);
    }
}

/// Rows shown before synthesis starts.
const ROWS_PREVIEW: usize = 5;

fn describe_file(file: &PendingFile) -> String {
    format!(
        "Selected: {} ({})",
        file.name,
        crate::format_file_size(file.size)
    )
}
