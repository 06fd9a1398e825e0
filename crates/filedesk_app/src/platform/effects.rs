use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use filedesk_core::{Effect, Msg};
use filedesk_engine::{
    BatchReport, EngineCommand, EngineEvent, EngineHandle, EngineSettings, LiveSignal,
    WorkflowError,
};
use filedesk_logging::{desk_debug, desk_info, desk_warn};

/// Turns core effects into engine commands and engine events into messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: EngineSettings,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, WorkflowError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    /// Sends every effect; returns how many of them will answer with a message.
    pub(crate) fn enqueue(&self, effects: Vec<Effect>) -> usize {
        let mut awaiting = 0;
        for effect in effects {
            desk_debug!("Effect {:?}", effect);
            if expects_reply(&effect) {
                awaiting += 1;
            }
            self.engine.send(command_for(effect));
        }
        awaiting
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(Duration::from_millis(50)) {
                Some(event) => {
                    if msg_tx.send(msg_for(event)).is_err() {
                        break;
                    }
                }
                None => thread::sleep(Duration::from_millis(20)),
            }
        });
    }
}

fn command_for(effect: Effect) -> EngineCommand {
    match effect {
        Effect::ConvertWordBatch { files } => {
            desk_info!("Converting {} document(s)", files.len());
            EngineCommand::ConvertBatch { files }
        }
        Effect::FormatSpreadsheet {
            file,
            options,
            save_as,
        } => EngineCommand::FormatSpreadsheet {
            file,
            options,
            save_as,
        },
        Effect::UploadVideoScript { video, script } => {
            EngineCommand::UploadVideoScript { video, script }
        }
        Effect::ProcessJob { job } => EngineCommand::ProcessJob { job },
        Effect::GenerateChecklist { file } => EngineCommand::GenerateChecklist { file },
        Effect::LoadVoices => EngineCommand::LoadVoices,
        Effect::ReadSpeechRows { file } => EngineCommand::ReadSpeechRows { file },
        Effect::Synthesize { voice_id, texts } => EngineCommand::Synthesize { voice_id, texts },
        Effect::Download { origin, targets } => EngineCommand::Download { origin, targets },
        Effect::Cleanup { origin, job_id } => EngineCommand::Cleanup { origin, job_id },
        Effect::BrowseDirectory => EngineCommand::BrowseDirectory,
        Effect::StartLiveSession {
            filename,
            save_location,
        } => EngineCommand::StartLiveSession {
            filename,
            save_location,
        },
        Effect::OpenLiveChannel { session_id } => EngineCommand::OpenLiveChannel { session_id },
        Effect::SendLiveDone => EngineCommand::SendLiveDone,
        Effect::LoadHistory => EngineCommand::LoadHistory,
        Effect::Shutdown => EngineCommand::Shutdown,
    }
}

/// `SendLiveDone` rides on the open channel, whose close is already awaited.
pub(crate) fn expects_reply(effect: &Effect) -> bool {
    !matches!(effect, Effect::SendLiveDone)
}

/// Messages that answer one effect, as opposed to intermediate progress.
pub(crate) fn is_reply(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::WordBatchFinished { .. }
            | Msg::FormatFinished(_)
            | Msg::VideoUploaded(_)
            | Msg::VideoProcessed(_)
            | Msg::ChecklistFinished(_)
            | Msg::VoicesLoaded(_)
            | Msg::SpeechSheetRead(_)
            | Msg::SpeechFinished(_)
            | Msg::DownloadsFinished { .. }
            | Msg::CleanupFinished { .. }
            | Msg::DirectoryBrowsed(_)
            | Msg::LiveSessionStarted(_)
            | Msg::LiveChannelClosed
            | Msg::HistoryLoaded(_)
            | Msg::ShutdownFinished(_)
    )
}

pub(crate) fn msg_for(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::BatchConverted(report) => batch_msg(report),
        EngineEvent::SpreadsheetFormatted(result) => Msg::FormatFinished(stringify(result)),
        EngineEvent::VideoUploaded(result) => Msg::VideoUploaded(stringify(result)),
        EngineEvent::JobProcessed(result) => Msg::VideoProcessed(stringify(result)),
        EngineEvent::ChecklistGenerated(result) => Msg::ChecklistFinished(stringify(result)),
        EngineEvent::VoicesLoaded(result) => Msg::VoicesLoaded(stringify(result)),
        EngineEvent::SpeechRowsRead(result) => Msg::SpeechSheetRead(stringify(result)),
        EngineEvent::SpeechProgress { completed, total } => {
            Msg::SpeechProgress { completed, total }
        }
        EngineEvent::SpeechFinished(result) => Msg::SpeechFinished(stringify(result)),
        EngineEvent::DownloadsFinished {
            origin,
            saved,
            failed,
        } => Msg::DownloadsFinished {
            origin,
            saved,
            failed,
        },
        EngineEvent::CleanupFinished {
            origin,
            job_id,
            result,
        } => Msg::CleanupFinished {
            origin,
            job_id,
            result: stringify(result),
        },
        EngineEvent::DirectoryBrowsed(result) => Msg::DirectoryBrowsed(stringify(result)),
        EngineEvent::LiveSessionStarted(result) => Msg::LiveSessionStarted(stringify(result)),
        EngineEvent::Live(signal) => match signal {
            LiveSignal::Opened => Msg::LiveChannelOpened,
            LiveSignal::Event(event) => Msg::LiveEventReceived(event),
            LiveSignal::TransportError(message) => Msg::LiveTransportError(message),
            LiveSignal::Closed => Msg::LiveChannelClosed,
        },
        EngineEvent::HistoryLoaded(result) => Msg::HistoryLoaded(stringify(result)),
        EngineEvent::ShutdownFinished(result) => Msg::ShutdownFinished(stringify(result)),
    }
}

fn batch_msg(report: BatchReport) -> Msg {
    let outcomes = report
        .outcomes
        .into_iter()
        .map(|(file_id, outcome)| {
            if let Err(err) = &outcome {
                desk_warn!("File {} not converted: {}", file_id, err);
            }
            (file_id, stringify(outcome))
        })
        .collect();
    Msg::WordBatchFinished { outcomes }
}

fn stringify<T>(result: Result<T, WorkflowError>) -> Result<T, String> {
    result.map_err(|err| err.to_string())
}
