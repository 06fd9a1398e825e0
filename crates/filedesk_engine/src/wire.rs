//! JSON shapes exchanged with the conversion server.

use filedesk_core::{HistoryEntry, LiveServerEvent, Voice};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ConvertWordResponse {
    pub id: String,
    pub pdf_filename: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProcessResponse {
    pub download_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChecklistResponse {
    pub id: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpeechRequest<'a> {
    pub text: &'a str,
    pub voice_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartSessionRequest<'a> {
    pub filename: &'a str,
    #[serde(rename = "saveLocation")]
    pub save_location: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BrowseResponse {
    pub path: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WsPortResponse {
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoiceRecord {
    pub id: String,
    pub name: String,
}

impl From<VoiceRecord> for Voice {
    fn from(record: VoiceRecord) -> Self {
        Voice {
            id: record.id,
            name: record.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryRecord {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub files: Vec<String>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        HistoryEntry {
            id: record.id,
            date: record.date,
            kind: record.kind,
            files: record.files,
        }
    }
}

/// Frames pushed by the server over the live channel.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum InboundFrame {
    Update { text: String },
    Saved { path: String },
}

impl From<InboundFrame> for LiveServerEvent {
    fn from(frame: InboundFrame) -> Self {
        match frame {
            InboundFrame::Update { text } => LiveServerEvent::Update { text },
            InboundFrame::Saved { path } => LiveServerEvent::Saved { path },
        }
    }
}

/// Frames the client sends after the session id handshake.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum OutboundFrame {
    Done,
}
