use bytes::Bytes;
use filedesk_core::{HistoryEntry, Voice};
use filedesk_logging::{desk_debug, desk_info, desk_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{embedded_error, error_message, transport_error};
use crate::wire::{
    BrowseResponse, HistoryRecord, StartSessionRequest, StartSessionResponse, VoiceRecord,
    WsPortResponse,
};
use crate::WorkflowError;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Server root, e.g. `http://localhost:5000`.
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Binary {
        bytes: Bytes,
        content_type: Option<String>,
    },
}

/// Which error variant a failed response maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Upload,
    Processing,
    Cleanup,
    Transport,
}

impl Stage {
    fn error(self, message: String) -> WorkflowError {
        match self {
            Stage::Upload => WorkflowError::Upload(message),
            Stage::Processing => WorkflowError::Processing(message),
            Stage::Cleanup => WorkflowError::Cleanup(message),
            Stage::Transport => WorkflowError::Transport(message),
        }
    }
}

/// Thin reqwest wrapper over every server endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, WorkflowError> {
        let mut base = Url::parse(&settings.base_url).map_err(|err| {
            WorkflowError::Transport(format!("invalid server url {}: {err}", settings.base_url))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(transport_error)?;
        Ok(Self { client, base })
    }

    /// Absolute URL for a server path such as `/download/job1/report.pdf`.
    pub fn url(&self, path: &str) -> Result<Url, WorkflowError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| WorkflowError::Transport(format!("invalid path {path}: {err}")))
    }

    /// WebSocket URL on the server host at `port`.
    pub fn live_url(&self, port: u16) -> String {
        let host = self.base.host_str().unwrap_or("localhost");
        format!("ws://{host}:{port}")
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: Form,
        stage: Stage,
    ) -> Result<ResponseBody, WorkflowError> {
        let request = self.client.post(self.url(path)?).multipart(form);
        self.execute(request, stage).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        stage: Stage,
    ) -> Result<ResponseBody, WorkflowError> {
        let request = self.client.post(self.url(path)?).json(body);
        self.execute(request, stage).await
    }

    pub(crate) async fn post_empty(
        &self,
        path: &str,
        stage: Stage,
    ) -> Result<ResponseBody, WorkflowError> {
        let request = self
            .client
            .post(self.url(path)?)
            .header(ACCEPT, "application/json");
        self.execute(request, stage).await
    }

    async fn get(&self, path: &str, stage: Stage) -> Result<ResponseBody, WorkflowError> {
        let request = self.client.get(self.url(path)?);
        self.execute(request, stage).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, WorkflowError> {
        let value = expect_json(self.get(path, Stage::Transport).await?, Stage::Transport)?;
        decode(value, Stage::Transport)
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        stage: Stage,
    ) -> Result<ResponseBody, WorkflowError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(transport_error)?;
        desk_debug!(
            "Response {} ({:?}, {} bytes)",
            status,
            content_type,
            bytes.len()
        );

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(stage.error(error_message(status, &body)));
        }

        let is_json = content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
            .is_some_and(|ct| ct.eq_ignore_ascii_case("application/json"));
        if is_json {
            let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|err| {
                stage.error(format!("server sent malformed JSON: {err}"))
            })?;
            if let Some(message) = embedded_error(&value) {
                return Err(stage.error(message));
            }
            return Ok(ResponseBody::Json(value));
        }
        Ok(ResponseBody::Binary {
            bytes,
            content_type,
        })
    }

    /// `GET` a server file byte for byte; only the status is checked, so a
    /// JSON artifact is saved exactly as served.
    pub async fn download(&self, path: &str) -> Result<Bytes, WorkflowError> {
        let response = self
            .client
            .get(self.url(path)?)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(WorkflowError::Transport(error_message(status, &body)));
        }
        desk_debug!("Downloaded {} ({} bytes)", path, bytes.len());
        Ok(bytes)
    }

    pub async fn voices(&self) -> Result<Vec<Voice>, WorkflowError> {
        let records: Vec<VoiceRecord> = self.get_json("/api/tts-voices").await?;
        desk_info!("Loaded {} voices", records.len());
        Ok(records.into_iter().map(Voice::from).collect())
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, WorkflowError> {
        let records: Vec<HistoryRecord> = self.get_json("/api/history").await?;
        Ok(records.into_iter().map(HistoryEntry::from).collect())
    }

    /// Returns the server-assigned session id.
    pub async fn start_live_session(
        &self,
        filename: &str,
        save_location: &str,
    ) -> Result<String, WorkflowError> {
        let body = StartSessionRequest {
            filename,
            save_location,
        };
        let value = expect_json(
            self.post_json("/api/start-excel-session", &body, Stage::Upload)
                .await?,
            Stage::Upload,
        )?;
        let response: StartSessionResponse = decode(value, Stage::Upload)?;
        desk_info!("Live session {} started", response.session_id);
        Ok(response.session_id)
    }

    pub async fn browse_directory(&self) -> Result<String, WorkflowError> {
        let response: BrowseResponse = self.get_json("/api/browse-directory").await?;
        match (response.path, response.error) {
            (_, Some(error)) => Err(WorkflowError::Transport(error)),
            (Some(path), None) if !path.is_empty() => Ok(path),
            _ => Err(WorkflowError::Transport("no directory selected".to_string())),
        }
    }

    pub async fn ws_port(&self) -> Result<u16, WorkflowError> {
        let response: WsPortResponse = self.get_json("/ws-port").await?;
        Ok(response.port)
    }

    pub async fn shutdown(&self) -> Result<(), WorkflowError> {
        self.get("/shutdown", Stage::Transport).await?;
        desk_warn!("Server shutdown requested");
        Ok(())
    }
}

pub(crate) fn expect_json(
    body: ResponseBody,
    stage: Stage,
) -> Result<serde_json::Value, WorkflowError> {
    match body {
        ResponseBody::Json(value) => Ok(value),
        ResponseBody::Binary { bytes, .. } => serde_json::from_slice(&bytes)
            .map_err(|err| stage.error(format!("expected a JSON response: {err}"))),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    value: serde_json::Value,
    stage: Stage,
) -> Result<T, WorkflowError> {
    serde_json::from_value(value)
        .map_err(|err| stage.error(format!("unexpected response shape: {err}")))
}
