use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use filedesk_engine::{ApiSettings, EngineSettings};
use filedesk_logging::desk_info;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub(crate) const CONFIG_FILENAME: &str = "filedesk.ron";

/// Contents of `filedesk.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) server_url: String,
    pub(crate) ws_port: Option<u16>,
    pub(crate) download_dir: PathBuf,
    pub(crate) log_destination: LogDestination,
    pub(crate) log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            ws_port: None,
            download_dir: PathBuf::from("./downloads"),
            log_destination: LogDestination::Terminal,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        let config: AppConfig = ron::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        desk_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Command-line values win over the file.
    pub(crate) fn with_overrides(
        mut self,
        server_url: Option<String>,
        download_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(dir) = download_dir {
            self.download_dir = dir;
        }
        self
    }

    pub(crate) fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            api: ApiSettings {
                base_url: self.server_url.clone(),
            },
            download_dir: self.download_dir.clone(),
            ws_port: self.ws_port,
        }
    }

    pub(crate) fn level(&self) -> log::LevelFilter {
        filedesk_logging::parse_level(&self.log_level)
    }
}
