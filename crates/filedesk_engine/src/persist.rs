use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use filedesk_logging::desk_debug;
use tempfile::Builder;
use thiserror::Error;

use crate::filename::safe_file_name;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot create download directory {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot save {name}: {source}")]
    Write { name: String, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Local folder receiving downloaded and generated artifacts.
///
/// Server-supplied names go through [`safe_file_name`] before they touch the
/// disk. Each file lands via a hidden `.part` temp file renamed over the
/// target, so a reader never sees a half-written artifact and a repeated
/// download replaces the earlier copy.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    root: PathBuf,
}

impl DownloadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the folder when missing.
    pub fn prepare(&self) -> Result<&Path, PersistError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(PersistError::NotADirectory(self.root.clone())),
            Err(_) => fs::create_dir_all(&self.root).map_err(|source| PersistError::CreateDir {
                path: self.root.clone(),
                source,
            })?,
        }
        Ok(&self.root)
    }

    /// Stores `bytes` under the sanitized `server_name`; returns the final path.
    pub fn save(&self, server_name: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        let root = self.prepare()?;
        let name = safe_file_name(server_name);
        let write_err = |source: io::Error| PersistError::Write {
            name: name.clone(),
            source,
        };

        let mut part = Builder::new()
            .prefix(".part-")
            .tempfile_in(root)
            .map_err(write_err)?;
        part.write_all(bytes).map_err(write_err)?;
        part.as_file_mut().sync_all().map_err(write_err)?;

        let target = root.join(&name);
        part.persist(&target).map_err(|err| write_err(err.error))?;
        desk_debug!("Saved {} bytes as {:?}", bytes.len(), target);
        Ok(target)
    }
}
