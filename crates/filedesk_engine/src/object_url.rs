use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use filedesk_logging::desk_debug;
use tempfile::NamedTempFile;

use crate::filename::safe_file_name;
use crate::persist::{DownloadDir, PersistError};

/// A binary response materialized on local disk.
///
/// The backing temp file lives exactly as long as this value; dropping it or
/// calling [`ObjectUrl::revoke`] deletes it. Callers [`persist`](Self::persist)
/// the bytes somewhere permanent first if they want to keep them.
#[derive(Debug)]
pub struct ObjectUrl {
    file: NamedTempFile,
    suggested_name: String,
    content_type: Option<String>,
    len: u64,
}

impl ObjectUrl {
    pub fn create(
        bytes: &[u8],
        suggested_name: &str,
        content_type: Option<String>,
    ) -> Result<Self, PersistError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        desk_debug!(
            "Materialized {} bytes for {} at {:?}",
            bytes.len(),
            suggested_name,
            file.path()
        );
        Ok(Self {
            file,
            suggested_name: safe_file_name(suggested_name),
            content_type,
            len: bytes.len() as u64,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn suggested_name(&self) -> &str {
        &self.suggested_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read(&self) -> Result<Vec<u8>, PersistError> {
        Ok(fs::read(self.file.path())?)
    }

    /// Copy the bytes into `dir` under `file_name`, or under the suggested
    /// name when `None`.
    pub fn persist(
        &self,
        dir: &DownloadDir,
        file_name: Option<&str>,
    ) -> Result<PathBuf, PersistError> {
        let name = file_name.unwrap_or(self.suggested_name.as_str());
        dir.save(name, &self.read()?)
    }

    /// Delete the backing file now.
    pub fn revoke(self) -> Result<(), PersistError> {
        desk_debug!("Revoking {}", self.suggested_name);
        self.file.close()?;
        Ok(())
    }
}
