use std::path::PathBuf;

use crate::FileCategory;

pub type FileId = u64;

/// A local file waiting in one of the panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub id: FileId,
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mime: Option<String>,
    pub category: FileCategory,
}

/// A file as it was picked or dropped, before validation assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mime: Option<String>,
}

impl OfferedFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Human-readable size in binary units, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

/// `report.xlsx` -> `report_modified.xlsx`; names without a dot get the suffix appended.
pub fn modified_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => format!("{}_modified{}", &name[..idx], &name[idx..]),
        None => format!("{name}_modified"),
    }
}
