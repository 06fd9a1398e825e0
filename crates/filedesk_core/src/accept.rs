use std::fmt;

use thiserror::Error;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";
const XLSM_MIME: &str = "application/vnd.ms-excel.sheet.macroEnabled.12";

/// What a local file is used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    Document,
    Spreadsheet,
    Video,
    Script,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileCategory::Document => "document",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::Video => "video",
            FileCategory::Script => "script",
        };
        f.write_str(label)
    }
}

/// A file was refused locally and never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub file_name: String,
    pub message: String,
}

/// Accepted set for one drop target.
///
/// A file passes when its MIME type is listed, its MIME type starts with
/// `mime_prefix`, or its name ends with one of `extensions`. Suffix checks
/// are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptRule {
    pub category: FileCategory,
    pub extensions: &'static [&'static str],
    pub mime_types: &'static [&'static str],
    pub mime_prefix: Option<&'static str>,
    pub rejection: &'static str,
}

impl AcceptRule {
    pub fn word_document() -> Self {
        Self {
            category: FileCategory::Document,
            extensions: &[".doc", ".docx"],
            mime_types: &[],
            mime_prefix: None,
            rejection: "Please upload only Word files (.doc or .docx)",
        }
    }

    pub fn checklist_document() -> Self {
        Self {
            category: FileCategory::Document,
            extensions: &[".docx"],
            mime_types: &[],
            mime_prefix: None,
            rejection: "Please select a valid Word document (.docx)",
        }
    }

    pub fn formatter_spreadsheet() -> Self {
        Self {
            category: FileCategory::Spreadsheet,
            extensions: &[".xlsx", ".xls", ".xlsm", ".xltx", ".xltm"],
            mime_types: &[XLSX_MIME, XLS_MIME],
            mime_prefix: None,
            rejection: "Please upload only Excel files (.xlsx, .xls, .xlsm, .xltx, .xltm)",
        }
    }

    pub fn video() -> Self {
        Self {
            category: FileCategory::Video,
            extensions: &[],
            mime_types: &[],
            mime_prefix: Some("video/"),
            rejection: "Please select a valid video file.",
        }
    }

    pub fn script() -> Self {
        Self {
            category: FileCategory::Script,
            extensions: &[".xlsx", ".xls"],
            mime_types: &[XLS_MIME, XLSX_MIME, XLSM_MIME],
            mime_prefix: None,
            rejection: "Please select a valid Excel file.",
        }
    }

    /// Rows for speech synthesis; checked by name only.
    pub fn speech_rows() -> Self {
        Self {
            category: FileCategory::Spreadsheet,
            extensions: &[".xlsx", ".xls"],
            mime_types: &[],
            mime_prefix: None,
            rejection: "Please upload a valid Excel file (.xlsx or .xls)",
        }
    }

    pub fn accepts(&self, file_name: &str, mime: Option<&str>) -> bool {
        let by_mime = mime.is_some_and(|mime| {
            self.mime_types.contains(&mime)
                || self
                    .mime_prefix
                    .is_some_and(|prefix| mime.starts_with(prefix))
        });
        by_mime || self.extensions.iter().any(|ext| file_name.ends_with(ext))
    }

    pub fn validate(&self, file_name: &str, mime: Option<&str>) -> Result<(), ValidationError> {
        if self.accepts(file_name, mime) {
            Ok(())
        } else {
            Err(ValidationError {
                file_name: file_name.to_string(),
                message: self.rejection.to_string(),
            })
        }
    }
}
