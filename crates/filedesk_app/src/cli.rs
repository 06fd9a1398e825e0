//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use filedesk_core::FormatOptions;

use crate::platform::CONFIG_FILENAME;

/// filedesk: client for the document conversion server
#[derive(Debug, Parser)]
#[command(name = "filedesk", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    pub(crate) config: PathBuf,

    /// Server root URL; overrides the config file
    #[arg(short, long)]
    pub(crate) server: Option<String>,

    /// Directory for downloaded results; overrides the config file
    #[arg(short, long)]
    pub(crate) download_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Convert Word documents to PDF and download the results
    ConvertWord(ConvertWordArgs),
    /// Clean up a spreadsheet's text cells
    FormatExcel(FormatExcelArgs),
    /// Build a document from a video and its script spreadsheet
    Video(VideoArgs),
    /// Synthesize speech from text or from the rows of a spreadsheet
    Tts(TtsArgs),
    /// List text-to-speech voices
    Voices(VoicesArgs),
    /// Generate a checklist from a Word document
    Checklist(ChecklistArgs),
    /// Capture rows into a spreadsheet over a live session
    Live(LiveArgs),
    /// Show processing history
    History,
    /// Delete a job's files on the server
    Delete(DeleteArgs),
    /// Download one file of a job
    Download(DownloadArgs),
    /// Stop the server
    Shutdown,
}

#[derive(Debug, Args)]
pub(crate) struct ConvertWordArgs {
    /// .doc or .docx files; all of them are converted
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,

    /// Keep the PDFs on the server only
    #[arg(long)]
    pub(crate) no_download: bool,
}

#[derive(Debug, Args, Default)]
pub(crate) struct FormatFlags {
    /// Apply every cleanup below
    #[arg(long)]
    pub(crate) all: bool,
    #[arg(long)]
    pub(crate) remove_blank_lines: bool,
    #[arg(long)]
    pub(crate) capitalize_sentences: bool,
    #[arg(long)]
    pub(crate) add_periods: bool,
    /// Remove spaces inside quotes
    #[arg(long)]
    pub(crate) remove_spaces_quotes: bool,
    /// Remove spaces in unquoted single-character runs
    #[arg(long)]
    pub(crate) remove_spaces_unquoted: bool,
    #[arg(long)]
    pub(crate) remove_lone_quotes: bool,
    #[arg(long)]
    pub(crate) remove_ellipsis: bool,
}

impl FormatFlags {
    pub(crate) fn options(&self) -> FormatOptions {
        if self.all {
            return FormatOptions::all();
        }
        FormatOptions {
            remove_blank_lines: self.remove_blank_lines,
            capitalize_sentences: self.capitalize_sentences,
            add_periods: self.add_periods,
            remove_spaces_quotes: self.remove_spaces_quotes,
            remove_spaces_unquoted: self.remove_spaces_unquoted,
            remove_lone_quotes: self.remove_lone_quotes,
            remove_ellipsis: self.remove_ellipsis,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct FormatExcelArgs {
    pub(crate) file: PathBuf,

    #[command(flatten)]
    pub(crate) flags: FormatFlags,
}

#[derive(Debug, Args)]
pub(crate) struct VideoArgs {
    #[arg(long)]
    pub(crate) video: PathBuf,

    /// Script spreadsheet (.xlsx or .xls)
    #[arg(long)]
    pub(crate) script: PathBuf,

    /// Delete the server's temporary files afterwards
    #[arg(long)]
    pub(crate) cleanup: bool,

    #[arg(long)]
    pub(crate) no_download: bool,
}

#[derive(Debug, Args)]
pub(crate) struct TtsArgs {
    /// Voice id, see `filedesk voices`
    #[arg(long)]
    pub(crate) voice: String,

    /// Text to speak
    #[arg(long, conflicts_with_all = ["sheet", "rows"])]
    pub(crate) text: Option<String>,

    /// Excel workbook (.xlsx or .xls); column A of the first sheet is spoken
    #[arg(long, conflicts_with = "rows")]
    pub(crate) sheet: Option<PathBuf>,

    /// Plain text file with one text per line; blank lines are skipped
    #[arg(long)]
    pub(crate) rows: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct VoicesArgs {
    /// Case-insensitive name filter
    #[arg(long, default_value = "")]
    pub(crate) filter: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChecklistArgs {
    /// Word document (.docx)
    pub(crate) file: PathBuf,

    #[arg(long)]
    pub(crate) no_download: bool,
}

#[derive(Debug, Args)]
pub(crate) struct LiveArgs {
    /// Workbook name, without extension
    #[arg(long)]
    pub(crate) filename: String,

    /// Directory on the server host; asks the server to browse when omitted
    #[arg(long)]
    pub(crate) save_location: Option<String>,

    /// Run the saved workbook through the formatter with these options
    #[arg(long)]
    pub(crate) format: bool,

    #[command(flatten)]
    pub(crate) flags: FormatFlags,
}

#[derive(Debug, Args)]
pub(crate) struct DeleteArgs {
    pub(crate) job_id: String,
}

#[derive(Debug, Args)]
pub(crate) struct DownloadArgs {
    pub(crate) job_id: String,
    pub(crate) filename: String,
}
