use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub id: String,
    pub name: String,
}

/// Case-insensitive substring filter on voice names; an empty term keeps all.
pub fn filter_voices<'a>(voices: &'a [Voice], term: &str) -> Vec<&'a Voice> {
    let term = term.to_lowercase();
    voices
        .iter()
        .filter(|voice| voice.name.to_lowercase().contains(&term))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub files: Vec<String>,
}

/// One synthesized audio result, already written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechClip {
    pub text: String,
    pub file_name: String,
    pub saved_path: PathBuf,
}

pub fn speech_file_name(index: usize) -> String {
    format!("tts_output_{}.mp3", index + 1)
}

/// Switches sent alongside a spreadsheet to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub remove_blank_lines: bool,
    pub capitalize_sentences: bool,
    pub add_periods: bool,
    pub remove_spaces_quotes: bool,
    pub remove_spaces_unquoted: bool,
    pub remove_lone_quotes: bool,
    pub remove_ellipsis: bool,
}

impl FormatOptions {
    pub fn all() -> Self {
        Self {
            remove_blank_lines: true,
            capitalize_sentences: true,
            add_periods: true,
            remove_spaces_quotes: true,
            remove_spaces_unquoted: true,
            remove_lone_quotes: true,
            remove_ellipsis: true,
        }
    }

    /// Form field names and their `"true"`/`"false"` values, in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, &'static str)> {
        let flag = |on: bool| if on { "true" } else { "false" };
        vec![
            ("removeBlankLines", flag(self.remove_blank_lines)),
            ("capitalizeSentences", flag(self.capitalize_sentences)),
            ("addPeriods", flag(self.add_periods)),
            ("removeSpacesQuotes", flag(self.remove_spaces_quotes)),
            ("removeSpacesUnquoted", flag(self.remove_spaces_unquoted)),
            ("removeLoneQuotes", flag(self.remove_lone_quotes)),
            ("removeEllipsis", flag(self.remove_ellipsis)),
        ]
    }
}
