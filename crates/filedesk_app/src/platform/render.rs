//! Text rendering of the view model, one panel at a time.

use filedesk_core::{AppViewModel, LivePhase, Panel, QueueRowView};

pub(crate) fn render(view: &AppViewModel, panel: Panel) -> Vec<String> {
    let mut lines = match panel {
        Panel::WordToPdf => word(view),
        Panel::Formatter => formatter(view),
        Panel::Video => video(view),
        Panel::Speech => speech(view),
        Panel::Checklist => checklist(view),
        Panel::Live => live(view),
        Panel::History => history(view),
    };
    if let Some(notice) = &view.shutdown_notice {
        lines.push(notice.clone());
    }
    lines
}

/// Error shown by `panel`, if any; used for the exit status.
pub(crate) fn panel_error(view: &AppViewModel, panel: Panel) -> Option<String> {
    match panel {
        Panel::WordToPdf => view.word.error.clone(),
        Panel::Formatter => view
            .formatter
            .status
            .starts_with("Error")
            .then(|| view.formatter.status.clone()),
        Panel::Video => view.video.error.clone(),
        Panel::Speech => view.speech.error.clone(),
        Panel::Checklist => view.checklist.error.clone(),
        Panel::Live => view.live.error.clone(),
        Panel::History => view
            .history
            .status
            .starts_with("Error")
            .then(|| view.history.status.clone()),
    }
}

fn queue(title: &str, rows: &[QueueRowView]) -> Vec<String> {
    let mut lines = vec![format!("{title}:")];
    if rows.is_empty() {
        lines.push("  (empty)".to_string());
    }
    for row in rows {
        let mark = if row.selected { "x" } else { " " };
        lines.push(format!("  [{mark}] {}", row.label));
    }
    lines
}

fn progress(percent: Option<u8>) -> Option<String> {
    percent.map(|p| format!("Progress: {p}%"))
}

fn word(view: &AppViewModel) -> Vec<String> {
    let word = &view.word;
    let mut lines = queue("Documents", &word.sources);
    lines.extend(queue("Converted", &word.artifacts));
    lines.extend(progress(word.progress));
    lines.extend(word.error.iter().map(|e| format!("Error: {e}")));
    lines.extend(word.notice.clone());
    lines
}

fn formatter(view: &AppViewModel) -> Vec<String> {
    let formatter = &view.formatter;
    let mut lines: Vec<String> = formatter
        .files
        .iter()
        .map(|name| {
            let mark = if formatter.selected.as_deref() == Some(name.as_str()) {
                ">"
            } else {
                " "
            };
            format!("{mark} {name}")
        })
        .collect();
    if !formatter.status.is_empty() {
        lines.push(formatter.status.clone());
    }
    lines
}

fn video(view: &AppViewModel) -> Vec<String> {
    let video = &view.video;
    let mut lines = Vec::new();
    lines.extend(video.video.iter().map(|v| format!("Video: {v}")));
    lines.extend(video.script.iter().map(|s| format!("Script: {s}")));
    lines.extend(progress(video.progress));
    lines.extend(video.download_path.iter().map(|p| format!("Result: {p}")));
    lines.extend(video.error.iter().map(|e| format!("Error: {e}")));
    lines.extend(video.notice.clone());
    lines
}

fn speech(view: &AppViewModel) -> Vec<String> {
    let speech = &view.speech;
    let mut lines = Vec::new();
    if speech.voices_loading {
        lines.push("Loading voices...".to_string());
    }
    for voice in &speech.voices {
        let mark = if speech.selected_voice.as_deref() == Some(voice.id.as_str()) {
            ">"
        } else {
            " "
        };
        lines.push(format!("{mark} {:<28} {}", voice.id, voice.name));
    }
    lines.extend(speech.sheet.clone());
    if speech.rows_mode && speech.rows_total > 0 {
        lines.push(format!("Rows ({}):", speech.rows_total));
        lines.extend(speech.rows_preview.iter().map(|row| format!("  {row}")));
        if speech.rows_total > speech.rows_preview.len() {
            lines.push("  ...".to_string());
        }
    }
    if let Some((done, total)) = speech.progress {
        lines.push(format!("Converting {done}/{total}"));
    }
    for clip in &speech.clips {
        lines.push(format!("{} -> {}", clip.file_name, clip.saved_path.display()));
    }
    lines.extend(speech.error.iter().map(|e| format!("Error: {e}")));
    lines.extend(speech.notice.clone());
    lines
}

fn checklist(view: &AppViewModel) -> Vec<String> {
    let checklist = &view.checklist;
    let mut lines = Vec::new();
    lines.extend(checklist.file.clone());
    lines.extend(progress(checklist.progress));
    lines.extend(checklist.download_path.iter().map(|p| format!("Result: {p}")));
    lines.extend(checklist.error.iter().map(|e| format!("Error: {e}")));
    lines.extend(checklist.notice.clone());
    lines
}

fn live(view: &AppViewModel) -> Vec<String> {
    let live = &view.live;
    let mut lines = Vec::new();
    match live.phase {
        LivePhase::Idle => {}
        LivePhase::Connecting => lines.push(format!("Connecting session {}...", live.session_id)),
        LivePhase::Active => lines.push(format!(
            "Session {} active; type `done` and press Enter to save",
            live.session_id
        )),
        LivePhase::Closed => lines.push("Session closed".to_string()),
    }
    for (index, row) in live.rows.iter().enumerate() {
        let cursor = if live.scroll_to == Some(index) { ">" } else { " " };
        lines.push(format!("{cursor} {:>4} {row}", index + 1));
    }
    lines.extend(live.error.iter().map(|e| format!("Error: {e}")));
    lines.extend(live.notice.clone());
    lines
}

fn history(view: &AppViewModel) -> Vec<String> {
    let history = &view.history;
    let mut lines = Vec::new();
    if history.loading {
        lines.push("Loading history...".to_string());
    }
    for entry in &history.entries {
        lines.push(format!("{}  {}  {}", entry.id, entry.date, entry.kind));
        for file in &entry.files {
            lines.push(format!("    {file}"));
        }
    }
    if !history.status.is_empty() {
        lines.push(history.status.clone());
    }
    lines.extend(history.notice.clone());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedesk_core::{update, AppState, DropTarget, Msg, OfferedFile};

    #[test]
    fn word_panel_marks_selection() {
        let (state, _) = update(
            AppState::new(),
            Msg::FilesOffered {
                target: DropTarget::WordSources,
                files: vec![
                    OfferedFile::new("a.docx", "/in/a.docx", 1),
                    OfferedFile::new("b.docx", "/in/b.docx", 1),
                ],
            },
        );
        let (state, _) = update(state, Msg::WordSourceToggled(2));
        let lines = render(&state.view(), Panel::WordToPdf);
        assert!(lines.contains(&"  [ ] a.docx".to_string()));
        assert!(lines.contains(&"  [x] b.docx".to_string()));
        assert!(lines.contains(&"  (empty)".to_string()));
    }

    #[test]
    fn formatter_errors_count_as_panel_errors() {
        let (state, _) = update(
            AppState::new(),
            Msg::FormatFinished(Err("bad sheet".to_string())),
        );
        assert_eq!(
            panel_error(&state.view(), Panel::Formatter).as_deref(),
            Some("Error during formatting: bad sheet")
        );
        assert_eq!(panel_error(&state.view(), Panel::WordToPdf), None);
    }

    #[test]
    fn speech_preview_elides_long_sheets() {
        let rows = (1..=6).map(|n| format!("row {n}")).collect();
        let (state, _) = update(AppState::new(), Msg::SpeechSheetRead(Ok(rows)));
        let lines = render(&state.view(), Panel::Speech);
        assert!(lines.contains(&"Rows (6):".to_string()));
        assert!(lines.contains(&"  row 5".to_string()));
        assert!(!lines.contains(&"  row 6".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("  ..."));
        assert_eq!(panel_error(&state.view(), Panel::Speech), None);
    }
}
