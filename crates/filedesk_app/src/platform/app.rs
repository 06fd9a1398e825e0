use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use filedesk_core::{update, AppState, AppViewModel, DropTarget, Msg, OfferedFile, Panel};
use filedesk_engine::EngineSettings;
use filedesk_logging::{desk_debug, desk_info, desk_warn};

use super::config::AppConfig;
use super::effects::{is_reply, EffectRunner};
use super::{logging, render};
use crate::cli::{Cli, Command, FormatFlags, LiveArgs};

pub(crate) fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli.config)?.with_overrides(cli.server, cli.download_dir);
    logging::initialize(config.log_destination, config.level());
    desk_info!(
        "filedesk talking to {} saving into {:?}",
        config.server_url,
        config.download_dir
    );

    let mut controller = Controller::new(config.engine_settings())?;
    controller.execute(cli.command)
}

/// Drives the pure core from the command line: offers inputs as messages,
/// forwards effects to the engine and waits until every effect has answered.
pub(crate) struct Controller {
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    awaiting: usize,
    panel: Panel,
    shown: Vec<String>,
    failures: Vec<String>,
}

impl Controller {
    pub(crate) fn new(settings: EngineSettings) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let runner = EffectRunner::new(settings, msg_tx.clone()).context("starting engine")?;
        Ok(Self {
            state: AppState::new(),
            runner,
            msg_tx,
            msg_rx,
            awaiting: 0,
            panel: Panel::WordToPdf,
            shown: Vec::new(),
            failures: Vec::new(),
        })
    }

    pub(crate) fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::ConvertWord(args) => {
                self.show_panel(Panel::WordToPdf);
                self.offer(DropTarget::WordSources, &args.files)?;
                for row in self.view().word.sources {
                    if !row.selected {
                        self.dispatch(Msg::WordSourceToggled(row.key));
                    }
                }
                self.dispatch(Msg::ConvertSelectedClicked);
                self.run_until_idle();
                if !args.no_download {
                    for key in self.state.artifact_ids() {
                        self.dispatch(Msg::ArtifactToggled(key));
                    }
                    self.dispatch(Msg::DownloadSelectedClicked);
                    self.run_until_idle();
                }
            }
            Command::FormatExcel(args) => {
                self.show_panel(Panel::Formatter);
                self.offer(DropTarget::FormatterFiles, std::slice::from_ref(&args.file))?;
                self.format_last(&args.flags)?;
            }
            Command::Video(args) => {
                self.show_panel(Panel::Video);
                self.offer(DropTarget::Video, std::slice::from_ref(&args.video))?;
                self.offer(DropTarget::Script, std::slice::from_ref(&args.script))?;
                self.dispatch(Msg::ProcessVideoClicked);
                self.run_until_idle();
                self.check()?;
                if !args.no_download {
                    self.dispatch(Msg::ResultDownloadClicked(Panel::Video));
                    self.run_until_idle();
                }
                if args.cleanup {
                    self.dispatch(Msg::VideoCleanupClicked);
                    self.run_until_idle();
                }
            }
            Command::Tts(args) => {
                self.show_panel(Panel::Speech);
                self.dispatch(Msg::VoiceSelected(args.voice));
                match (args.text, args.sheet, args.rows) {
                    (Some(text), _, _) => self.dispatch(Msg::SpeechTextChanged(text)),
                    (None, Some(sheet), _) => {
                        self.offer(DropTarget::SpeechRows, std::slice::from_ref(&sheet))?;
                        self.run_until_idle();
                        self.check()?;
                    }
                    (None, None, Some(path)) => {
                        let content = fs::read_to_string(&path)
                            .with_context(|| format!("reading rows from {}", path.display()))?;
                        self.dispatch(Msg::SpeechRowsLoaded(
                            content.lines().map(str::to_string).collect(),
                        ));
                    }
                    (None, None, None) => bail!("one of --text, --sheet or --rows is required"),
                }
                self.dispatch(Msg::SynthesizeClicked);
                self.run_until_idle();
            }
            Command::Voices(args) => {
                self.show_panel(Panel::Speech);
                self.dispatch(Msg::VoiceFilterChanged(args.filter));
                self.dispatch(Msg::VoicesRequested);
                self.run_until_idle();
            }
            Command::Checklist(args) => {
                self.show_panel(Panel::Checklist);
                self.offer(DropTarget::Checklist, std::slice::from_ref(&args.file))?;
                self.dispatch(Msg::ProcessChecklistClicked);
                self.run_until_idle();
                self.check()?;
                if !args.no_download {
                    self.dispatch(Msg::ResultDownloadClicked(Panel::Checklist));
                    self.run_until_idle();
                }
            }
            Command::Live(args) => self.live(args)?,
            Command::History => {
                self.show_panel(Panel::History);
                self.dispatch(Msg::HistoryRequested);
                self.run_until_idle();
            }
            Command::Delete(args) => {
                self.show_panel(Panel::History);
                self.dispatch(Msg::DeleteJobClicked(args.job_id));
                self.run_until_idle();
            }
            Command::Download(args) => {
                self.show_panel(Panel::History);
                self.dispatch(Msg::HistoryDownloadClicked {
                    job_id: args.job_id,
                    filename: args.filename,
                });
                self.run_until_idle();
            }
            Command::Shutdown => {
                self.dispatch(Msg::ShutdownClicked);
                self.run_until_idle();
                if let Some(notice) = self.view().shutdown_notice {
                    if notice.starts_with("Error") {
                        bail!(notice);
                    }
                }
            }
        }
        self.check()
    }

    fn live(&mut self, args: LiveArgs) -> anyhow::Result<()> {
        self.show_panel(Panel::Live);
        self.dispatch(Msg::LiveFilenameChanged(args.filename));
        match args.save_location {
            Some(location) => self.dispatch(Msg::SaveLocationChanged(location)),
            None => {
                self.dispatch(Msg::BrowseClicked);
                self.run_until_idle();
            }
        }
        self.dispatch(Msg::StartLiveClicked);
        self.check()?;
        spawn_done_reader(self.msg_tx.clone());
        self.run_until_idle();
        self.check()?;

        if args.format {
            if self.state.live_session().saved_path().is_none() {
                bail!("the session ended without a saved workbook");
            }
            self.dispatch(Msg::SendToFormatterClicked);
            self.show_panel(Panel::Formatter);
            self.format_last(&args.flags)?;
        }
        Ok(())
    }

    fn format_last(&mut self, flags: &FormatFlags) -> anyhow::Result<()> {
        let Some(id) = self.state.formatter_files().last().map(|file| file.id) else {
            bail!("{}", self.view().formatter.status);
        };
        self.dispatch(Msg::FormatterFileSelected(id));
        self.dispatch(Msg::FormatterOptionsChanged(flags.options()));
        self.dispatch(Msg::FormatClicked);
        self.run_until_idle();
        Ok(())
    }

    fn offer(&mut self, target: DropTarget, paths: &[PathBuf]) -> anyhow::Result<()> {
        let files = paths
            .iter()
            .map(|path| offered_file(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        self.dispatch(Msg::FilesOffered { target, files });
        self.check()
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) {
        if is_reply(&msg) {
            self.awaiting = self.awaiting.saturating_sub(1);
        }
        self.note_failures(&msg);
        desk_debug!("Dispatching {:?}", msg);

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let lines = render::render(&state.view(), self.panel);
            self.print_changes(lines);
        }
        self.state = state;
        self.awaiting += self.runner.enqueue(effects);
    }

    /// Processes messages until no effect is outstanding.
    pub(crate) fn run_until_idle(&mut self) {
        loop {
            while let Ok(msg) = self.msg_rx.try_recv() {
                self.dispatch(msg);
            }
            if self.awaiting == 0 {
                return;
            }
            match self.msg_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    pub(crate) fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn show_panel(&mut self, panel: Panel) {
        self.panel = panel;
        self.shown.clear();
    }

    fn print_changes(&mut self, lines: Vec<String>) {
        for line in new_lines(&self.shown, &lines) {
            println!("{line}");
        }
        self.shown = lines;
    }

    fn note_failures(&mut self, msg: &Msg) {
        match msg {
            Msg::DownloadsFinished { failed, .. } => {
                for (name, message) in failed {
                    desk_warn!("Download of {} failed: {}", name, message);
                    self.failures
                        .push(format!("download of {name} failed: {message}"));
                }
            }
            Msg::CleanupFinished {
                job_id,
                result: Err(message),
                ..
            } => {
                self.failures
                    .push(format!("failed to delete job {job_id}: {message}"));
            }
            _ => {}
        }
    }

    /// Fails with the first error the current panel shows.
    fn check(&self) -> anyhow::Result<()> {
        if let Some(error) = render::panel_error(&self.view(), self.panel) {
            bail!(error);
        }
        if let Some(failure) = self.failures.first() {
            bail!("{failure}");
        }
        Ok(())
    }
}

/// Lines of `current` past the part it shares with `previous`.
fn new_lines<'a>(previous: &[String], current: &'a [String]) -> &'a [String] {
    let common = previous
        .iter()
        .zip(current)
        .take_while(|(old, new)| old == new)
        .count();
    &current[common..]
}

fn offered_file(path: &Path) -> anyhow::Result<OfferedFile> {
    let metadata =
        fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let file = OfferedFile::new(name, path, metadata.len());
    Ok(match mime_guess::from_path(path).first() {
        Some(mime) => file.with_mime(mime.essence_str()),
        None => file,
    })
}

/// `done` or an empty line on stdin asks the live session to save.
fn spawn_done_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() || line.eq_ignore_ascii_case("done") {
                if msg_tx.send(Msg::LiveDoneClicked).is_err() {
                    break;
                }
            } else {
                desk_warn!("Type `done` to save the session");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedesk_engine::ApiSettings;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn settings(server: &MockServer, dir: &Path) -> EngineSettings {
        EngineSettings {
            api: ApiSettings {
                base_url: server.uri(),
            },
            download_dir: dir.to_path_buf(),
            ws_port: None,
        }
    }

    #[test]
    fn only_changed_tail_is_printed() {
        let before = lines(&["Session s1 active", "     1 a"]);
        let after = lines(&["Session s1 active", "     1 a", "     2 b"]);
        assert_eq!(new_lines(&before, &after), &lines(&["     2 b"])[..]);
        assert_eq!(new_lines(&[], &after), &after[..]);
    }

    #[test]
    fn offered_file_guesses_mime() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.docx");
        fs::write(&path, b"12345").unwrap();

        let file = offered_file(&path).unwrap();
        assert_eq!(file.name, "report.docx");
        assert_eq!(file.size, 5);
        assert_eq!(
            file.mime.as_deref(),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        );
        assert!(offered_file(temp.path()).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn convert_word_downloads_every_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/convert-word"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "id": "job1",
                "pdf_filename": "report.pdf"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/download/job1/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("report.docx");
        fs::write(&source, b"docx").unwrap();
        let out = temp.path().join("out");
        let settings = settings(&server, &out);

        let result = tokio::task::spawn_blocking(move || {
            let mut controller = Controller::new(settings)?;
            controller.execute(Command::ConvertWord(crate::cli::ConvertWordArgs {
                files: vec![source],
                no_download: false,
            }))
        })
        .await
        .unwrap();

        result.unwrap();
        assert_eq!(fs::read(out.join("report.pdf")).unwrap(), b"%PDF");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_delete_is_an_error_exit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cleanup/nope"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "unknown job"})),
            )
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let settings = settings(&server, temp.path());
        let result = tokio::task::spawn_blocking(move || {
            let mut controller = Controller::new(settings)?;
            controller.execute(Command::Delete(crate::cli::DeleteArgs {
                job_id: "nope".to_string(),
            }))
        })
        .await
        .unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("unknown job"), "{err}");
    }
}
