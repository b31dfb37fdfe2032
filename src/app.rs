//! Narration Studio form — egui/eframe application.
//!
//! # Architecture
//!
//! [`NarrationApp`] is the top-level [`eframe::App`].  It owns the form
//! values and two channel endpoints:
//!
//! * `command_tx` — sends a validated [`PipelineConfig`] to the orchestrator.
//! * `event_rx`   — receives [`PipelineEvent`]s back from it.
//!
//! The window never blocks: a run happens on the tokio runtime while the form
//! shows the current [`PipelineState`].  The Run button stays disabled until
//! the run reaches `Done` or `Failed`; a started run cannot be cancelled.
//!
//! # Sections
//!
//! | Section | Contents |
//! |---------|----------|
//! | Manuscript | path box (or drop a `.txt` onto the window) |
//! | Rewrite style | narration style, sentence-ending instruction |
//! | Voice | voice picker + description, speaking-style notes |
//! | Output | project name, clear-outputs checkbox |
//! | Run | button, status line, result / error text |
//! | Audio | MP3 files in the project folder, play / copy path / export |

use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::{AppConfig, PipelineConfig};
use crate::form::{self, FormInput};
use crate::pipeline::{list_audio, PipelineEvent, PipelineState, Workspace};
use crate::tts::{Playback, Voice};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(68, 136, 255);
const OK_GREEN: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const WARN_ORANGE: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);

// ---------------------------------------------------------------------------
// Outcome of the last run, as shown under the Run button
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Notice {
    /// Form validation failed; no run was started.
    Warning(String),
    /// The run finished; stdout-style summary.
    Success(String),
    /// The run (or staging it) failed; raw diagnostic text.
    Failure(String),
}

// ---------------------------------------------------------------------------
// NarrationApp
// ---------------------------------------------------------------------------

/// eframe application — the manuscript → narration → audio form.
pub struct NarrationApp {
    // ── Form values ──────────────────────────────────────────────────────
    manuscript_path: String,
    style: String,
    ending: String,
    voice: Voice,
    speaker_prompt: String,
    project_name: String,
    clear_outputs: bool,
    export_dir: String,

    // ── Run state ────────────────────────────────────────────────────────
    /// State of the current (or last) run.
    pub pipeline_state: PipelineState,
    notice: Option<Notice>,
    cleared_files: Option<usize>,

    // ── Audio listing cache ──────────────────────────────────────────────
    /// Folder the listing below belongs to.
    listed_dir: Option<PathBuf>,
    audio_files: Vec<PathBuf>,
    listing_status: Option<String>,
    /// Clip currently playing, if any.
    playback: Option<Playback>,

    // ── Channels ─────────────────────────────────────────────────────────
    /// Send run configurations to the orchestrator.
    pub command_tx: mpsc::Sender<PipelineConfig>,
    /// Receive progress / outcome from the orchestrator.
    pub event_rx: mpsc::Receiver<PipelineEvent>,

    // ── Configuration ────────────────────────────────────────────────────
    workspace: Workspace,
    pub config: AppConfig,
}

impl NarrationApp {
    /// Create a new [`NarrationApp`].
    ///
    /// * `command_tx` — sender end of the orchestrator command channel.
    /// * `event_rx`   — receiver end of the orchestrator event channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        command_tx: mpsc::Sender<PipelineConfig>,
        event_rx: mpsc::Receiver<PipelineEvent>,
        config: AppConfig,
    ) -> Self {
        Self {
            manuscript_path: String::new(),
            style: config.ui.default_style.clone(),
            ending: config.ui.default_ending.clone(),
            voice: config.ui.default_voice,
            speaker_prompt: String::new(),
            project_name: String::new(),
            clear_outputs: false,
            export_dir: String::new(),
            pipeline_state: PipelineState::Idle,
            notice: None,
            cleared_files: None,
            listed_dir: None,
            audio_files: Vec::new(),
            listing_status: None,
            playback: None,
            command_tx,
            event_rx,
            workspace: Workspace::from_config(&config.workspace),
            config,
        }
    }

    fn form_input(&self) -> FormInput {
        let path = self.manuscript_path.trim();
        FormInput {
            manuscript: (!path.is_empty()).then(|| PathBuf::from(path)),
            style: self.style.clone(),
            ending: self.ending.clone(),
            voice: self.voice,
            speaker_prompt: self.speaker_prompt.clone(),
            project_name: self.project_name.clone(),
            clear_outputs: self.clear_outputs,
        }
    }

    /// Output folder for the current project name, if the name is valid.
    fn current_output_dir(&self) -> Option<PathBuf> {
        form::project_dir(self.workspace.projects_dir(), &self.project_name)
            .ok()
            .flatten()
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending orchestrator events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                PipelineEvent::OutputsCleared { removed } => {
                    self.cleared_files = Some(removed);
                }
                PipelineEvent::StateChanged(state) => {
                    self.pipeline_state = state;
                    if state.is_terminal() {
                        self.listed_dir = None;
                    }
                }
                PipelineEvent::Completed(report) => {
                    self.pipeline_state = PipelineState::Done;
                    self.notice = Some(Notice::Success(report.to_string()));
                    self.listed_dir = None;
                }
                PipelineEvent::Failed { message } => {
                    self.pipeline_state = PipelineState::Failed;
                    self.notice = Some(Notice::Failure(message));
                    self.listed_dir = None;
                }
            }
        }
    }

    // ── Run ──────────────────────────────────────────────────────────────

    /// Validate the form, stage the manuscript, and hand the run to the
    /// orchestrator.
    fn start_run(&mut self) {
        self.cleared_files = None;
        self.listing_status = None;

        let validated = match form::validate(&self.form_input(), self.workspace.projects_dir()) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("form rejected: {e}");
                self.notice = Some(Notice::Warning(e.to_string()));
                return;
            }
        };

        if let Err(e) = std::fs::create_dir_all(&validated.output_dir) {
            self.notice = Some(Notice::Failure(format!(
                "cannot create {}: {e}",
                validated.output_dir.display()
            )));
            return;
        }

        let input_file = match self.workspace.stage_manuscript(&validated.manuscript) {
            Ok(path) => path,
            Err(e) => {
                self.notice = Some(Notice::Failure(format!(
                    "cannot stage {}: {e}",
                    validated.manuscript.display()
                )));
                return;
            }
        };

        let run = validated.to_pipeline_config(input_file);

        // Keep a copy of the last run's settings next to the working dirs.
        if let Err(e) = run.save_to(&self.workspace.transfer_file()) {
            log::warn!("could not record run config: {e}");
        }

        match self.command_tx.try_send(run) {
            Ok(()) => {
                self.pipeline_state = PipelineState::ConfigLoaded;
                self.notice = None;
            }
            Err(e) => {
                self.notice = Some(Notice::Failure(format!("pipeline unavailable: {e}")));
            }
        }
    }

    // ── Audio listing ────────────────────────────────────────────────────

    /// Re-read the project folder when the project changed or a run ended.
    fn refresh_audio_files(&mut self) {
        let dir = self.current_output_dir();
        if dir == self.listed_dir {
            return;
        }
        self.audio_files = match &dir {
            Some(d) => list_audio(d).unwrap_or_else(|e| {
                log::warn!("cannot list {}: {e}", d.display());
                Vec::new()
            }),
            None => Vec::new(),
        };
        self.listed_dir = dir;
    }

    fn toggle_playback(&mut self, file: &Path) {
        let was_playing = self.playback.as_ref().is_some_and(|p| p.path() == file);
        // Dropping the handle stops whatever is playing.
        self.playback = None;
        if was_playing {
            return;
        }
        match Playback::start(file.to_path_buf()) {
            Ok(playback) => self.playback = Some(playback),
            Err(e) => {
                log::warn!("playback failed: {e}");
                self.listing_status = Some(format!("再生できませんでした: {e}"));
            }
        }
    }

    /// Collect the outcome of a clip that has played to the end.
    fn poll_playback(&mut self) {
        if !self.playback.as_ref().is_some_and(Playback::is_finished) {
            return;
        }
        if let Some(Err(e)) = self.playback.take().map(Playback::finish) {
            log::warn!("playback failed: {e}");
            self.listing_status = Some(format!("再生できませんでした: {e}"));
        }
    }

    fn export_file(&mut self, file: &Path) {
        let dest_dir = PathBuf::from(self.export_dir.trim());
        if dest_dir.as_os_str().is_empty() {
            self.listing_status = Some("保存先フォルダを入力してください。".into());
            return;
        }
        let Some(name) = file.file_name() else {
            return;
        };
        let dest = dest_dir.join(name);
        let result = std::fs::create_dir_all(&dest_dir).and_then(|_| std::fs::copy(file, &dest));
        self.listing_status = Some(match result {
            Ok(bytes) => format!("保存しました: {} ({bytes} bytes)", dest.display()),
            Err(e) => format!("保存できませんでした: {e}"),
        });
    }

    // ── Dropped files ────────────────────────────────────────────────────

    fn take_dropped_manuscript(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|f| f.path) {
            self.manuscript_path = path.display().to_string();
        }
    }

    // ── Section renderers ────────────────────────────────────────────────

    fn heading(ui: &mut egui::Ui, text: &str) {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(text).strong().size(15.0));
        ui.add_space(2.0);
    }

    fn draw_manuscript(&mut self, ui: &mut egui::Ui) {
        Self::heading(ui, "テキストファイル");
        ui.horizontal(|ui| {
            ui.label(".txt ファイル:");
            ui.add(
                egui::TextEdit::singleline(&mut self.manuscript_path)
                    .hint_text("パスを入力、またはウィンドウにドロップ")
                    .desired_width(f32::INFINITY),
            );
        });
    }

    fn draw_style(&mut self, ui: &mut egui::Ui) {
        Self::heading(ui, "リライトスタイル");
        ui.label("ナレーションスタイル");
        ui.add(egui::TextEdit::singleline(&mut self.style).desired_width(f32::INFINITY));
        ui.label("文末・語尾・口調のスタイル指示");
        ui.add(
            egui::TextEdit::multiline(&mut self.ending)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
    }

    fn draw_voice(&mut self, ui: &mut egui::Ui) {
        Self::heading(ui, "話者のスタイル");
        egui::ComboBox::from_label("TTSボイス")
            .selected_text(self.voice.display_name())
            .show_ui(ui, |ui| {
                for voice in Voice::ALL {
                    ui.selectable_value(&mut self.voice, voice, voice.display_name());
                }
            });
        ui.label(
            egui::RichText::new(format!("特徴：{}", self.voice.description()))
                .color(egui::Color32::from_rgb(150, 150, 150))
                .size(12.0),
        );
        ui.add_space(4.0);
        egui::CollapsingHeader::new("プロンプト作成のガイド").show(ui, |ui| {
            ui.label(
                egui::RichText::new(
                    "ChatGPTなどに声の特徴を伝えて話し方スタイルを生成し、下の欄に貼り付けてください。",
                )
                .size(12.0),
            );
        });
        ui.label("話し方のスタイル指示文");
        ui.add(
            egui::TextEdit::multiline(&mut self.speaker_prompt)
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
    }

    fn draw_output(&mut self, ui: &mut egui::Ui) {
        Self::heading(ui, "出力先フォルダ");
        ui.horizontal(|ui| {
            ui.label(format!("{}/", self.workspace.projects_dir().display()));
            ui.text_edit_singleline(&mut self.project_name);
        });
        if !self.project_name.trim().is_empty() && !form::is_valid_project_name(&self.project_name)
        {
            ui.colored_label(WARN_ORANGE, "半角英数字とハイフン以外の文字は使えません。");
        }
        ui.checkbox(&mut self.clear_outputs, "実行前に前回の出力を削除する");
    }

    fn draw_run(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        let busy = self.pipeline_state.is_busy();
        ui.horizontal(|ui| {
            let button = egui::Button::new(egui::RichText::new("リライト＋音声化を実行").size(14.0));
            if ui.add_enabled(!busy, button).clicked() {
                self.start_run();
            }
            if busy {
                ui.spinner();
                ui.label(egui::RichText::new(self.pipeline_state.label()).color(ACCENT));
            }
        });

        if let Some(removed) = self.cleared_files {
            ui.label(
                egui::RichText::new(format!("前回の出力を削除しました（{removed} ファイル）"))
                    .size(11.0),
            );
        }

        match &self.notice {
            Some(Notice::Warning(msg)) => {
                ui.colored_label(WARN_ORANGE, msg);
            }
            Some(Notice::Success(msg)) => {
                ui.colored_label(OK_GREEN, "実行が完了しました！");
                ui.code(msg);
            }
            Some(Notice::Failure(msg)) => {
                ui.colored_label(ERROR_RED, "エラーが発生しました");
                ui.label(egui::RichText::new(msg).monospace());
            }
            None => {}
        }
    }

    fn draw_audio(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.audio_files.is_empty() {
            return;
        }
        Self::heading(ui, "出力されたMP3ファイル");
        ui.horizontal(|ui| {
            ui.label("保存先:");
            ui.text_edit_singleline(&mut self.export_dir);
        });

        let mut export = None;
        let mut toggle = None;
        for file in &self.audio_files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
            let playing = self.playback.as_ref().is_some_and(|p| p.path() == file);
            ui.horizontal(|ui| {
                ui.label(format!("{name}  ({size} bytes)"));
                if ui.small_button(if playing { "停止" } else { "再生" }).clicked() {
                    toggle = Some(file.clone());
                }
                if ui.small_button("パスをコピー").clicked() {
                    ctx.copy_text(file.display().to_string());
                }
                if ui.small_button("ダウンロード").clicked() {
                    export = Some(file.clone());
                }
            });
        }
        if let Some(file) = toggle {
            self.toggle_playback(&file);
        }
        if let Some(file) = export {
            self.export_file(&file);
        }
        if let Some(status) = &self.listing_status {
            ui.label(egui::RichText::new(status).size(11.0));
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for NarrationApp {
    /// Called every frame by eframe.  Polls the event channel, then renders
    /// the form.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.poll_playback();
        self.take_dropped_manuscript(ctx);
        self.refresh_audio_files();

        // Keep polling while a run is in flight.
        if self.pipeline_state.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if self.playback.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("本の原稿 → リライト → 音声化");
                ui.label(
                    egui::RichText::new("原稿をLLMでナレーション調にリライトし、TTSで音声化します")
                        .size(12.0),
                );
                ui.separator();
                self.draw_manuscript(ui);
                ui.separator();
                self.draw_style(ui);
                ui.separator();
                self.draw_voice(ui);
                ui.separator();
                self.draw_output(ui);
                ui.separator();
                self.draw_run(ui);
                ui.separator();
                self.draw_audio(ui, ctx);
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.playback = None;
        log::info!("Narration Studio closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RunReport;
    use tempfile::tempdir;

    fn make_app(
        root: &Path,
    ) -> (
        NarrationApp,
        mpsc::Receiver<PipelineConfig>,
        mpsc::Sender<PipelineEvent>,
    ) {
        let (command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(16);
        let mut config = AppConfig::default();
        config.workspace.root = root.to_path_buf();
        (NarrationApp::new(command_tx, event_rx, config), command_rx, event_tx)
    }

    #[test]
    fn invalid_form_sends_nothing() {
        let dir = tempdir().unwrap();
        let (mut app, mut command_rx, _event_tx) = make_app(dir.path());
        app.project_name = "my book!".into();

        app.start_run();

        assert!(matches!(app.notice, Some(Notice::Warning(_))));
        assert!(command_rx.try_recv().is_err());
        assert_eq!(app.pipeline_state, PipelineState::Idle);
        assert!(!dir.path().join("uploaded").exists());
    }

    #[test]
    fn valid_form_stages_manuscript_and_sends_config() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("chapter.txt");
        std::fs::write(&source, "これは原稿です。").unwrap();

        let (mut app, mut command_rx, _event_tx) = make_app(dir.path());
        app.manuscript_path = source.display().to_string();
        app.speaker_prompt = "穏やかに".into();
        app.project_name = "my-book_01".into();
        app.voice = Voice::Nova;

        app.start_run();

        let run = command_rx.try_recv().expect("config sent");
        assert_eq!(run.voice, "nova");
        assert_eq!(run.input_file, app.workspace.upload_path());
        assert_eq!(run.output_dir, app.workspace.projects_dir().join("my-book_01"));
        assert!(run.output_dir.is_dir());
        assert!(app.workspace.transfer_file().exists());
        assert!(app.pipeline_state.is_busy());
    }

    #[test]
    fn events_update_state_and_notice() {
        let dir = tempdir().unwrap();
        let (mut app, _command_rx, event_tx) = make_app(dir.path());

        event_tx
            .try_send(PipelineEvent::StateChanged(PipelineState::Rewriting))
            .unwrap();
        app.poll_events();
        assert_eq!(app.pipeline_state, PipelineState::Rewriting);

        event_tx
            .try_send(PipelineEvent::Completed(RunReport {
                base_name: "uploaded_text".into(),
                rewritten_path: PathBuf::from("rewritten_texts/uploaded_text_rewritten.txt"),
                audio_path: PathBuf::from("projects/x/uploaded_text.mp3"),
                audio_bytes: 3,
            }))
            .unwrap();
        app.poll_events();
        assert_eq!(app.pipeline_state, PipelineState::Done);
        assert!(matches!(app.notice, Some(Notice::Success(_))));

        event_tx
            .try_send(PipelineEvent::Failed {
                message: "speech synthesis failed".into(),
            })
            .unwrap();
        app.poll_events();
        assert_eq!(app.pipeline_state, PipelineState::Failed);
        assert!(matches!(app.notice, Some(Notice::Failure(ref m)) if m.contains("synthesis")));
    }

    #[test]
    fn audio_listing_follows_project() {
        let dir = tempdir().unwrap();
        let (mut app, _command_rx, _event_tx) = make_app(dir.path());
        let project = app.workspace.projects_dir().join("demo");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("uploaded_text.mp3"), b"ID3").unwrap();

        app.project_name = "demo".into();
        app.refresh_audio_files();
        assert_eq!(app.audio_files, vec![project.join("uploaded_text.mp3")]);

        app.project_name = "bad name".into();
        app.refresh_audio_files();
        assert!(app.audio_files.is_empty());
    }

    #[test]
    fn terminal_state_refreshes_listing() {
        let dir = tempdir().unwrap();
        let (mut app, _command_rx, event_tx) = make_app(dir.path());
        app.listed_dir = Some(dir.path().to_path_buf());

        event_tx
            .try_send(PipelineEvent::StateChanged(PipelineState::Failed))
            .unwrap();
        app.poll_events();

        assert!(app.listed_dir.is_none());
    }

    #[test]
    fn non_mp3_playback_reports_error() {
        let dir = tempdir().unwrap();
        let (mut app, _command_rx, _event_tx) = make_app(dir.path());
        let file = dir.path().join("broken.mp3");
        std::fs::write(&file, "not audio").unwrap();

        app.toggle_playback(&file);

        assert!(app.playback.is_none());
        assert!(app
            .listing_status
            .as_deref()
            .is_some_and(|s| s.contains("broken.mp3")));
    }

    #[test]
    fn non_text_manuscript_is_a_warning() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("chapter.pdf");
        std::fs::write(&source, "%PDF").unwrap();

        let (mut app, mut command_rx, _event_tx) = make_app(dir.path());
        app.manuscript_path = source.display().to_string();
        app.speaker_prompt = "穏やかに".into();
        app.project_name = "demo".into();

        app.start_run();

        assert!(matches!(app.notice, Some(Notice::Warning(ref m)) if m.contains(".txt")));
        assert!(command_rx.try_recv().is_err());
    }

    #[test]
    fn export_copies_into_target_dir() {
        let dir = tempdir().unwrap();
        let (mut app, _command_rx, _event_tx) = make_app(dir.path());
        let file = dir.path().join("take.mp3");
        std::fs::write(&file, b"ID3data").unwrap();

        app.export_dir = dir.path().join("downloads").display().to_string();
        app.export_file(&file);

        assert_eq!(
            std::fs::read(dir.path().join("downloads/take.mp3")).unwrap(),
            b"ID3data"
        );
    }
}
