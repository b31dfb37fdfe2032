//! Pipeline orchestrator — drives one manuscript → narration → audio run.
//!
//! # Pipeline flow
//!
//! ```text
//! PipelineConfig
//!   └─▶ [clear_outputs] empty rewritten_texts/, ocr_texts/, output dir
//!         └─▶ check input file, create dirs          [ConfigLoaded]
//!               └─▶ read manuscript, rewriter.rewrite   [Rewriting]
//!                     └─▶ save <base>_rewritten.txt, synthesizer.synthesize [Synthesizing]
//!                           └─▶ save <base>.mp3              [Done]
//! any error ─▶ [Failed]
//! ```
//!
//! Every step runs strictly after the previous one.  There are no retries:
//! the first error ends the run and its display text is the diagnostic.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::PipelineConfig;
use crate::llm::Rewriter;
use crate::remote::RemoteError;
use crate::tts::{write_audio, SpeechSynthesizer};

use super::state::{PipelineEvent, PipelineState, RunReport};
use super::workspace::{clear_dir, Workspace};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured manuscript does not exist.
    #[error("input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The manuscript contains only whitespace.
    #[error("input file is empty: {}", .0.display())]
    EmptyManuscript(PathBuf),

    /// A local file or directory operation failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rewrite service call failed.
    #[error("rewrite failed: {0}")]
    Rewrite(#[source] RemoteError),

    /// The speech service call failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[source] RemoteError),
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError {
    let path = path.to_path_buf();
    move |source| PipelineError::Io {
        action,
        path,
        source,
    }
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Runs the rewrite → synthesis pipeline for one config at a time.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use narration_studio::config::{AppConfig, PipelineConfig};
/// use narration_studio::llm::ApiRewriter;
/// use narration_studio::pipeline::{PipelineOrchestrator, Workspace};
/// use narration_studio::tts::ApiSynthesizer;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let workspace = Workspace::from_config(&config.workspace);
/// let run = PipelineConfig::load_from(&workspace.transfer_file()).unwrap();
///
/// let mut orchestrator = PipelineOrchestrator::new(
///     workspace,
///     Arc::new(ApiRewriter::from_config(&config.rewrite)),
///     Arc::new(ApiSynthesizer::from_config(&config.speech)),
/// );
/// let report = orchestrator.run(&run).await.unwrap();
/// println!("{report}");
/// # }
/// ```
pub struct PipelineOrchestrator {
    workspace: Workspace,
    rewriter: Arc<dyn Rewriter>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    state: PipelineState,
    events: Option<mpsc::Sender<PipelineEvent>>,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator.
    ///
    /// * `workspace`   — where working files live and relative paths resolve.
    /// * `rewriter`    — manuscript rewrite backend.
    /// * `synthesizer` — speech backend.
    pub fn new(
        workspace: Workspace,
        rewriter: Arc<dyn Rewriter>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            workspace,
            rewriter,
            synthesizer,
            state: PipelineState::Idle,
            events: None,
        }
    }

    /// Report progress on `tx` during every subsequent run.
    pub fn with_events(mut self, tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    // -----------------------------------------------------------------------
    // Command loop
    // -----------------------------------------------------------------------

    /// Run each config received on `commands`, one after another, until the
    /// channel closes.  Outcomes are reported through the event channel.
    pub async fn serve(mut self, mut commands: mpsc::Receiver<PipelineConfig>) {
        while let Some(config) = commands.recv().await {
            if let Err(e) = self.run(&config).await {
                log::debug!("pipeline: run for {} failed: {e}", config.input_file.display());
            }
        }
        log::info!("pipeline: command channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // Single run
    // -----------------------------------------------------------------------

    /// Execute one run.  Ends in `Done` on success and `Failed` otherwise.
    pub async fn run(&mut self, config: &PipelineConfig) -> Result<RunReport, PipelineError> {
        self.state = PipelineState::Idle;
        log::info!(
            "pipeline: starting run for {} (voice={})",
            config.input_file.display(),
            config.voice
        );

        match self.execute(config).await {
            Ok(report) => {
                self.transition(PipelineState::Done).await;
                log::info!("pipeline: done — {}", report.audio_path.display());
                self.emit(PipelineEvent::Completed(report.clone())).await;
                Ok(report)
            }
            Err(e) => {
                self.transition(PipelineState::Failed).await;
                log::error!("pipeline error: {e}");
                self.emit(PipelineEvent::Failed {
                    message: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    async fn execute(&mut self, config: &PipelineConfig) -> Result<RunReport, PipelineError> {
        let input_file = self.workspace.resolve(&config.input_file);
        let output_dir = self.workspace.resolve(&config.output_dir);

        // ── 0. Optional clean slate ──────────────────────────────────────
        if config.clear_outputs {
            let removed = self.clear_outputs(&output_dir)?;
            log::info!("pipeline: cleared {removed} previous output file(s)");
            self.emit(PipelineEvent::OutputsCleared { removed }).await;
        }

        // ── 1. Directories + input check ─────────────────────────────────
        let rewritten_dir = self.workspace.rewritten_dir();
        std::fs::create_dir_all(&rewritten_dir)
            .map_err(io_error("cannot create directory", &rewritten_dir))?;
        std::fs::create_dir_all(&output_dir)
            .map_err(io_error("cannot create directory", &output_dir))?;

        if !input_file.is_file() {
            return Err(PipelineError::InputNotFound(input_file));
        }
        self.transition(PipelineState::ConfigLoaded).await;

        // ── 2. Rewrite ───────────────────────────────────────────────────
        let manuscript = std::fs::read_to_string(&input_file)
            .map_err(io_error("cannot read", &input_file))?;
        if manuscript.trim().is_empty() {
            return Err(PipelineError::EmptyManuscript(input_file));
        }

        self.transition(PipelineState::Rewriting).await;
        let rewritten = self
            .rewriter
            .rewrite(&manuscript, &config.intro, &config.ending)
            .await
            .map_err(PipelineError::Rewrite)?;

        let base_name = config.base_name();
        let rewritten_path = self.workspace.rewritten_path(&base_name);
        std::fs::write(&rewritten_path, &rewritten)
            .map_err(io_error("cannot write", &rewritten_path))?;
        log::debug!("pipeline: rewritten text saved to {}", rewritten_path.display());

        // ── 3. Synthesize ────────────────────────────────────────────────
        self.transition(PipelineState::Synthesizing).await;
        let audio = self
            .synthesizer
            .synthesize(&rewritten, &config.voice)
            .await
            .map_err(PipelineError::Synthesis)?;

        let audio_path = output_dir.join(format!("{base_name}.mp3"));
        write_audio(&audio_path, &audio).map_err(io_error("cannot write", &audio_path))?;

        Ok(RunReport {
            base_name,
            rewritten_path,
            audio_path,
            audio_bytes: audio.len(),
        })
    }

    /// Empty the fixed working directories and `output_dir`.
    fn clear_outputs(&self, output_dir: &Path) -> Result<usize, PipelineError> {
        let mut removed = 0;
        for dir in self
            .workspace
            .working_dirs()
            .into_iter()
            .chain(std::iter::once(output_dir.to_path_buf()))
        {
            removed += clear_dir(&dir).map_err(io_error("cannot clear", &dir))?;
        }
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn transition(&mut self, state: PipelineState) {
        log::debug!("pipeline: {:?} → {:?}", self.state, state);
        self.state = state;
        self.emit(PipelineEvent::StateChanged(state)).await;
    }

    async fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
