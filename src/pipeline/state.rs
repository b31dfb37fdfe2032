//! Pipeline state machine and the events the orchestrator reports.
//!
//! [`PipelineState`] tracks where a single run is.  [`PipelineEvent`]s are
//! pushed over an mpsc channel so the form can follow a run without sharing
//! memory with the orchestrator.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of one orchestrator run.
///
/// ```text
/// Idle ──config ok──▶ ConfigLoaded ──manuscript read──▶ Rewriting
///      ──text saved──▶ Synthesizing ──audio saved──▶ Done
/// any state ──error──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// No run in progress.
    #[default]
    Idle,

    /// Configuration accepted, directories exist, input file found.
    ConfigLoaded,

    /// Waiting on the rewrite service.
    Rewriting,

    /// Rewritten text saved; waiting on the speech service.
    Synthesizing,

    /// Both artifacts written.
    Done,

    /// The run aborted.  Nothing is retried.
    Failed,
}

impl PipelineState {
    /// Returns `true` while a run is in flight.
    ///
    /// ```
    /// use narration_studio::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::ConfigLoaded.is_busy());
    /// assert!(PipelineState::Rewriting.is_busy());
    /// assert!(PipelineState::Synthesizing.is_busy());
    /// assert!(!PipelineState::Done.is_busy());
    /// assert!(!PipelineState::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::ConfigLoaded | PipelineState::Rewriting | PipelineState::Synthesizing
        )
    }

    /// `true` for `Done` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "待機中",
            PipelineState::ConfigLoaded => "設定を読み込みました",
            PipelineState::Rewriting => "リライト中...",
            PipelineState::Synthesizing => "音声合成中...",
            PipelineState::Done => "完了",
            PipelineState::Failed => "エラー",
        }
    }
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Stem shared by both artifacts.
    pub base_name: String,
    /// `rewritten_texts/<base>_rewritten.txt`.
    pub rewritten_path: PathBuf,
    /// `<output_dir>/<base>.mp3`.
    pub audio_path: PathBuf,
    /// Size of the audio file.
    pub audio_bytes: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "全ての処理が完了しました！")?;
        writeln!(f, "rewritten: {}", self.rewritten_path.display())?;
        write!(
            f,
            "audio:     {} ({} bytes)",
            self.audio_path.display(),
            self.audio_bytes
        )
    }
}

// ---------------------------------------------------------------------------
// PipelineEvent
// ---------------------------------------------------------------------------

/// Progress delivered from the orchestrator to whoever started the run.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Previous outputs were deleted; `removed` files in total.
    OutputsCleared { removed: usize },
    /// The run moved to a new state.
    StateChanged(PipelineState),
    /// The run finished successfully.
    Completed(RunReport),
    /// The run failed; `message` is the error's display text.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
