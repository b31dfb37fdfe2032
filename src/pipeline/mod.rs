//! Pipeline orchestrator module.
//!
//! Wires the manuscript → rewrite → speech sequence and the working
//! directories it reads and writes.
//!
//! # Architecture
//!
//! ```text
//! form / narrate CLI
//!        │  PipelineConfig (in memory, or parsed from the transfer file)
//!        ▼
//! PipelineOrchestrator::run()
//!        ├─ Workspace: clear outputs, resolve paths, create dirs
//!        ├─ Rewriter::rewrite            → rewritten_texts/<base>_rewritten.txt
//!        └─ SpeechSynthesizer::synthesize → <output_dir>/<base>.mp3
//!        │
//!        ▼  PipelineEvent (mpsc) — state changes, Completed / Failed
//! ```

pub mod runner;
pub mod state;
pub mod workspace;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineError, PipelineOrchestrator};
pub use state::{PipelineEvent, PipelineState, RunReport};
pub use workspace::{clear_dir, list_audio, Workspace};
