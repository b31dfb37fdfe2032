//! Configuration module for Narration Studio.
//!
//! Provides `AppConfig` (persistent settings for the remote services and the
//! workspace), `AppPaths` for the platform settings directory, and
//! `PipelineConfig` — the per-run choices plus their `KEY=VALUE` transfer
//! file.

pub mod paths;
pub mod settings;
pub mod transfer;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, RewriteConfig, SpeechConfig, UiConfig, WorkspaceConfig, API_KEY_ENV,
};
pub use transfer::{PipelineConfig, TransferError};
