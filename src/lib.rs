//! Narration Studio — manuscript → narration rewrite → speech synthesis.
//!
//! The crate is split the same way the data flows:
//!
//! * [`config`]   — TOML settings, platform paths, and the `KEY=VALUE`
//!   run-configuration transfer file ([`config::PipelineConfig`]).
//! * [`llm`]      — the [`llm::Rewriter`] trait and the chat-completions client.
//! * [`tts`]      — the [`tts::SpeechSynthesizer`] trait, the speech client,
//!   the closed [`tts::Voice`] set and local MP3 playback.
//! * [`pipeline`] — the sequential orchestrator and its state machine.
//! * [`form`]     — input validation performed before a run is started.
//! * [`app`]      — the egui form window.

pub mod app;
pub mod config;
pub mod form;
pub mod llm;
pub mod pipeline;
pub mod remote;
pub mod tts;
