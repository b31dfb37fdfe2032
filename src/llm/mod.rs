//! Manuscript rewrite module.
//!
//! This module provides:
//! * [`Rewriter`] — async trait implemented by all rewrite backends.
//! * [`ApiRewriter`] — OpenAI-compatible chat-completions client.
//! * [`PromptBuilder`] — builds the composite narration prompt.
//! * [`intro_for_style`] — turns a narration style into the rewrite instruction.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use narration_studio::config::AppConfig;
//! use narration_studio::llm::{intro_for_style, ApiRewriter, Rewriter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = AppConfig::default();
//!     config.apply_env_overrides();
//!
//!     let rewriter = ApiRewriter::from_config(&config.rewrite);
//!     let intro = intro_for_style("YouTuberの一人語り風ナレーション");
//!     let narration = rewriter
//!         .rewrite("これは原稿です。", &intro, "文末は優しく。")
//!         .await
//!         .unwrap();
//!     println!("{narration}");
//! }
//! ```

pub mod prompt;
pub mod rewriter;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use prompt::{intro_for_style, PromptBuilder};
pub use rewriter::{parse_chat_response, ApiRewriter, Rewriter};
