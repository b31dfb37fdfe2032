//! Prompt construction for the narration rewrite.
//!
//! The user message is a single composite string:
//!
//! ```text
//! {intro}
//!
//! {manuscript}
//!
//! {ending}
//! ```
//!
//! The system message comes from settings and frames the model as a
//! narration writer.

/// Builds the chat messages sent to the rewrite service.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
}

impl PromptBuilder {
    /// Create a builder that uses `system_prompt` as the system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// The composite user prompt: instruction, blank line, manuscript,
    /// blank line, tone instruction.
    pub fn build(&self, manuscript: &str, intro: &str, ending: &str) -> String {
        format!("{intro}\n\n{manuscript}\n\n{ending}")
    }

    /// `(system_msg, user_msg)` for an OpenAI-compatible chat endpoint.
    pub fn build_chat(&self, manuscript: &str, intro: &str, ending: &str) -> (String, String) {
        (
            self.system_prompt.clone(),
            self.build(manuscript, intro, ending),
        )
    }
}

/// Rewrite instruction built from the narration style chosen in the form.
///
/// ```
/// use narration_studio::llm::intro_for_style;
///
/// assert_eq!(
///     intro_for_style("ラジオDJ風"),
///     "以下の書籍原稿を、ラジオDJ風にリライトしてください。"
/// );
/// ```
pub fn intro_for_style(style: &str) -> String {
    format!("以下の書籍原稿を、{}にリライトしてください。", style.trim())
}
