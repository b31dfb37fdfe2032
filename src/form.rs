//! Checks performed on the form before a run is started.
//!
//! A form that fails validation never reaches the orchestrator: the problem
//! is shown as a warning and nothing is written to disk.

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::llm::intro_for_style;
use crate::tts::Voice;

/// Project names: word characters and hyphens only.
static RE_PROJECT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-]+$").unwrap());

// ---------------------------------------------------------------------------
// FormError
// ---------------------------------------------------------------------------

/// A required form field left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Manuscript,
    OutputDir,
    SpeakerPrompt,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MissingField::Manuscript => "テキストファイルを選択してください。",
            MissingField::OutputDir => "出力フォルダが未設定です。",
            MissingField::SpeakerPrompt => "音声スタイル指示文が入力されていません。",
        };
        f.write_str(msg)
    }
}

/// Reasons a form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0}")]
    MissingInput(MissingField),

    #[error("「{0}」: 半角英数字とハイフン以外の文字は使えません。")]
    InvalidName(String),

    #[error("{}: .txt ファイルを選択してください。", .0.display())]
    NotText(PathBuf),
}

/// `true` when `path` has a `.txt` extension (any case).
pub fn is_text_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// `true` when `name` (after trimming) is non-empty and made only of word
/// characters and hyphens.
///
/// ```
/// use narration_studio::form::is_valid_project_name;
///
/// assert!(is_valid_project_name("my-book_01"));
/// assert!(!is_valid_project_name("my book!"));
/// ```
pub fn is_valid_project_name(name: &str) -> bool {
    RE_PROJECT_NAME.is_match(name.trim())
}

/// Resolve a project name to its output directory under `projects_dir`.
///
/// An empty name yields `Ok(None)` (no project chosen yet); an invalid name
/// yields [`FormError::InvalidName`].
pub fn project_dir(projects_dir: &Path, name: &str) -> Result<Option<PathBuf>, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if !is_valid_project_name(name) {
        return Err(FormError::InvalidName(name.to_string()));
    }
    Ok(Some(projects_dir.join(name)))
}

// ---------------------------------------------------------------------------
// FormInput
// ---------------------------------------------------------------------------

/// Raw values collected by the form.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    /// Manuscript chosen by the user (`None` or empty = nothing chosen).
    pub manuscript: Option<PathBuf>,
    /// Narration style, e.g. `YouTuberの一人語り風ナレーション`.
    pub style: String,
    /// Sentence-ending / tone instruction.
    pub ending: String,
    /// Selected narrator voice.
    pub voice: Voice,
    /// Speaking-style notes.
    pub speaker_prompt: String,
    /// Project (output folder) name.
    pub project_name: String,
    /// Delete previous outputs before running.
    pub clear_outputs: bool,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub manuscript: PathBuf,
    pub output_dir: PathBuf,
    pub intro: String,
    pub ending: String,
    pub speaker_prompt: String,
    pub voice: Voice,
    pub clear_outputs: bool,
}

impl ValidatedForm {
    /// The run configuration for a manuscript staged at `input_file`.
    pub fn to_pipeline_config(&self, input_file: PathBuf) -> PipelineConfig {
        PipelineConfig {
            intro: self.intro.clone(),
            ending: self.ending.clone(),
            speaker_prompt: self.speaker_prompt.clone(),
            voice: self.voice.id().to_string(),
            output_dir: self.output_dir.clone(),
            input_file,
            clear_outputs: self.clear_outputs,
        }
    }
}

/// Validate `input` in the order the form reports problems: invalid project
/// name, missing or non-`.txt` manuscript, missing output folder, missing
/// speaker prompt.
pub fn validate(input: &FormInput, projects_dir: &Path) -> Result<ValidatedForm, FormError> {
    let output_dir = project_dir(projects_dir, &input.project_name)?;

    let manuscript = input
        .manuscript
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(FormError::MissingInput(MissingField::Manuscript))?;
    if !is_text_file(&manuscript) {
        return Err(FormError::NotText(manuscript));
    }

    let output_dir = output_dir.ok_or(FormError::MissingInput(MissingField::OutputDir))?;

    if input.speaker_prompt.trim().is_empty() {
        return Err(FormError::MissingInput(MissingField::SpeakerPrompt));
    }

    Ok(ValidatedForm {
        manuscript,
        output_dir,
        intro: intro_for_style(&input.style),
        ending: input.ending.clone(),
        speaker_prompt: input.speaker_prompt.clone(),
        voice: input.voice,
        clear_outputs: input.clear_outputs,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
