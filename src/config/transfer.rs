//! Run configuration and its flat `KEY=VALUE` transfer file.
//!
//! A [`PipelineConfig`] holds the user's choices for exactly one run.  The
//! form hands it to the orchestrator in memory; the `narrate` binary reads it
//! from a transfer file so the pipeline can also be driven as a child
//! process.
//!
//! # File format
//!
//! ```text
//! INTRO=<string>
//! ENDING=<string>
//! SPEAKER_PROMPT=<string>
//! VOICE=<voice id, any case>
//! OUTPUT_DIR=<path>
//! INPUT_FILE=<path>
//! CLEAR_OUTPUTS=1
//! ```
//!
//! Each line is trimmed and split on the first `=`.  Lines without `=` are
//! skipped.  Values are written verbatim, so an embedded newline splits a
//! value across lines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const KEY_INTRO: &str = "INTRO";
pub const KEY_ENDING: &str = "ENDING";
pub const KEY_SPEAKER_PROMPT: &str = "SPEAKER_PROMPT";
pub const KEY_VOICE: &str = "VOICE";
pub const KEY_OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const KEY_INPUT_FILE: &str = "INPUT_FILE";
pub const KEY_CLEAR_OUTPUTS: &str = "CLEAR_OUTPUTS";

/// Voice used when the file has no `VOICE` line.
pub const DEFAULT_VOICE: &str = "nova";

// ---------------------------------------------------------------------------
// TransferError
// ---------------------------------------------------------------------------

/// Errors raised while reading or writing a transfer file.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The file could not be read or written.
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A key the pipeline cannot run without is absent or blank.
    #[error("config is missing required key {0}")]
    MissingKey(&'static str),
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Everything one orchestrator run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Instruction placed before the manuscript.
    pub intro: String,
    /// Tone / sentence-ending instruction placed after the manuscript.
    pub ending: String,
    /// Free-form speaking-style notes collected by the form.
    pub speaker_prompt: String,
    /// Voice identifier, lower-cased.  Not validated here; unknown voices
    /// are rejected by the speech service.
    pub voice: String,
    /// Directory receiving `<base>.mp3`.
    pub output_dir: PathBuf,
    /// Manuscript to rewrite.
    pub input_file: PathBuf,
    /// Delete previous outputs before the run starts.
    pub clear_outputs: bool,
}

impl PipelineConfig {
    /// Parse transfer-file text.
    ///
    /// `OUTPUT_DIR` and `INPUT_FILE` are required.  The instruction keys
    /// default to empty strings and `VOICE` defaults to [`DEFAULT_VOICE`].
    /// Only the exact value `1` enables `CLEAR_OUTPUTS`.
    pub fn parse(text: &str) -> Result<Self, TransferError> {
        let mut map: HashMap<&str, &str> = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                map.insert(key, value);
            }
        }

        let get = |key: &str| map.get(key).copied().unwrap_or("").to_string();
        let required = |key: &'static str| {
            map.get(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| PathBuf::from(*v))
                .ok_or(TransferError::MissingKey(key))
        };

        Ok(Self {
            intro: get(KEY_INTRO),
            ending: get(KEY_ENDING),
            speaker_prompt: get(KEY_SPEAKER_PROMPT),
            voice: map
                .get(KEY_VOICE)
                .copied()
                .unwrap_or(DEFAULT_VOICE)
                .to_lowercase(),
            output_dir: required(KEY_OUTPUT_DIR)?,
            input_file: required(KEY_INPUT_FILE)?,
            clear_outputs: map.get(KEY_CLEAR_OUTPUTS).copied() == Some("1"),
        })
    }

    /// Render as transfer-file text (one `KEY=VALUE` per line).
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut line = |key: &str, value: &str| {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        };
        line(KEY_INTRO, &self.intro);
        line(KEY_ENDING, &self.ending);
        line(KEY_SPEAKER_PROMPT, &self.speaker_prompt);
        line(KEY_VOICE, &self.voice);
        line(KEY_OUTPUT_DIR, &self.output_dir.to_string_lossy());
        line(KEY_INPUT_FILE, &self.input_file.to_string_lossy());
        if self.clear_outputs {
            line(KEY_CLEAR_OUTPUTS, "1");
        }
        out
    }

    /// Read and parse a transfer file.
    pub fn load_from(path: &Path) -> Result<Self, TransferError> {
        let text = std::fs::read_to_string(path).map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Write the transfer file, replacing any previous one.
    pub fn save_to(&self, path: &Path) -> Result<(), TransferError> {
        std::fs::write(path, self.render()).map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Base name shared by both artifacts: the input file's stem.
    pub fn base_name(&self) -> String {
        self.input_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "manuscript".to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
INTRO=以下の書籍原稿を、〜風にリライトしてください。
ENDING=文末は優しく。
SPEAKER_PROMPT=ゆっくり話す
VOICE=Nova
OUTPUT_DIR=projects/my-book
INPUT_FILE=uploaded/uploaded_text.txt
CLEAR_OUTPUTS=1
";

    #[test]
    fn parses_all_keys() {
        let cfg = PipelineConfig::parse(SAMPLE).unwrap();
        assert_eq!(cfg.intro, "以下の書籍原稿を、〜風にリライトしてください。");
        assert_eq!(cfg.ending, "文末は優しく。");
        assert_eq!(cfg.speaker_prompt, "ゆっくり話す");
        assert_eq!(cfg.voice, "nova");
        assert_eq!(cfg.output_dir, PathBuf::from("projects/my-book"));
        assert_eq!(cfg.input_file, PathBuf::from("uploaded/uploaded_text.txt"));
        assert!(cfg.clear_outputs);
    }

    #[test]
    fn splits_on_first_equals_only() {
        let text = "INTRO=a=b=c\nOUTPUT_DIR=out\nINPUT_FILE=in.txt\n";
        let cfg = PipelineConfig::parse(text).unwrap();
        assert_eq!(cfg.intro, "a=b=c");
    }

    #[test]
    fn optional_keys_take_defaults() {
        let cfg = PipelineConfig::parse("OUTPUT_DIR=out\nINPUT_FILE=in.txt").unwrap();
        assert_eq!(cfg.intro, "");
        assert_eq!(cfg.ending, "");
        assert_eq!(cfg.speaker_prompt, "");
        assert_eq!(cfg.voice, DEFAULT_VOICE);
        assert!(!cfg.clear_outputs);
    }

    #[test]
    fn clear_outputs_requires_exact_one() {
        let cfg =
            PipelineConfig::parse("OUTPUT_DIR=o\nINPUT_FILE=i\nCLEAR_OUTPUTS=true").unwrap();
        assert!(!cfg.clear_outputs);
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let err = PipelineConfig::parse("OUTPUT_DIR=out\n").unwrap_err();
        assert!(matches!(err, TransferError::MissingKey(KEY_INPUT_FILE)));
    }

    #[test]
    fn blank_output_dir_is_an_error() {
        let err = PipelineConfig::parse("OUTPUT_DIR=\nINPUT_FILE=in.txt\n").unwrap_err();
        assert!(matches!(err, TransferError::MissingKey(KEY_OUTPUT_DIR)));
    }

    #[test]
    fn lines_without_equals_are_skipped() {
        let text = "garbage line\n\nOUTPUT_DIR=out\nINPUT_FILE=in.txt\n";
        assert!(PipelineConfig::parse(text).is_ok());
    }

    #[test]
    fn render_omits_clear_outputs_when_false() {
        let mut cfg = PipelineConfig::parse(SAMPLE).unwrap();
        cfg.clear_outputs = false;
        let text = cfg.render();
        assert!(!text.contains(KEY_CLEAR_OUTPUTS));
        assert!(text.starts_with("INTRO="));
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".pipeline_config.txt");
        let cfg = PipelineConfig::parse(SAMPLE).unwrap();

        cfg.save_to(&path).unwrap();
        assert_eq!(PipelineConfig::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = PipelineConfig::load_from(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
    }

    #[test]
    fn base_name_is_input_stem() {
        let cfg = PipelineConfig::parse(SAMPLE).unwrap();
        assert_eq!(cfg.base_name(), "uploaded_text");
    }
}
