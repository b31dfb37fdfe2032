//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Per-run choices (style, voice, output folder) are *not* stored here; they
//! travel in a [`PipelineConfig`](super::PipelineConfig).

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::tts::Voice;

/// Environment variable that supplies the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ---------------------------------------------------------------------------
// RewriteConfig
// ---------------------------------------------------------------------------

/// Settings for the chat-completions service that rewrites the manuscript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Base URL of the API endpoint (`/v1/chat/completions` is appended).
    pub base_url: String,
    /// API key.  Overridden by `OPENAI_API_KEY` when that is set.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// System message that frames the model as a narration writer.
    pub system_prompt: String,
    /// Sampling temperature.  `None` leaves the service default in place.
    pub temperature: Option<f32>,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4".into(),
            system_prompt: "あなたはナレーションライターです。".into(),
            temperature: None,
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the text-to-speech service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of the API endpoint (`/v1/audio/speech` is appended).
    pub base_url: String,
    /// API key.  Overridden by `OPENAI_API_KEY` when that is set.
    pub api_key: Option<String>,
    /// TTS model identifier.
    pub model: String,
    /// Audio container requested from the service.
    pub response_format: String,
    /// Maximum seconds to wait for the audio body.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "tts-1".into(),
            response_format: "mp3".into(),
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceConfig
// ---------------------------------------------------------------------------

/// Where the working directories live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Root under which `rewritten_texts/`, `uploaded/` and the transfer
    /// file are created.
    pub root: PathBuf,
    /// Directory (relative to `root` unless absolute) holding one
    /// sub-directory per project.
    pub projects_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            projects_dir: PathBuf::from("projects"),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Initial values shown in the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Narration style pre-filled in the style box.
    pub default_style: String,
    /// Sentence-ending instruction pre-filled in the ending box.
    pub default_ending: String,
    /// Voice selected when the window opens.
    pub default_voice: Voice,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_style: "YouTuberの一人語り風ナレーション".into(),
            default_ending:
                "文末は「〜なんですよ」「〜なんです」など優しく語りかけるスタイルで。".into(),
            default_voice: Voice::Alloy,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use narration_studio::config::{AppConfig, AppPaths};
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Or create an editable settings.toml on first run
/// let config = AppConfig::load_or_init(&AppPaths::new()).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Manuscript rewrite service.
    pub rewrite: RewriteConfig,
    /// Speech synthesis service.
    pub speech: SpeechConfig,
    /// Working directory layout.
    pub workspace: WorkspaceConfig,
    /// Form defaults.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `paths.settings_file`, writing a default file there first when it
    /// does not exist.  A newly written file roots the workspace at
    /// `paths.workspace_dir`.
    ///
    /// The API key is never part of a freshly written file.
    pub fn load_or_init(paths: &AppPaths) -> Result<Self> {
        if paths.settings_file.exists() {
            return Self::load_from(&paths.settings_file);
        }
        let mut config = Self::default();
        config.workspace.root = paths.workspace_dir.clone();
        config.save_to(&paths.settings_file)?;
        log::info!("wrote default settings to {}", paths.settings_file.display());
        Ok(config)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `OPENAI_API_KEY` from the process environment, if present.
    pub fn apply_env_overrides(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    /// Set both service keys from `key` when it is a non-empty string.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        let Some(key) = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) else {
            return;
        };
        self.rewrite.api_key = Some(key.clone());
        self.speech.api_key = Some(key);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.rewrite.base_url, loaded.rewrite.base_url);
        assert_eq!(original.rewrite.model, loaded.rewrite.model);
        assert_eq!(original.rewrite.system_prompt, loaded.rewrite.system_prompt);
        assert_eq!(original.rewrite.temperature, loaded.rewrite.temperature);
        assert_eq!(original.speech.model, loaded.speech.model);
        assert_eq!(original.speech.response_format, loaded.speech.response_format);
        assert_eq!(original.workspace.root, loaded.workspace.root);
        assert_eq!(original.ui.default_voice, loaded.ui.default_voice);
        assert_eq!(original.ui.default_ending, loaded.ui.default_ending);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.rewrite.model, "gpt-4");
        assert_eq!(config.speech.model, "tts-1");
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.rewrite.base_url, "https://api.openai.com");
        assert_eq!(cfg.rewrite.system_prompt, "あなたはナレーションライターです。");
        assert!(cfg.rewrite.api_key.is_none());
        assert!(cfg.rewrite.temperature.is_none());
        assert_eq!(cfg.speech.response_format, "mp3");
        assert_eq!(cfg.workspace.projects_dir, PathBuf::from("projects"));
        assert_eq!(cfg.ui.default_style, "YouTuberの一人語り風ナレーション");
        assert_eq!(cfg.ui.default_voice, Voice::Alloy);
    }

    /// A partial file only overrides what it names.
    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[rewrite]\nmodel = \"gpt-4o\"\n").unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.rewrite.model, "gpt-4o");
        assert_eq!(cfg.rewrite.timeout_secs, 120);
        assert_eq!(cfg.speech.model, "tts-1");
    }

    fn paths_under(dir: &std::path::Path) -> AppPaths {
        AppPaths {
            config_dir: dir.join("config"),
            settings_file: dir.join("config/settings.toml"),
            workspace_dir: dir.join("studio"),
        }
    }

    #[test]
    fn first_run_writes_defaults_with_workspace() {
        let dir = tempdir().expect("temp dir");
        let paths = paths_under(dir.path());

        let cfg = AppConfig::load_or_init(&paths).expect("init");

        assert_eq!(cfg.workspace.root, dir.path().join("studio"));
        let written = std::fs::read_to_string(&paths.settings_file).expect("file written");
        assert!(written.contains("[workspace]"));
        assert!(!written.contains("api_key"));
    }

    #[test]
    fn existing_settings_are_not_overwritten() {
        let dir = tempdir().expect("temp dir");
        let paths = paths_under(dir.path());
        std::fs::create_dir_all(&paths.config_dir).unwrap();
        std::fs::write(&paths.settings_file, "[speech]\nmodel = \"tts-1-hd\"\n").unwrap();

        let cfg = AppConfig::load_or_init(&paths).expect("load");

        assert_eq!(cfg.speech.model, "tts-1-hd");
        assert_eq!(cfg.workspace.root, PathBuf::from("."));
        assert!(std::fs::read_to_string(&paths.settings_file)
            .unwrap()
            .contains("tts-1-hd"));
    }

    #[test]
    fn api_key_applies_to_both_services() {
        let mut cfg = AppConfig::default();
        cfg.apply_api_key(Some("sk-test".into()));
        assert_eq!(cfg.rewrite.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.speech.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.speech.api_key = Some("from-file".into());
        cfg.apply_api_key(Some("   ".into()));
        cfg.apply_api_key(None);
        assert!(cfg.rewrite.api_key.is_none());
        assert_eq!(cfg.speech.api_key.as_deref(), Some("from-file"));
    }
}
