//! Cross-platform application paths using the `dirs` crate.
//!
//! Settings live in the platform config directory:
//!
//!   Windows: %APPDATA%\narration-studio\settings.toml
//!   macOS:   ~/Library/Application Support/narration-studio/settings.toml
//!   Linux:   ~/.config/narration-studio/settings.toml
//!
//! The default workspace (manuscripts, rewritten text, projects) for a fresh
//! install is `narration-studio/` under the user's documents folder, or the
//! home directory where there is none.

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Workspace root written into a first-run `settings.toml`.
    pub workspace_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "narration-studio";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");

        let workspace_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            config_dir,
            settings_file,
            workspace_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
