//! Working-directory layout shared by the form and the orchestrator.
//!
//! ```text
//! <root>/
//!   .pipeline_config.txt         last run's transfer file
//!   uploaded/uploaded_text.txt   staged manuscript
//!   rewritten_texts/             <base>_rewritten.txt
//!   ocr_texts/                   cleared together with rewritten_texts
//!   projects/<name>/             <base>.mp3
//! ```
//!
//! Relative paths in a [`PipelineConfig`](crate::config::PipelineConfig)
//! are resolved against the root.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::WorkspaceConfig;

pub const REWRITTEN_DIR: &str = "rewritten_texts";
pub const OCR_DIR: &str = "ocr_texts";
pub const UPLOAD_DIR: &str = "uploaded";
pub const UPLOAD_FILE: &str = "uploaded_text.txt";
pub const TRANSFER_FILE: &str = ".pipeline_config.txt";

/// Resolved workspace paths.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    projects_dir: PathBuf,
}

impl Workspace {
    /// Workspace at `root` with projects under `root/projects`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let projects_dir = root.join("projects");
        Self { root, projects_dir }
    }

    pub fn from_config(config: &WorkspaceConfig) -> Self {
        let root = config.root.clone();
        let projects_dir = root.join(&config.projects_dir);
        Self { root, projects_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    pub fn rewritten_dir(&self) -> PathBuf {
        self.root.join(REWRITTEN_DIR)
    }

    /// Directories emptied when a run asks to clear outputs (besides the
    /// run's own output directory).
    pub fn working_dirs(&self) -> [PathBuf; 2] {
        [self.rewritten_dir(), self.root.join(OCR_DIR)]
    }

    /// Where the form stages the chosen manuscript.
    pub fn upload_path(&self) -> PathBuf {
        self.root.join(UPLOAD_DIR).join(UPLOAD_FILE)
    }

    pub fn transfer_file(&self) -> PathBuf {
        self.root.join(TRANSFER_FILE)
    }

    /// `rewritten_texts/<base>_rewritten.txt`
    pub fn rewritten_path(&self, base_name: &str) -> PathBuf {
        self.rewritten_dir().join(format!("{base_name}_rewritten.txt"))
    }

    /// Absolute paths pass through; relative ones are joined to the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Copy `source` into `uploaded/uploaded_text.txt`, replacing the
    /// previous upload.
    pub fn stage_manuscript(&self, source: &Path) -> io::Result<PathBuf> {
        let dest = self.upload_path();
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, &dest)?;
        Ok(dest)
    }
}

/// Delete every regular file directly inside `dir`.
///
/// Sub-directories are left alone.  A missing `dir` counts as already
/// empty.  Returns how many files were removed.
pub fn clear_dir(dir: &Path) -> io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// `.mp3` files directly inside `dir`, sorted by name.  A missing `dir`
/// yields an empty list.
pub fn list_audio(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "mp3") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
