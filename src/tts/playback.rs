//! Local playback of synthesized MP3 files.
//!
//! `rodio`'s output stream is not `Send`, so each clip gets its own thread
//! that opens the device, plays to the end (or until stopped) and exits.
//! The file is opened and decoded *before* the thread starts, so a missing
//! or corrupt file is reported to the caller straight away.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

/// How often the playback thread checks the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type Clip = Decoder<BufReader<File>>;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("audio output unavailable: {0}")]
    Device(String),
}

/// Open and decode `path` without touching the audio device.
pub fn open_clip(path: &Path) -> Result<Clip, PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// A clip playing on a background thread.  Dropping the handle stops it.
pub struct Playback {
    path: PathBuf,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), PlaybackError>>>,
}

impl Playback {
    /// Decode `path` and start playing it.
    pub fn start(path: PathBuf) -> Result<Self, PlaybackError> {
        let clip = open_clip(&path)?;
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("playback".into())
            .spawn(move || play_until_done(clip, &flag))
            .map_err(|e| PlaybackError::Device(e.to_string()))?;

        log::debug!("playing {}", path.display());
        Ok(Self {
            path,
            stop,
            handle: Some(handle),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the thread and return how playback ended.
    pub fn finish(mut self) -> Result<(), PlaybackError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle
            .join()
            .unwrap_or_else(|_| Err(PlaybackError::Device("thread panicked".into())))
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
    }
}

fn play_until_done(clip: Clip, stop: &AtomicBool) -> Result<(), PlaybackError> {
    let (_stream, stream_handle) =
        OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
    let sink = Sink::try_new(&stream_handle).map_err(|e| PlaybackError::Device(e.to_string()))?;

    sink.append(clip);
    while !sink.empty() {
        if stop.load(Ordering::Relaxed) {
            sink.stop();
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}
