//! Speech synthesis module.
//!
//! * [`SpeechSynthesizer`] — async trait: `(text, voice) -> audio bytes`.
//! * [`ApiSynthesizer`] — OpenAI-compatible `/v1/audio/speech` client.
//! * [`Voice`] — the closed set of narrator voices shown in the form.
//! * [`Playback`] — plays a finished MP3 on a background thread.

pub mod playback;
pub mod synthesizer;
pub mod voice;

pub use playback::{Playback, PlaybackError};
pub use synthesizer::{write_audio, ApiSynthesizer, SpeechSynthesizer};
pub use voice::{UnknownVoice, Voice};
