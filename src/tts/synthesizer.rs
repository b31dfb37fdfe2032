//! `SpeechSynthesizer` trait and `ApiSynthesizer` implementation.
//!
//! `ApiSynthesizer` posts to an OpenAI-compatible `/v1/audio/speech`
//! endpoint and returns the response body untouched.  Writing the bytes to
//! disk is the caller's job ([`write_audio`]), so a failed request never
//! leaves a half-written file behind.

use std::path::Path;

use async_trait::async_trait;

use crate::config::SpeechConfig;
use crate::remote::{build_client, ensure_success, RemoteError};

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech backends.
///
/// `voice` is passed through as given; an unrecognised identifier is the
/// service's to reject.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, RemoteError>;
}

// ---------------------------------------------------------------------------
// ApiSynthesizer
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/audio/speech` endpoint.
pub struct ApiSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl ApiSynthesizer {
    /// Build an `ApiSynthesizer` from application config.
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self {
            client: build_client(config.timeout_secs),
            config: config.clone(),
        }
    }

    fn request_body(&self, text: &str, voice: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "voice": voice,
            "input": text,
            "response_format": self.config.response_format,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ApiSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, RemoteError> {
        let url = format!(
            "{}/v1/audio/speech",
            self.config.base_url.trim_end_matches('/')
        );

        log::debug!(
            "speech: POST {url} model={} voice={voice} chars={}",
            self.config.model,
            text.chars().count()
        );

        let mut req = self.client.post(&url).json(&self.request_body(text, voice));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let bytes = ensure_success(response).await?.bytes().await?;
        if bytes.is_empty() {
            return Err(RemoteError::EmptyResponse);
        }

        Ok(bytes.to_vec())
    }
}

/// Write synthesized audio to `path`, replacing any existing file.
pub fn write_audio(path: &Path, audio: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, audio)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
