//! Core `Rewriter` trait and `ApiRewriter` implementation.
//!
//! `ApiRewriter` calls any OpenAI-compatible `/v1/chat/completions` endpoint.
//! All connection details come from [`RewriteConfig`]; nothing is hardcoded.

use async_trait::async_trait;

use crate::config::RewriteConfig;
use crate::llm::prompt::PromptBuilder;
use crate::remote::{build_client, ensure_success, RemoteError};

// ---------------------------------------------------------------------------
// Rewriter trait
// ---------------------------------------------------------------------------

/// Async trait for turning a manuscript into narration text.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Rewriter>`).
///
/// # Arguments
/// * `manuscript` – Original text, non-empty.
/// * `intro`      – Style instruction placed before the manuscript.
/// * `ending`     – Tone / sentence-ending instruction placed after it.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(
        &self,
        manuscript: &str,
        intro: &str,
        ending: &str,
    ) -> Result<String, RemoteError>;
}

// ---------------------------------------------------------------------------
// ApiRewriter
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiRewriter {
    client: reqwest::Client,
    config: RewriteConfig,
    prompt_builder: PromptBuilder,
}

impl ApiRewriter {
    /// Build an `ApiRewriter` from application config.
    pub fn from_config(config: &RewriteConfig) -> Self {
        Self {
            client: build_client(config.timeout_secs),
            config: config.clone(),
            prompt_builder: PromptBuilder::new(config.system_prompt.clone()),
        }
    }

    fn request_body(&self, manuscript: &str, intro: &str, ending: &str) -> serde_json::Value {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(manuscript, intro, ending);

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ]
        });
        if let Some(t) = self.config.temperature {
            body["temperature"] = serde_json::json!(t);
        }
        body
    }
}

#[async_trait]
impl Rewriter for ApiRewriter {
    /// Send the composite prompt and return the model's reply, trimmed.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn rewrite(
        &self,
        manuscript: &str,
        intro: &str,
        ending: &str,
    ) -> Result<String, RemoteError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = self.request_body(manuscript, intro, ending);

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        log::debug!(
            "rewrite: POST {url} model={} chars={}",
            self.config.model,
            manuscript.chars().count()
        );

        let response = ensure_success(req.send().await?).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        parse_chat_response(&json)
    }
}

/// Extract `choices[0].message.content`, trimmed.
///
/// Missing or blank content is [`RemoteError::EmptyResponse`].
pub fn parse_chat_response(json: &serde_json::Value) -> Result<String, RemoteError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(RemoteError::EmptyResponse)?
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(RemoteError::EmptyResponse);
    }

    Ok(content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
