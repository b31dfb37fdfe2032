//! Error type shared by the two remote API clients (rewrite + speech).
//!
//! Both clients talk to OpenAI-compatible REST endpoints through `reqwest`,
//! so transport failures, HTTP status failures and malformed bodies look the
//! same on either side.  The pipeline wraps a [`RemoteError`] in the variant
//! that names the failing stage.

use thiserror::Error;

// ---------------------------------------------------------------------------
// RemoteError
// ---------------------------------------------------------------------------

/// Errors that can occur while calling a remote rewrite or speech service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The service returned a response with no usable content.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else {
            RemoteError::Request(e.to_string())
        }
    }
}

/// Turn a non-success response into [`RemoteError::Status`], keeping the
/// body text so the operator sees the service's own explanation.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

/// Build a `reqwest::Client` with a per-request timeout.
///
/// Falls back to a default (no-timeout) client if the builder fails.
pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
