//! Language model provider trait.

use crate::Error;
use async_trait::async_trait;

/// Abstraction for chat-completion language models.
///
/// Implementations take a system instruction and a user message and return
/// the model's text output. Structured output is the caller's concern: the
/// pipeline prompts for JSON and degrades gracefully when the model returns
/// prose, so this trait stays a plain text-in/text-out seam.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Run a single completion and return the model's text.
    ///
    /// Transient failures (network, rate limits) surface with
    /// [`Error::is_transient`] true so the caller can retry with backoff;
    /// [`Error::Provider`] means the request itself was rejected and must not
    /// be retried unchanged.
    async fn complete(&self, system: &str, user: &str) -> Result<String, Error>;

    /// Return unique identifier for this provider (e.g. "anthropic").
    fn provider_id(&self) -> &str;
}
