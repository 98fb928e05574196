//! Embedding provider trait.

use crate::Error;
use async_trait::async_trait;

/// Abstraction for text embedding services.
///
/// Implementations map a text span to a fixed-dimension vector. The
/// dimension is a corpus-wide constant: every stored vector and every query
/// vector must agree with [`Provider::dimension`], and the indexing layer
/// treats a mismatch as a fatal error for the affected chunk.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Embed a single text span.
    ///
    /// The returned vector's length must equal [`Provider::dimension`].
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Error>;

    /// The fixed output dimension of this provider's vectors.
    fn dimension(&self) -> usize;

    /// Return unique identifier for this provider (e.g. "openai").
    fn provider_id(&self) -> &str;
}
