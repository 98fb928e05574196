//! Transcript source provider trait.

use crate::types::transcript::Transcript;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for services that record meetings and deliver transcripts.
///
/// Implementations fetch a finished transcript by the provider's own meeting
/// id, typically after the provider announced completion via webhook. The
/// trait enables provider swapping (Fireflies, Otter, a local recorder)
/// without touching ingestion code.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fetch the complete transcript for an externally-assigned meeting id.
    ///
    /// Returns [`Error::NotFound`] when the provider has no such meeting and
    /// a transient error kind on connectivity problems, letting the caller
    /// retry a webhook-announced transcript that is not yet queryable.
    async fn fetch_transcript(&self, external_id: &str) -> Result<Transcript, Error>;

    /// Return unique identifier for this provider (e.g. "fireflies").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Source {}

        #[async_trait]
        impl Provider for Source {
            async fn fetch_transcript(&self, external_id: &str) -> Result<Transcript, Error>;
            fn provider_id(&self) -> &str;
        }
    }

    #[tokio::test]
    async fn provider_is_mockable_as_trait_object() {
        let mut source = MockSource::new();
        source
            .expect_fetch_transcript()
            .with(eq("ff-123"))
            .returning(|id| {
                Ok(Transcript {
                    external_id: id.to_string(),
                    title: "Weekly sync".to_string(),
                    date: None,
                    sentences: vec![],
                })
            });

        let source: Box<dyn Provider> = Box::new(source);
        let transcript = source.fetch_transcript("ff-123").await.unwrap();
        assert_eq!(transcript.title, "Weekly sync");
    }
}
