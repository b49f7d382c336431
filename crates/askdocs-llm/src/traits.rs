//! Seams between the retrieval pipeline and the external models.
//!
//! The vector index is written against [`Embedder`] and the query
//! engine against [`ChatModel`], so both can be exercised in tests
//! without a network.

use crate::error::LlmResult;
use async_trait::async_trait;

/// Maps texts to fixed-length vectors, one per input, order preserved.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    async fn embed(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>>;

    /// Name of the embedding function/model, used for snapshot
    /// compatibility checks. Vectors from different identifiers are
    /// never comparable.
    fn identifier(&self) -> &str;
}

/// Generates an answer from a system instruction and a user prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one generation. A prompt that exceeds the model's context
    /// window fails with `LlmError::ContextTooLarge`.
    async fn generate(&self, system: &str, prompt: &str, temperature: f32) -> LlmResult<String>;
}
