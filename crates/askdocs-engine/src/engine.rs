//! The two-tier query engine.

use crate::error::{EngineError, EngineResult};
use crate::prompt::{build_prompt, FALLBACK_INSTRUCTION, PRIMARY_INSTRUCTION};
use askdocs_config::RetrievalConfig;
use askdocs_core::QueryOutcome;
use askdocs_index::VectorIndex;
use askdocs_llm::{ChatModel, Embedder, LlmError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Retrieval depth and sampling temperature for the two tiers.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub k_primary: usize,
    pub k_fallback: usize,
    pub t_primary: f32,
    pub t_fallback: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            k_primary: 5,
            k_fallback: 3,
            t_primary: 0.3,
            t_fallback: 0.0,
        }
    }
}

impl From<&RetrievalConfig> for EngineOptions {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            k_primary: config.k_primary,
            k_fallback: config.k_fallback,
            t_primary: config.t_primary,
            t_fallback: config.t_fallback,
        }
    }
}

/// Answers questions over a built index.
///
/// A question is embedded once, the top passages are retrieved, and
/// the chat model generates an answer grounded in them. When the model
/// rejects the prompt as too large, the engine retries exactly once
/// with fewer passages and temperature pinned to the fallback value.
/// Every other error propagates unchanged.
pub struct QueryEngine {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    options: EngineOptions,
}

impl QueryEngine {
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        options: EngineOptions,
    ) -> Self {
        Self {
            index,
            embedder,
            chat,
            options,
        }
    }

    /// Number of passages in the underlying index.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Answer one question.
    pub async fn answer(&self, question: &str) -> EngineResult<QueryOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(EngineError::EmptyQuestion);
        }

        let vectors = self.embedder.embed(&[question.to_string()]).await?;
        let query = vectors
            .into_iter()
            .next()
            .ok_or(EngineError::Llm(LlmError::EmptyResponse("embeddings")))?;

        let retrieved = self.index.search(&query, self.options.k_primary)?;
        debug!("Retrieved {} passages for primary attempt", retrieved.len());

        let prompt = build_prompt(question, &retrieved);
        match self
            .chat
            .generate(PRIMARY_INSTRUCTION, &prompt, self.options.t_primary)
            .await
        {
            Ok(answer) => Ok(QueryOutcome {
                answer,
                retrieved,
                temperature: self.options.t_primary,
                used_fallback: false,
            }),
            Err(LlmError::ContextTooLarge { message }) => {
                warn!(
                    "Prompt too large ({}); retrying with {} passages",
                    message, self.options.k_fallback
                );
                self.answer_fallback(question, retrieved).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The single fallback attempt. A second context rejection, like
    /// any other error, propagates to the caller.
    async fn answer_fallback(
        &self,
        question: &str,
        mut retrieved: askdocs_core::RetrievalResult,
    ) -> EngineResult<QueryOutcome> {
        retrieved.truncate(self.options.k_fallback);

        let prompt = build_prompt(question, &retrieved);
        let answer = self
            .chat
            .generate(FALLBACK_INSTRUCTION, &prompt, self.options.t_fallback)
            .await?;

        Ok(QueryOutcome {
            answer,
            retrieved,
            temperature: self.options.t_fallback,
            used_fallback: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdocs_core::Passage;
    use askdocs_llm::LlmResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, 1.0, 2.0])
                .collect())
        }

        fn identifier(&self) -> &str {
            "fake-embed"
        }
    }

    /// One recorded generation call.
    #[derive(Debug, Clone)]
    struct Call {
        system: String,
        temperature: f32,
        passage_count: usize,
    }

    /// Chat model that fails the first `failures` calls with the given
    /// error, then answers.
    struct ScriptedChat {
        failures: usize,
        error: fn() -> LlmError,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedChat {
        fn new(failures: usize, error: fn() -> LlmError) -> Self {
            Self {
                failures,
                error,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn always_ok() -> Self {
            Self::new(0, || unreachable!())
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn generate(
            &self,
            system: &str,
            prompt: &str,
            temperature: f32,
        ) -> LlmResult<String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                system: system.to_string(),
                temperature,
                passage_count: prompt.matches("---").count() + 1,
            });
            if calls.len() <= self.failures {
                return Err((self.error)());
            }
            Ok("the answer".to_string())
        }
    }

    fn overflow() -> LlmError {
        LlmError::ContextTooLarge {
            message: "too many tokens".to_string(),
        }
    }

    async fn engine_with(chat: Arc<ScriptedChat>) -> QueryEngine {
        let passages: Vec<Passage> = (0..8)
            .map(|i| Passage {
                text: format!("passage number {}", i),
                source_path: "doc.txt".to_string(),
                page_or_row: None,
                sequence_index: i,
            })
            .collect();
        let embedder = Arc::new(FakeEmbedder);
        let index = VectorIndex::build(passages, embedder.as_ref(), 8)
            .await
            .unwrap();
        QueryEngine::new(index, embedder, chat, EngineOptions::default())
    }

    #[tokio::test]
    async fn test_primary_answer() {
        let chat = Arc::new(ScriptedChat::always_ok());
        let engine = engine_with(Arc::clone(&chat)).await;

        let outcome = engine.answer("what is this about?").await.unwrap();
        assert_eq!(outcome.answer, "the answer");
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.temperature, 0.3);
        assert_eq!(outcome.retrieved.len(), 5);

        let calls = chat.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, PRIMARY_INSTRUCTION);
        assert_eq!(calls[0].passage_count, 5);
    }

    #[tokio::test]
    async fn test_fallback_on_context_overflow() {
        let chat = Arc::new(ScriptedChat::new(1, overflow));
        let engine = engine_with(Arc::clone(&chat)).await;

        let outcome = engine.answer("what is this about?").await.unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(outcome.temperature, 0.0);
        assert_eq!(outcome.retrieved.len(), 3);

        let calls = chat.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].temperature, 0.3);
        assert_eq!(calls[1].system, FALLBACK_INSTRUCTION);
        assert_eq!(calls[1].temperature, 0.0);
        assert_eq!(calls[1].passage_count, 3);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_trigger_fallback() {
        let chat = Arc::new(ScriptedChat::new(1, || LlmError::Auth {
            message: "bad key".to_string(),
        }));
        let engine = engine_with(Arc::clone(&chat)).await;

        let result = engine.answer("what is this about?").await;
        assert!(matches!(
            result,
            Err(EngineError::Llm(LlmError::Auth { .. }))
        ));
        assert_eq!(chat.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_overflow_propagates() {
        let chat = Arc::new(ScriptedChat::new(2, overflow));
        let engine = engine_with(Arc::clone(&chat)).await;

        let result = engine.answer("what is this about?").await;
        assert!(matches!(
            result,
            Err(EngineError::Llm(LlmError::ContextTooLarge { .. }))
        ));
        assert_eq!(chat.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let chat = Arc::new(ScriptedChat::always_ok());
        let engine = engine_with(chat).await;

        let result = engine.answer("   ").await;
        assert!(matches!(result, Err(EngineError::EmptyQuestion)));
    }
}
