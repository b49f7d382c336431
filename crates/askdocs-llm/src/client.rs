//! OpenAI-compatible HTTP client.

use crate::error::{LlmError, LlmResult};
use crate::traits::{ChatModel, Embedder};
use crate::types::*;
use askdocs_config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Client for an OpenAI-compatible API (embeddings + chat completions).
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client from configuration.
    ///
    /// The API key is read from the environment variable named in the
    /// config, never stored in the config file itself.
    pub fn from_config(config: &OpenAiConfig) -> LlmResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(config.api_key_env.clone()))?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            timeout,
        })
    }

    /// The configured chat model name.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// The configured embedding model name.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Verify the API key by listing models.
    pub async fn check_auth(&self) -> LlmResult<()> {
        let url = format!("{}/models", self.api_base);
        debug!("Checking API credentials against {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_api_error(status, &body))
    }

    /// Embed a batch of texts in a single request.
    pub async fn embed_batch(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.api_base);
        debug!(
            "Embedding {} texts with model {}",
            texts.len(),
            self.embedding_model
        );

        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        let embedding_response: EmbeddingResponse = response.json().await?;
        if embedding_response.data.is_empty() {
            return Err(LlmError::EmptyResponse("embeddings"));
        }

        // The API may return entries out of order; the index field is
        // authoritative.
        let mut data = embedding_response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    /// Run one chat completion.
    pub async fn chat(&self, request: ChatRequest) -> LlmResult<String> {
        let url = format!("{}/chat/completions", self.api_base);
        debug!(
            "Chat completion with model {} at temperature {}",
            request.model, request.temperature
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        let chat_response: ChatResponse = response.json().await?;
        let answer = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse("choices"))?;

        info!("Received completion ({} chars)", answer.len());
        Ok(answer)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() {
            LlmError::Unreachable {
                base: self.api_base.clone(),
            }
        } else if e.is_timeout() {
            LlmError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            LlmError::Http(e)
        }
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        self.embed_batch(texts).await
    }

    fn identifier(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn generate(&self, system: &str, prompt: &str, temperature: f32) -> LlmResult<String> {
        let request =
            ChatRequest::new(&self.chat_model, system, prompt).with_temperature(temperature);
        self.chat(request).await
    }
}

/// Map a non-2xx API response to a structured error.
///
/// Context-overflow is detected here, at the boundary, from the error
/// body's code/type fields (with the known message signatures as a
/// secondary check). Everything above this function matches on enum
/// variants only.
fn classify_api_error(status: StatusCode, body: &str) -> LlmError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or(ApiErrorDetail {
            message: body.to_string(),
            error_type: String::new(),
            code: None,
        });

    if is_context_overflow(&detail) {
        return LlmError::ContextTooLarge {
            message: detail.message,
        };
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth {
            message: detail.message,
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            message: detail.message,
        },
        _ => LlmError::Api {
            status: status.as_u16(),
            message: detail.message,
        },
    }
}

fn is_context_overflow(detail: &ApiErrorDetail) -> bool {
    if let Some(code) = detail.code.as_deref() {
        if code == "context_length_exceeded" || code == "max_tokens_per_request" {
            return true;
        }
    }

    detail.message.contains("maximum context length")
        || detail.message.contains("max_tokens_per_request")
}
