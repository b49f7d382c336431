//! Askdocs LLM - client for an OpenAI-compatible API.
//!
//! This crate provides:
//! - Batched embedding requests
//! - Chat completion requests with per-call temperature
//! - Structured error classification, so a context-overflow rejection
//!   is a distinct error variant rather than a message substring
//! - The [`Embedder`] and [`ChatModel`] seams the rest of the pipeline
//!   is written against

mod client;
mod error;
mod traits;
mod types;

pub use client::OpenAiClient;
pub use error::{LlmError, LlmResult};
pub use traits::{ChatModel, Embedder};
pub use types::*;
