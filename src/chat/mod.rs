//! Chat backend boundary
//!
//! The pipeline talks to an LLM through [`ChatModel`]: an ordered sequence
//! of role-tagged messages in, one text completion out. Transport and auth
//! are each client's concern.

pub mod mistral;
pub mod ollama;

use crate::errors::Result;
use crate::types::Message;
use async_trait::async_trait;

pub use mistral::MistralChatClient;
pub use ollama::OllamaChatClient;

/// Boundary to an LLM chat backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the messages and return the completion text. Empty content is
    /// reported as [`crate::errors::PipelineError::EmptyResponse`].
    async fn call(&self, messages: &[Message]) -> Result<String>;

    /// Model identifier sent with each request
    fn model(&self) -> &str;
}

/// Boundary to an embedding backend, used by the Qdrant store
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
