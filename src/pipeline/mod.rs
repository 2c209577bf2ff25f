//! The chat pipeline
//!
//! Composes memory injection, filtered retrieval, system-first ordering,
//! the backend call, and structured-output parsing into one request flow.
//! The stages run as a fixed, explicitly ordered sequence; there is no
//! pluggable interceptor chain. Each invocation triggers at most one
//! retrieval query and one backend call, and never retries on its own.

use crate::chat::ChatModel;
use crate::errors::Result;
use crate::memory::ConversationMemory;
use crate::ordering;
use crate::parser::{OutputConverter, OutputSchema};
use crate::retrieval::SearchRequest;
use crate::store::{ScoredDocument, VectorStore};
use crate::types::Message;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// RAG chat pipeline producing typed results
pub struct ChatPipeline<T> {
    backend: Arc<dyn ChatModel>,
    store: Arc<dyn VectorStore>,
    memory: ConversationMemory,
    converter: OutputConverter<T>,
    system_prompt: String,
    search_request: SearchRequest,
}

impl<T: OutputSchema + DeserializeOwned> ChatPipeline<T> {
    pub fn new(
        backend: Arc<dyn ChatModel>,
        store: Arc<dyn VectorStore>,
        search_request: SearchRequest,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            store,
            memory: ConversationMemory::new(),
            converter: OutputConverter::new(),
            system_prompt: system_prompt.into(),
            search_request,
        }
    }

    /// Format instructions for the converter's target record, meant to be
    /// substituted into the user prompt template
    pub fn format_instructions(&self) -> &str {
        self.converter.format()
    }

    /// Conversation memory, exposed for inspection
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Run one turn: inject history, retrieve and append context, order
    /// messages system-first, call the backend, and parse the answer.
    /// The user turn is recorded before the call and the assistant turn
    /// right after it, so a parse failure still leaves both turns in the
    /// session.
    pub async fn run(&self, user_input: &str, session_id: &str) -> Result<T> {
        let history = self.memory.history_for(session_id);

        let request = self.search_request.with_query(user_input);
        let retrieved = self.store.search(&request).await?;
        debug!(
            session_id,
            retrieved = retrieved.len(),
            "Retrieved context documents"
        );

        // Memory replay lands ahead of the system instruction here, the
        // way the upstream composition layer emits it; normalize moves the
        // system message back to the front.
        let mut messages = history;
        messages.push(Message::system(&self.system_prompt));
        messages.push(Message::user(augment(user_input, &retrieved)));
        let messages = ordering::normalize(messages);

        debug!(
            session_id,
            model = self.backend.model(),
            message_count = messages.len(),
            "Sending chat request"
        );
        self.memory.append(session_id, Message::user(user_input));
        let response = self.backend.call(&messages).await?;
        debug!(
            session_id,
            response_chars = response.len(),
            "Received chat response"
        );
        self.memory.append(session_id, Message::assistant(response.clone()));

        self.converter.parse(&response)
    }
}

/// Append retrieved documents to the user turn as context
fn augment(user_input: &str, retrieved: &[ScoredDocument]) -> String {
    if retrieved.is_empty() {
        return user_input.to_string();
    }

    let context: Vec<&str> = retrieved
        .iter()
        .map(|scored| scored.document.content.as_str())
        .collect();

    format!(
        "{user_input}\n\nUse the following context to answer the question:\n{}",
        context.join("\n")
    )
}
