//! Mistral AI chat client
//!
//! Talks to the hosted Mistral API (POST /v1/chat/completions). The API
//! key comes from the `MISTRAL_AI_API_KEY` environment variable; a missing
//! key is a configuration error, not a backend error.

use crate::chat::ChatModel;
use crate::errors::{PipelineError, Result};
use crate::types::Message;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Mistral API endpoint
pub const DEFAULT_MISTRAL_URL: &str = "https://api.mistral.ai";

/// Default model
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-small-latest";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "MISTRAL_AI_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Mistral AI HTTP client
#[derive(Debug, Clone)]
pub struct MistralChatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl MistralChatClient {
    /// Build a client reading the API key from the environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Config(format!("{API_KEY_ENV} must be set"))
            })?;

        Self::with_config(DEFAULT_MISTRAL_URL, DEFAULT_MISTRAL_MODEL, &api_key)
    }

    pub fn with_config(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for MistralChatClient {
    async fn call(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Backend(format!("Failed to reach Mistral: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Backend(format!("HTTP {status}: {body}")));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Backend(format!("Malformed Mistral response: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(PipelineError::EmptyResponse);
        }

        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config() {
        let client =
            MistralChatClient::with_config(DEFAULT_MISTRAL_URL, "mistral-small-latest", "key")
                .unwrap();
        assert_eq!(client.model(), "mistral-small-latest");
    }

    #[test]
    fn test_completion_response_shape() {
        let payload = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "Leo XIV" } }
            ]
        }"#;
        let response: CompletionResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.choices[0].message.content, "Leo XIV");
    }
}
