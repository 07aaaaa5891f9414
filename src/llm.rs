//! Model call interface
//!
//! Every prompt-chain step goes through the [`TextGenerator`] capability:
//! prompt string in, response text out. Calls are stateless, synchronous from
//! the caller's point of view, and never retried; the provider gives no
//! structured-output guarantee, so all structure is imposed by this crate's
//! own parsing.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// System message shared by every prompt-chain call. The chain depends on the
/// model emitting bare content with no conversational framing.
const CHAIN_SYSTEM_PROMPT: &str = "You are part of a prompt chain sequence. You should follow the instructions and generate the output as instructed. This is not a conversation. Your outputs should not include any introductory or explanatory text. Your outputs should be in plain text with a line break on the first line. Ensure that the output is strictly limited to the content requested.";

/// Opaque text generation capability. Injected into the pipelines so tests
/// can substitute [`ScriptedGenerator`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Create a client from config. The API key comes from the keyring (or
    /// the `OPENAI_API_KEY` environment variable); a missing key is fatal.
    pub fn from_config(config: &Config, model: &str) -> Result<Self> {
        let api_key = crate::credentials::get_api_key()?;
        Ok(Self::new(
            api_key,
            config.api.base_url.clone(),
            model.to_string(),
        ))
    }

    /// Same client pointed at a different model.
    pub fn with_model(&self, model: &str) -> Self {
        let mut client = self.clone();
        client.model = model.to_string();
        client
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat completion request and return the message content.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: CHAIN_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!("Sending chat completion request (model {})", self.model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to the model provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Model API error ({}): {}", status, body);
        }

        let body = response.text().await.context("Failed to read response body")?;

        // Parse as raw Value; providers disagree on optional fields.
        let parsed: serde_json::Value =
            serde_json::from_str(&body).context("Model API returned invalid JSON")?;
        let content = parsed
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .with_context(|| {
                format!(
                    "Model API response has no message content: {}",
                    &body[..body.len().min(500)]
                )
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }
}

/// Deterministic generator that replays canned responses in order. Used by
/// the pipeline tests; also handy for offline dry runs.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, T>(responses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        let mut responses = self.responses.lock().expect("script lock poisoned");
        match responses.pop_front() {
            Some(r) => Ok(r),
            None => bail!("ScriptedGenerator has no responses left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_generator_replays_in_order() {
        let gen = ScriptedGenerator::new(["one", "two"]);
        assert_eq!(gen.generate("a").await.unwrap(), "one");
        assert_eq!(gen.generate("b").await.unwrap(), "two");
        assert!(gen.generate("c").await.is_err());
    }

    #[test]
    fn test_with_model_keeps_credentials() {
        let client = OpenAiClient::new(
            "key".into(),
            DEFAULT_BASE_URL.into(),
            "gpt-4o".into(),
        );
        let other = client.with_model("gpt-4");
        assert_eq!(other.model(), "gpt-4");
        assert_eq!(client.model(), "gpt-4o");
    }
}
