//! Builds the chat-style message sequence for a flow action and extracts the
//! answer text. Each call is a fresh exchange of at most two messages; no
//! conversation history is kept anywhere.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::LlmError;
use crate::wire::ChatMessage;
use crate::DEFAULT_MODEL;

/// Where the current credentials live. The runtime owns the settings storage;
/// the core only reads through this seam and never persists anything itself.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
    fn default_model(&self) -> Option<String>;
}

pub struct GenerationService {
    client: Arc<ApiClient>,
    credentials: Arc<dyn CredentialSource>,
}

impl GenerationService {
    pub fn new(client: Arc<ApiClient>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Run one prompt through the configured model and return the trimmed
    /// answer.
    ///
    /// Model resolution: explicit argument, else the device's configured
    /// default, else [`DEFAULT_MODEL`]. Fails with [`LlmError::NoApiKey`]
    /// before any request is constructed when no key is configured. Every
    /// failure from the client propagates unchanged — no masking, no retry.
    pub async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let api_key = self
            .credentials
            .api_key()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::NoApiKey)?;

        let configured = self.credentials.default_model();
        let model = resolve_model(model, configured.as_deref());

        let messages = build_messages(prompt, system_prompt);
        let text = self.client.generate(&api_key, model, &messages).await?;
        Ok(text.trim().to_string())
    }
}

fn resolve_model<'a>(explicit: Option<&'a str>, configured: Option<&'a str>) -> &'a str {
    explicit
        .filter(|m| !m.trim().is_empty())
        .or_else(|| configured.filter(|m| !m.trim().is_empty()))
        .unwrap_or(DEFAULT_MODEL)
}

/// Optional system message first, then exactly one user message. An empty or
/// missing system prompt yields a single-message sequence.
pub fn build_messages(prompt: &str, system_prompt: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt.filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}
