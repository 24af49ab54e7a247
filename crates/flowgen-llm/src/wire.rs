//! Request/response shapes for the three OpenRouter endpoints.
//!
//! Response structs are deliberately permissive (`#[serde(default)]`,
//! `Option` everywhere): providers omit fields freely, and a missing field
//! should surface as a classified error at the call site, not as a serde
//! failure with no context.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in the role-tagged sequence sent to the completion endpoint.
/// Requests built by this crate carry at most two: an optional system
/// message followed by exactly one user message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: &'a [ChatMessage],
    pub(crate) max_tokens: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub(crate) choices: Vec<Choice>,
    #[serde(default)]
    pub(crate) error: Option<ErrorBody>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct Choice {
    #[serde(default)]
    pub(crate) message: Option<ResponseMessage>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ResponseMessage {
    // May be null even on success (some providers send role-only messages).
    #[serde(default)]
    pub(crate) content: Option<String>,
}

/// Provider-embedded error, sometimes delivered inside a 200 OK body.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ModelsResponse {
    // Absence of the list field is a format error, not an empty catalog.
    #[serde(default)]
    pub(crate) data: Option<Vec<ModelRecord>>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ModelRecord {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CreditsResponse {
    #[serde(default)]
    pub(crate) data: Option<CreditsData>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub(crate) struct CreditsData {
    pub(crate) total_credits: f64,
    pub(crate) total_usage: f64,
}
