//! Thin HTTP client for the three OpenRouter endpoints.
//!
//! Every operation is a single attempt: no retries, no backoff. The caller
//! (flow engine or status monitor) decides whether to try again on a future
//! trigger.

use std::time::Duration;

use url::Url;

use crate::error::LlmError;
use crate::wire::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CreditsResponse, ModelsResponse,
};
use crate::{MAX_OUTPUT_TOKENS, OPENROUTER_BASE_URL};

pub const HTTP_REFERER: &str = "https://github.com/flowgen/flowgen";
pub const HTTP_TITLE: &str = "Flowgen";

/// One entry of the remote model catalog. `id` is the `{vendor}/{name}`
/// identifier the completion endpoint expects; `name` is the human-readable
/// display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub id: String,
    pub name: String,
}

/// Lifetime totals reported by the credits endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditsSummary {
    pub total_credits: f64,
    pub total_usage: f64,
}

impl CreditsSummary {
    pub fn remaining(&self) -> f64 {
        self.total_credits - self.total_usage
    }
}

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: Url,
    pub referer: &'static str,
    pub title: &'static str,
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(OPENROUTER_BASE_URL).expect("static base url"),
            referer: HTTP_REFERER,
            title: HTTP_TITLE,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiClientConfig {
    /// Point the client at a different base URL (tests use a local mock).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    cfg: ApiClientConfig,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(ApiClientConfig::default())
    }
}

impl ApiClient {
    pub fn new(cfg: ApiClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.cfg.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn get(&self, path: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.endpoint(path))
            .bearer_auth(api_key.trim())
            .header("Accept", "application/json")
            .header("HTTP-Referer", self.cfg.referer)
            .header("X-Title", self.cfg.title)
            .timeout(self.cfg.timeout)
    }

    /// Fetch the full model catalog, in the order the API returns it.
    pub async fn list_models(&self, api_key: &str) -> Result<Vec<Model>, LlmError> {
        let resp = self
            .get("models", api_key)
            .send()
            .await
            .map_err(net_err)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(net_err)?;
        if !(200..300).contains(&status) {
            return Err(classify_status(status, &body));
        }

        let parsed: ModelsResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::UnexpectedFormat(format!("models response: {e}")))?;
        let records = parsed.data.ok_or_else(|| {
            LlmError::UnexpectedFormat("models response is missing the `data` list".to_string())
        })?;

        Ok(records
            .into_iter()
            .map(|r| Model {
                name: r.name.unwrap_or_else(|| r.id.clone()),
                id: r.id,
            })
            .collect())
    }

    /// Fetch lifetime credit totals. The endpoint is optional: any
    /// non-success status is reported as [`LlmError::Unavailable`] rather
    /// than a hard error, so callers can skip publishing and move on.
    pub async fn get_credits(&self, api_key: &str) -> Result<CreditsSummary, LlmError> {
        let resp = self
            .get("credits", api_key)
            .send()
            .await
            .map_err(net_err)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(net_err)?;
        if !(200..300).contains(&status) {
            return Err(LlmError::Unavailable);
        }

        let parsed: CreditsResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::UnexpectedFormat(format!("credits response: {e}")))?;
        let data = parsed.data.ok_or_else(|| {
            LlmError::UnexpectedFormat("credits response is missing the `data` object".to_string())
        })?;

        Ok(CreditsSummary {
            total_credits: data.total_credits,
            total_usage: data.total_usage,
        })
    }

    /// Post a chat completion and extract the assistant text (untrimmed).
    ///
    /// An empty key fails with [`LlmError::NoApiKey`] before any network
    /// activity. A provider error embedded in a 200 OK body surfaces as
    /// [`LlmError::Api`], never as success.
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::NoApiKey);
        }

        let req = ChatCompletionRequest {
            model,
            messages,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let resp = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(api_key.trim())
            .header("Accept", "application/json")
            .header("HTTP-Referer", self.cfg.referer)
            .header("X-Title", self.cfg.title)
            .timeout(self.cfg.timeout)
            .json(&req)
            .send()
            .await
            .map_err(net_err)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(net_err)?;
        if !(200..300).contains(&status) {
            return Err(classify_status(status, &body));
        }

        parse_generation(&body)
    }
}

/// Parse a (non-streaming) completion body into the assistant text.
///
/// Providers sometimes return `{ "error": ... }` in a 200 OK body; that is
/// detected before the choices are inspected. We take the first choice that
/// carries non-empty message content.
pub(crate) fn parse_generation(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        LlmError::UnexpectedFormat(format!(
            "completion response: {e} — body excerpt: {}",
            excerpt(body, 2_000)
        ))
    })?;

    if let Some(err) = parsed.error {
        let message = err
            .message
            .unwrap_or_else(|| "Unknown provider error".to_string());
        return Err(LlmError::Api(message));
    }

    parsed
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.and_then(|m| m.content))
        .find(|content| !content.is_empty())
        .ok_or(LlmError::EmptyResponse)
}

fn net_err(e: reqwest::Error) -> LlmError {
    LlmError::Network(e.to_string())
}

fn classify_status(status: u16, body: &str) -> LlmError {
    match status {
        401 | 403 => LlmError::Authentication,
        429 => LlmError::RateLimited,
        500..=599 => LlmError::Server(status),
        _ => LlmError::Api(embedded_message(body).unwrap_or_else(|| {
            format!("status {status}: {}", excerpt(body, 300))
        })),
    }
}

/// Pull `error.message` out of an error body when the provider sent one.
fn embedded_message(body: &str) -> Option<String> {
    serde_json::from_str::<ChatCompletionResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|e| e.message)
}

/// Bound response bodies quoted in error strings. Char-based so multibyte
/// content cannot split a code point.
fn excerpt(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…<snip>")
    }
}
