//! OpenRouter client core for the flowgen integration.
//!
//! Everything here is plain request/response plumbing: the host automation
//! runtime invokes the [`catalog::ModelCatalog`] and
//! [`generate::GenerationService`] from flow cards and pairing steps, and the
//! device crate drives the status probes on a timer. No conversation state is
//! kept between calls.

pub mod catalog;
pub mod client;
pub mod error;
pub mod generate;
pub mod wire;

pub use catalog::{ModelCandidate, ModelCatalog};
pub use client::{ApiClient, ApiClientConfig, CreditsSummary, Model};
pub use error::LlmError;
pub use generate::{build_messages, CredentialSource, GenerationService};
pub use wire::{ChatMessage, Role};

use std::time::Duration;

/// Base URL all three endpoints hang off of.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Hard cap on generated output, attached to every completion request.
pub const MAX_OUTPUT_TOKENS: u32 = 500;

/// Maximum age of a cached model catalog before it is refetched.
pub const MODEL_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Model used when neither the flow card nor the device settings name one.
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1";

/// Curated identifiers ranked ahead of everything else in autocomplete,
/// in curation order. Also the offline fallback when the catalog cannot
/// be fetched. Never used to validate that a model exists.
pub const FEATURED_MODELS: &[&str] = &[
    "openai/gpt-4.1",
    "openai/gpt-4.1-mini",
    "openai/gpt-4o",
    "anthropic/claude-sonnet-4",
    "anthropic/claude-3.5-haiku",
    "google/gemini-2.5-flash",
    "meta-llama/llama-3.3-70b-instruct",
    "mistralai/mistral-small-3.2-24b-instruct",
    "deepseek/deepseek-chat-v3-0324",
];
