use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents errors that can occur during LLM interactions.
///
/// The client and the generation service always propagate these to the
/// invoking flow action; the catalog and the status monitor degrade instead
/// (fallback list, `online = false`, skipped publish). Nothing here is ever
/// retried internally.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum LlmError {
    /// No API key is configured on the device. Checked before any network
    /// call is attempted.
    #[error("No API key configured. Enter one in the device settings.")]
    NoApiKey,

    /// The request failed due to invalid or rejected credentials.
    #[error("Authentication failed. Please check your API key.")]
    Authentication,

    /// The request was rejected due to rate limiting.
    #[error("Rate limit exceeded. Please wait and try again.")]
    RateLimited,

    /// The API provider returned a 5xx status code.
    #[error("The provider returned a server error (status {0}).")]
    Server(u16),

    /// Error related to network connectivity or the HTTP request itself.
    #[error("Network request failed: {0}")]
    Network(String),

    /// A success response whose payload lacks the expected shape.
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// An application-level error embedded in an otherwise successful
    /// response body (`{"error": {"message": ...}}`), or a non-success
    /// status outside the classified ones.
    #[error("API error: {0}")]
    Api(String),

    /// The completion succeeded but contained no extractable message content.
    #[error("The model returned an empty response.")]
    EmptyResponse,

    /// An optional endpoint the account does not support. Soft failure:
    /// callers treat it as "no data", not as something to surface.
    #[error("Endpoint not available for this account.")]
    Unavailable,
}
