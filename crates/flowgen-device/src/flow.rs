//! Flow-card handlers: typed arguments in, structured return (or a surfaced
//! error) out. Errors are never swallowed here — the flow engine shows them
//! to the end user.

use serde::{Deserialize, Serialize};

use flowgen_llm::{CredentialSource, GenerationService, LlmError, ModelCandidate, ModelCatalog};

/// Arguments of the "generate text" action card.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTextArgs {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Structured return the flow engine expects from the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowResponse {
    pub response: String,
}

pub async fn run_generate_text(
    service: &GenerationService,
    args: &GenerateTextArgs,
) -> Result<FlowResponse, LlmError> {
    let response = service
        .generate_text(
            &args.prompt,
            args.model.as_deref(),
            args.system_prompt.as_deref(),
        )
        .await?;
    Ok(FlowResponse { response })
}

/// Autocomplete handler for the action card's model argument.
pub async fn autocomplete_models(
    catalog: &ModelCatalog,
    credentials: &dyn CredentialSource,
    query: &str,
) -> Vec<ModelCandidate> {
    let api_key = credentials.api_key().unwrap_or_default();
    catalog.search(&api_key, query).await
}
