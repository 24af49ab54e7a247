//! Two-step pairing handshake: validate the submitted credentials with a
//! lightweight liveness check, then enumerate exactly one logical device
//! carrying the validated settings forward.

use flowgen_llm::{ApiClient, LlmError};

use crate::runtime::DeviceSettings;

pub const DEVICE_ID: &str = "openrouter";
pub const DEVICE_NAME: &str = "OpenRouter";

/// The single device the listing step offers for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub id: String,
    pub name: String,
    pub settings: DeviceSettings,
}

/// Step one: check the submitted key against the models endpoint. The
/// classified error is surfaced to the pairing UI unchanged.
pub async fn validate_credentials(
    client: &ApiClient,
    settings: &DeviceSettings,
) -> Result<(), LlmError> {
    if settings.api_key.trim().is_empty() {
        return Err(LlmError::NoApiKey);
    }
    client.list_models(&settings.api_key).await.map(|_| ())
}

/// Step two: enumerate the one logical device to register.
pub fn device_listing(settings: &DeviceSettings) -> Vec<DeviceDescriptor> {
    vec![DeviceDescriptor {
        id: DEVICE_ID.to_string(),
        name: DEVICE_NAME.to_string(),
        settings: settings.clone(),
    }]
}
