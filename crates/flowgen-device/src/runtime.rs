//! Capability seams between the core and the automation runtime.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use flowgen_llm::CredentialSource;

/// Where published status values land. The runtime implements this over its
/// capability store; tests implement it over a pair of mutexes.
pub trait StatusSink: Send + Sync {
    fn set_online(&self, online: bool);
    fn set_credits(&self, credits: f64);
}

/// The per-device settings the runtime persists for us. The core never
/// stores these; it reads them through [`CredentialSource`] on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub api_key: String,
    pub default_model: String,
}

/// Shared, updatable view of the device settings. `update` swaps the whole
/// struct so a reader never sees a half-applied credential change.
#[derive(Clone, Default)]
pub struct SharedSettings(Arc<RwLock<DeviceSettings>>);

impl SharedSettings {
    pub fn new(settings: DeviceSettings) -> Self {
        Self(Arc::new(RwLock::new(settings)))
    }

    /// Replace the settings wholesale, e.g. from the runtime's
    /// settings-changed hook. Callers should poke the status monitor
    /// afterwards so the new credentials are probed immediately.
    pub fn update(&self, settings: DeviceSettings) {
        if let Ok(mut guard) = self.0.write() {
            *guard = settings;
        }
    }

    pub fn snapshot(&self) -> DeviceSettings {
        self.0.read().map(|g| g.clone()).unwrap_or_default()
    }
}

impl CredentialSource for SharedSettings {
    fn api_key(&self) -> Option<String> {
        let current = self.snapshot();
        if current.api_key.trim().is_empty() {
            None
        } else {
            Some(current.api_key)
        }
    }

    fn default_model(&self) -> Option<String> {
        let current = self.snapshot();
        if current.default_model.trim().is_empty() {
            None
        } else {
            Some(current.default_model)
        }
    }
}
