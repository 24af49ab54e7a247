//! Host-runtime integration for the flowgen OpenRouter core.
//!
//! The automation runtime owns settings storage, timers, and capability
//! values; this crate adapts those to the core's seams: [`runtime::StatusSink`]
//! for publishing `online`/`credits` values, [`runtime::SharedSettings`] as
//! the [`flowgen_llm::CredentialSource`], the periodic [`monitor::StatusMonitor`],
//! the two-step [`pairing`] handshake, and the [`flow`] action handlers.

pub mod flow;
pub mod monitor;
pub mod pairing;
pub mod runtime;

pub use flow::{autocomplete_models, run_generate_text, FlowResponse, GenerateTextArgs};
pub use monitor::{MonitorHandle, StatusMonitor, PROBE_INTERVAL};
pub use pairing::{device_listing, validate_credentials, DeviceDescriptor};
pub use runtime::{DeviceSettings, SharedSettings, StatusSink};
