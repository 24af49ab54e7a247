//! Periodic connectivity and balance probes.
//!
//! Both probes are side-effect-only and never propagate errors: liveness
//! failures degrade to `online = false`, balance failures leave the last
//! published value untouched. An unreachable or unsupported balance endpoint
//! is not evidence the balance changed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use flowgen_llm::{ApiClient, CredentialSource};

use crate::runtime::StatusSink;

/// Default time between probe rounds.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct StatusMonitor {
    client: Arc<ApiClient>,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<dyn StatusSink>,
    period: Duration,
}

impl StatusMonitor {
    pub fn new(
        client: Arc<ApiClient>,
        credentials: Arc<dyn CredentialSource>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self::with_period(client, credentials, sink, PROBE_INTERVAL)
    }

    pub fn with_period(
        client: Arc<ApiClient>,
        credentials: Arc<dyn CredentialSource>,
        sink: Arc<dyn StatusSink>,
        period: Duration,
    ) -> Self {
        Self {
            client,
            credentials,
            sink,
            period,
        }
    }

    /// One probe round: liveness, then balance. Never returns an error.
    pub async fn probe_once(&self) {
        self.probe_liveness().await;
        self.probe_balance().await;
    }

    async fn probe_liveness(&self) {
        let api_key = self.credentials.api_key().unwrap_or_default();
        let online = match self.client.list_models(&api_key).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "liveness probe failed");
                false
            }
        };
        self.sink.set_online(online);
    }

    async fn probe_balance(&self) {
        let api_key = self.credentials.api_key().unwrap_or_default();
        match self.client.get_credits(&api_key).await {
            Ok(credits) => self.sink.set_credits(credits.remaining()),
            // Skip publishing and keep the last known value.
            Err(e) => tracing::debug!(error = %e, "balance probe skipped"),
        }
    }

    /// Run the probe loop on a background task. The first round fires
    /// immediately (the init probe), then once per period. The returned
    /// handle owns the task's lifecycle.
    pub fn spawn(self) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let wake = Arc::new(Notify::new());
        let wake_task = Arc::clone(&wake);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => self.probe_once().await,
                    _ = wake_task.notified() => self.probe_once().await,
                }
            }
        });

        MonitorHandle {
            stop_tx,
            wake,
            task,
        }
    }
}

/// Stop/poke handle for a spawned [`StatusMonitor`].
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Force an immediate probe round, e.g. after a credential change.
    pub fn poke(&self) {
        self.wake.notify_one();
    }

    /// Signal the loop to exit. Idempotent.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop the loop and wait for the task to finish.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
