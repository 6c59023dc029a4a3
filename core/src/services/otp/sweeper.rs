//! Background reclamation of dead OTP records
//!
//! The sweeper is pure housekeeping: every read path checks expiry and block
//! state against the current time on its own, so a late or skipped sweep only
//! delays freeing memory.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::clock::Clock;
use super::store::OtpStore;

/// Handle to the periodic sweep task; stopping it is tied to this value
pub struct OtpSweeper {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl OtpSweeper {
    /// Spawn the sweep loop on the current tokio runtime.
    ///
    /// The first sweep runs one `interval` after start.
    pub fn start(store: Arc<OtpStore>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!(
                interval_secs = interval.as_secs(),
                "OTP sweeper started"
            );

            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = store.sweep(clock.now());
                        if removed > 0 {
                            debug!(removed, remaining = store.len(), "Swept expired OTP records");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("OTP sweeper stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Stop the sweep loop and wait for it to finish
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Whether the sweep task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for OtpSweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
