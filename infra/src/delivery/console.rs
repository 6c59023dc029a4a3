//! Console delivery channel for development
//!
//! Logs each message instead of sending it. Useful when no provider
//! credentials are available; codes show up in the server log.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use uuid::Uuid;

use og_core::services::DeliveryChannel;
use og_shared::phone::mask_phone_number;

/// Delivery channel that writes messages to the log
#[derive(Debug, Default)]
pub struct ConsoleDeliveryChannel {
    simulate_failure: AtomicBool,
}

impl ConsoleDeliveryChannel {
    /// Create a new console channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail, to exercise error paths
    pub fn set_simulate_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DeliveryChannel for ConsoleDeliveryChannel {
    async fn send(&self, phone: &str, text: &str) -> Result<String, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err("Simulated delivery failure".to_string());
        }

        let id = format!("console-{}", Uuid::new_v4());
        // The full text is logged on purpose: this channel never leaves the host.
        info!(
            delivery_id = %id,
            to = %mask_phone_number(phone),
            "[console delivery] {}",
            text
        );
        Ok(id)
    }

    fn provider_name(&self) -> &str {
        "console"
    }
}
