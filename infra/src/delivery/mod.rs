//! Delivery Module
//!
//! Channels that carry OTP messages to users. Every channel implements the
//! core `DeliveryChannel` trait and fails closed.
//!
//! ## Features
//!
//! - **Twilio WhatsApp**: Production delivery via the Twilio Messages API
//! - **Console**: Logs messages instead of sending them, for development
//! - **Security**: Phone number masking in logs

use std::sync::Arc;

use og_core::services::DeliveryChannel;
use og_shared::config::{DeliveryConfig, DeliveryProvider};

use crate::InfrastructureError;

pub mod console;
pub mod twilio;

// Re-export commonly used types
pub use console::ConsoleDeliveryChannel;
pub use twilio::{TwilioConfig, TwilioWhatsAppChannel};

#[cfg(test)]
mod tests;

/// Create a delivery channel based on configuration
///
/// # Arguments
///
/// * `config` - Delivery configuration naming the provider and its credentials
///
/// # Errors
///
/// Returns `InfrastructureError::Config` when Twilio is selected but its
/// credentials are incomplete. There is no silent fallback to the console
/// channel, since that would report codes as sent that never leave the host.
pub fn create_delivery_channel(
    config: &DeliveryConfig,
) -> Result<Arc<dyn DeliveryChannel>, InfrastructureError> {
    match config.provider {
        DeliveryProvider::Console => {
            tracing::warn!("Using console delivery channel; OTP messages will only be logged");
            Ok(Arc::new(ConsoleDeliveryChannel::new()))
        }
        DeliveryProvider::Twilio => {
            let twilio_config = TwilioConfig::try_from(config)?;
            Ok(Arc::new(TwilioWhatsAppChannel::new(twilio_config)?))
        }
    }
}
