//! Outbound message channel used to deliver codes

use async_trait::async_trait;

/// Sends a text message to a phone number
///
/// Implementations must fail closed: an `Ok` means the provider accepted the
/// message, and any doubt is reported as `Err`.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Send `text` to `phone`, returning the provider's message identifier
    async fn send(&self, phone: &str, text: &str) -> Result<String, String>;

    /// Provider name for logs (e.g., "twilio-whatsapp", "console")
    fn provider_name(&self) -> &str;
}
