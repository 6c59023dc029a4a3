//! Outbound message delivery configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Which delivery channel carries OTP messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryProvider {
    /// Twilio WhatsApp messages
    Twilio,
    /// Log messages instead of sending them
    Console,
}

impl std::str::FromStr for DeliveryProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twilio" | "whatsapp" => Ok(DeliveryProvider::Twilio),
            "console" | "mock" => Ok(DeliveryProvider::Console),
            other => Err(format!("Unknown delivery provider: {}", other)),
        }
    }
}

/// Delivery channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Selected provider
    pub provider: DeliveryProvider,

    /// Twilio account SID
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Twilio auth token
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sender, including the `whatsapp:` prefix (e.g. `whatsapp:+14155238886`)
    #[serde(default)]
    pub from: Option<String>,

    /// Base URL of the Twilio REST API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// HTTP timeout for a single send in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            provider: DeliveryProvider::Console,
            account_sid: None,
            auth_token: None,
            from: None,
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DeliveryConfig {
    /// Create from environment variables.
    ///
    /// When `DELIVERY_PROVIDER` is unset, Twilio is selected if credentials are
    /// present, otherwise the console channel.
    pub fn from_env() -> Self {
        let account_sid = non_empty_var("TWILIO_ACCOUNT_SID");
        let auth_token = non_empty_var("TWILIO_AUTH_TOKEN");
        let from = non_empty_var("TWILIO_WHATSAPP_FROM");

        let provider = env::var("DELIVERY_PROVIDER")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(if account_sid.is_some() && auth_token.is_some() {
                DeliveryProvider::Twilio
            } else {
                DeliveryProvider::Console
            });

        Self {
            provider,
            account_sid,
            auth_token,
            from,
            api_base: env::var("TWILIO_API_BASE").unwrap_or_else(|_| default_api_base()),
            request_timeout_secs: env::var("TWILIO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_secs),
        }
    }

    /// Whether every Twilio credential is present
    pub fn has_twilio_credentials(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.from.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_api_base() -> String {
    String::from("https://api.twilio.com")
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Twilio".parse::<DeliveryProvider>(), Ok(DeliveryProvider::Twilio));
        assert_eq!("mock".parse::<DeliveryProvider>(), Ok(DeliveryProvider::Console));
        assert!("pigeon".parse::<DeliveryProvider>().is_err());
    }

    #[test]
    fn test_provider_inferred_from_credentials() {
        temp_env::with_vars(
            [
                ("DELIVERY_PROVIDER", None),
                ("TWILIO_ACCOUNT_SID", Some("AC123")),
                ("TWILIO_AUTH_TOKEN", Some("secret")),
                ("TWILIO_WHATSAPP_FROM", Some("whatsapp:+14155238886")),
            ],
            || {
                let config = DeliveryConfig::from_env();
                assert_eq!(config.provider, DeliveryProvider::Twilio);
                assert!(config.has_twilio_credentials());
            },
        );
    }

    #[test]
    fn test_console_without_credentials() {
        temp_env::with_vars(
            [
                ("DELIVERY_PROVIDER", None::<&str>),
                ("TWILIO_ACCOUNT_SID", None),
                ("TWILIO_AUTH_TOKEN", None),
            ],
            || assert_eq!(DeliveryConfig::from_env().provider, DeliveryProvider::Console),
        );
    }
}
