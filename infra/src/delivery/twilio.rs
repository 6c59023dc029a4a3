//! Twilio WhatsApp Delivery Implementation
//!
//! Sends OTP messages through the Twilio Messages API on the WhatsApp
//! channel. A send is a single form-encoded POST; there are no retries here,
//! since the OTP service treats any failure as final and the caller decides
//! whether to request a new code.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use og_core::services::DeliveryChannel;
use og_shared::config::DeliveryConfig;
use og_shared::phone::{is_valid_international_phone, mask_phone_number};

use crate::InfrastructureError;

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Twilio WhatsApp configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886`
    pub from: String,
    /// Base URL of the REST API
    pub api_base: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl TryFrom<&DeliveryConfig> for TwilioConfig {
    type Error = InfrastructureError;

    fn try_from(config: &DeliveryConfig) -> Result<Self, Self::Error> {
        let account_sid = config
            .account_sid
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = config
            .auth_token
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from = config
            .from
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_WHATSAPP_FROM not set".to_string()))?;

        Ok(Self {
            account_sid,
            auth_token,
            from: whatsapp_address(&from),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

/// Successful Messages API response; only the fields we use
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

/// Error body returned by the Twilio API
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Delivery channel backed by Twilio WhatsApp messages
pub struct TwilioWhatsAppChannel {
    client: Client,
    config: TwilioConfig,
}

impl TwilioWhatsAppChannel {
    /// Create a new Twilio WhatsApp channel
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        info!(
            "Twilio WhatsApp channel initialized with sender: {}",
            mask_phone_number(config.from.trim_start_matches(WHATSAPP_PREFIX))
        );

        Ok(Self { client, config })
    }

    /// Messages endpoint for the configured account
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base, self.config.account_sid
        )
    }

    async fn post_message(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let params = [("To", to), ("From", self.config.from.as_str()), ("Body", body)];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<TwilioErrorBody>(&text)
                .ok()
                .and_then(|e| match (e.code, e.message) {
                    (Some(code), Some(message)) => Some(format!("{} (code {})", message, code)),
                    (None, Some(message)) => Some(message),
                    _ => None,
                })
                .unwrap_or(text);
            return Err(InfrastructureError::Delivery(format!(
                "Twilio returned {}: {}",
                status, detail
            )));
        }

        let message: MessageResponse = response.json().await?;
        debug!(sid = %message.sid, status = ?message.status, "Twilio accepted message");
        Ok(message.sid)
    }
}

#[async_trait]
impl DeliveryChannel for TwilioWhatsAppChannel {
    async fn send(&self, phone: &str, text: &str) -> Result<String, String> {
        let bare = phone.strip_prefix("whatsapp:").unwrap_or(phone);
        if !is_valid_international_phone(bare) {
            error!("Refusing to send to non-E.164 number {}", mask_phone_number(phone));
            return Err("phone number is not in E.164 format".to_string());
        }
        let to = whatsapp_address(phone);

        match self.post_message(&to, text).await {
            Ok(sid) => {
                info!(
                    "WhatsApp message sent to {} with SID: {}",
                    mask_phone_number(phone),
                    sid
                );
                Ok(sid)
            }
            Err(e) => {
                error!(
                    "Failed to send WhatsApp message to {}: {}",
                    mask_phone_number(phone),
                    e
                );
                Err(e.to_string())
            }
        }
    }

    fn provider_name(&self) -> &str {
        "twilio-whatsapp"
    }
}

/// Prefix a phone number with the WhatsApp channel marker unless present
pub fn whatsapp_address(phone: &str) -> String {
    let phone = phone.trim();
    if phone.starts_with(WHATSAPP_PREFIX) {
        phone.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, phone)
    }
}
