//! WhatsApp delivery through the Twilio messaging API.

use anyhow::Context;
use async_trait::async_trait;

use super::{MessageTransport, OutboundMessage};
use crate::models::NotifierSettings;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Transport sending plain-text WhatsApp messages via Twilio.
#[derive(Debug)]
pub struct TwilioWhatsAppTransport {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_base: String,
}

impl TwilioWhatsAppTransport {
    /// Build the transport from stored settings.
    pub fn from_settings(settings: &NotifierSettings) -> anyhow::Result<Self> {
        let account_sid = settings
            .twilio_account_sid
            .clone()
            .context("twilio_account_sid is not configured")?;
        let auth_token = settings
            .twilio_auth_token
            .clone()
            .context("twilio_auth_token is not configured")?;
        let from_number = settings
            .twilio_whatsapp_number
            .clone()
            .context("twilio_whatsapp_number is not configured")?;
        Ok(Self {
            client: reqwest::Client::new(),
            account_sid,
            auth_token,
            from_number,
            api_base: TWILIO_API_BASE.to_string(),
        })
    }

    /// Point the transport at a different API host, for tests.
    #[cfg(test)]
    fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}

#[async_trait]
impl MessageTransport for TwilioWhatsAppTransport {
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );
        let params = [
            ("From", format!("whatsapp:{}", self.from_number)),
            ("To", format!("whatsapp:{}", message.recipient)),
            ("Body", message.body.clone()),
        ];
        self.client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .context("twilio request failed")?
            .error_for_status()
            .context("twilio rejected the message")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> NotifierSettings {
        NotifierSettings {
            twilio_account_sid: Some("AC123".to_string()),
            twilio_auth_token: Some("token".to_string()),
            twilio_whatsapp_number: Some("+14155238886".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_credentials_are_rejected() {
        let err = TwilioWhatsAppTransport::from_settings(&NotifierSettings::default()).unwrap_err();
        assert!(err.to_string().contains("twilio_account_sid"));
    }

    #[tokio::test]
    async fn test_unreachable_host_surfaces_as_error() {
        let transport = TwilioWhatsAppTransport::from_settings(&settings())
            .unwrap()
            .with_api_base("http://127.0.0.1:1");
        let message = OutboundMessage {
            recipient: "+5511999990000".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(transport.deliver(&message).await.is_err());
    }
}
