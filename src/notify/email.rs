//! Email delivery through a mail-relay HTTP endpoint.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{MessageTransport, OutboundMessage};
use crate::models::NotifierSettings;

/// Transport posting HTML mail to the configured relay endpoint.
#[derive(Debug)]
pub struct MailRelayTransport {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl MailRelayTransport {
    /// Build the transport from stored settings.
    ///
    /// Fails when the endpoint or sender address is missing, so a
    /// misconfigured channel surfaces as an error rather than a silent
    /// no-op.
    pub fn from_settings(settings: &NotifierSettings) -> anyhow::Result<Self> {
        let endpoint = settings
            .mail_endpoint
            .clone()
            .context("mail_endpoint is not configured")?;
        let from = settings
            .mail_from
            .clone()
            .context("mail_from is not configured")?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            from,
        })
    }
}

#[async_trait]
impl MessageTransport for MailRelayTransport {
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        let payload = json!({
            "from": self.from,
            "to": message.recipient,
            "subject": message.subject,
            "html": message.body,
        });
        self.client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .context("mail relay request failed")?
            .error_for_status()
            .context("mail relay rejected the message")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_is_rejected() {
        let err = MailRelayTransport::from_settings(&NotifierSettings::default()).unwrap_err();
        assert!(err.to_string().contains("mail_endpoint"));

        let partial = NotifierSettings {
            mail_endpoint: Some("https://mail.example/send".to_string()),
            ..Default::default()
        };
        let err = MailRelayTransport::from_settings(&partial).unwrap_err();
        assert!(err.to_string().contains("mail_from"));
    }
}
