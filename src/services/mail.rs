//! Outbound confirmation-mail side channel.
//!
//! Disabled in the default configuration, in which case a send only logs.
//! When enabled, messages are posted as JSON to an HTTP mail relay.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail relay error: {0}")]
    Relay(String),
}

#[derive(Serialize)]
struct ConfirmationMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'static str,
    html: String,
}

pub struct MailService {
    config: MailConfig,
    client: reqwest::Client,
}

impl MailService {
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.request_timeout_seconds.into(),
            ))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    pub async fn send_confirmation(
        &self,
        recipient: &str,
        fullname: &str,
        confirm_token: &str,
    ) -> Result<(), MailError> {
        if !self.config.enabled {
            info!("Mail disabled, skipping confirmation for {recipient}");
            return Ok(());
        }

        let link = format!(
            "{}/confirm-registration/{confirm_token}",
            self.config.frontend_url
        );
        let message = ConfirmationMessage {
            from: &self.config.sender,
            to: recipient,
            subject: "E-mail confirmation",
            html: format!(
                "Welcome, {fullname}! Follow <a href=\"{link}\">this link</a> \
                 to complete your registration."
            ),
        };

        let response = self
            .client
            .post(&self.config.relay_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| MailError::Relay(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Relay(format!(
                "relay returned {}",
                response.status()
            )));
        }

        info!("Confirmation mail queued for {recipient}");
        Ok(())
    }
}
