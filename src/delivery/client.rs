//! `reqwest`-backed Discord webhook client.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::{DeliveryError, DiscordMessage, MessageSink};

/// Posts messages to Discord execute-webhook URLs.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DiscordWebhookClient {
    client: Client,
}

impl DiscordWebhookClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pr-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(DiscordWebhookClient { client })
    }

    async fn post(&self, url: &str, message: &DiscordMessage) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Discord accepted message");
        Ok(())
    }
}

impl MessageSink for DiscordWebhookClient {
    fn deliver(
        &self,
        url: &str,
        message: &DiscordMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        self.post(url, message)
    }
}
