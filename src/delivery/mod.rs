//! Outbound delivery to Discord.
//!
//! The dispatcher only sees the [`MessageSink`] trait. Production uses
//! [`DiscordWebhookClient`]; tests substitute a recording sink.

pub mod client;
pub mod error;

pub use client::DiscordWebhookClient;
pub use error::DeliveryError;

use std::future::Future;

use serde::Serialize;

use crate::embeds::Embed;

/// The JSON body of a Discord execute-webhook request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscordMessage {
    /// Mention tokens separated by single spaces. Omitted when nobody is
    /// pinged, so Discord renders the embed alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

/// Something that can deliver a message to a Discord webhook URL.
pub trait MessageSink: Send + Sync + 'static {
    /// Delivers `message` to `url`.
    fn deliver(
        &self,
        url: &str,
        message: &DiscordMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
