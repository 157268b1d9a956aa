//! Discord delivery errors.

use thiserror::Error;

/// Why a message did not reach Discord.
///
/// Neither case is retried. The dispatcher logs the error and still
/// acknowledges the webhook to GitHub.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Discord answered with a non-success status.
    #[error("Discord returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never got a response (DNS, TLS, timeout, ...).
    #[error("failed to reach Discord: {0}")]
    Transport(#[from] reqwest::Error),
}
