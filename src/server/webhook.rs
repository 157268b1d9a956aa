//! Webhook endpoint handler.
//!
//! Receives a GitHub delivery, picks the Discord channel for its repository,
//! builds the embed, resolves mentions, and posts the message before
//! answering. Delivery failures are logged and never change the answer:
//! GitHub gets `200` for every payload it was right to send.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::field::{Empty, display};
use tracing::{Span, debug, error, info, instrument, warn};

use super::AppState;
use crate::delivery::{DiscordMessage, MessageSink};
use crate::directory::IdentityDirectory;
use crate::embeds::build_embed;
use crate::mention::{MentionPlan, plan_mentions};
use crate::types::DeliveryId;
use crate::webhooks::{parse_event, repository_name};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
const HEADER_DELIVERY: &str = "x-github-delivery";

/// Errors that reject a delivery outright.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Invalid JSON body.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidJson(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Response
///
/// - 200 `pong`: a `ping` delivery
/// - 200 `Repo not mapped`: no Discord channel for the repository
/// - 200 `Event ignored`: nothing worth posting
/// - 200 `OK`: message posted, or posting failed (see logs)
/// - 400: missing `X-GitHub-Event` or a body that is not JSON
#[instrument(
    name = "github.webhook",
    skip_all,
    fields(event = Empty, delivery = Empty, repo = Empty)
)]
pub async fn webhook_handler<S: MessageSink>(
    State(app_state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError> {
    let span = Span::current();

    let event_type = get_header(&headers, HEADER_EVENT)?;
    span.record("event", event_type.as_str());
    if let Ok(delivery) = get_header(&headers, HEADER_DELIVERY) {
        span.record("delivery", display(DeliveryId::new(delivery)));
    }

    if event_type == "ping" {
        info!("Received ping");
        return Ok((StatusCode::OK, "pong"));
    }

    let payload: serde_json::Value = serde_json::from_slice(&body)?;

    let repo = repository_name(&payload);
    if let Some(repo) = &repo {
        span.record("repo", repo.as_str());
    }
    let Some((repo, url)) = repo.and_then(|repo| {
        let url = app_state.routes().url_for(&repo)?;
        Some((repo, url))
    }) else {
        warn!(
            configured = ?app_state.routes().repos(),
            "Repository has no Discord webhook configured"
        );
        return Ok((StatusCode::OK, "Repo not mapped"));
    };

    let event = parse_event(&event_type, &payload);

    let Some(embed) = build_embed(&event, &repo) else {
        debug!(sender = ?event.sender_login(), "Event not relayed");
        return Ok((StatusCode::OK, "Event ignored"));
    };

    let mentions = plan_mentions(&event, app_state.directory());
    log_mentions(&mentions, app_state.directory());

    let message = DiscordMessage {
        content: mentions.content(),
        embeds: vec![embed],
    };

    match app_state.sink().deliver(url, &message).await {
        Ok(()) => info!(mentions = mentions.tokens.len(), "Relayed to Discord"),
        Err(e) => error!(error = %e, "Failed to deliver to Discord"),
    }

    Ok((StatusCode::OK, "OK"))
}

/// Extracts a required header value as a string.
fn get_header(headers: &HeaderMap, name: &'static str) -> Result<String, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(WebhookError::MissingHeader(name))
}

/// Logs, per mentionee, whether a Discord ID was found.
fn log_mentions(plan: &MentionPlan, directory: &IdentityDirectory) {
    for login in &plan.mentionees {
        match directory.lookup(login) {
            Some(id) => debug!(login = %login, discord_id = %id, "Mentioning user"),
            None => warn!(login = %login, "No Discord ID configured; mention skipped"),
        }
    }
}
