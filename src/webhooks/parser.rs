//! GitHub webhook payload parser.
//!
//! Turns an event name and its JSON body into a typed [`GitHubEvent`].
//!
//! # Parsing Strategy
//!
//! 1. The event type is determined from the `X-GitHub-Event` header
//! 2. The payload is deserialised into the shape registered for that name
//! 3. Unknown event types become [`GitHubEvent::Other`]
//! 4. A field of the wrong JSON type reads as absent; its neighbours are kept
//! 5. A body that is not an object at all yields the right variant with every
//!    field absent
//!
//! Parsing never fails. The relay does not control what GitHub sends, and a
//! drifted payload must degrade to "fewer details, no mentions".

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::events::{GitHubEvent, OtherEvent, User};

/// Parses a webhook payload into a typed event.
///
/// # Arguments
///
/// * `event_type` - The value of the `X-GitHub-Event` header
/// * `payload` - The parsed JSON body
///
/// # Examples
///
/// ```
/// use pr_relay::webhooks::{GitHubEvent, parse_event};
///
/// let payload = serde_json::json!({
///     "action": "created",
///     "comment": { "body": "LGTM", "user": { "login": "octocat" } },
///     "issue": { "number": 42, "pull_request": { "url": "..." } },
///     "repository": { "name": "repo" }
/// });
///
/// match parse_event("issue_comment", &payload) {
///     GitHubEvent::IssueComment(e) => assert!(e.is_on_pull_request()),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn parse_event(event_type: &str, payload: &Value) -> GitHubEvent {
    match event_type {
        "pull_request" => GitHubEvent::PullRequest(deserialize_or_default(event_type, payload)),
        "pull_request_review" => {
            GitHubEvent::PullRequestReview(deserialize_or_default(event_type, payload))
        }
        "pull_request_review_comment" => {
            GitHubEvent::PullRequestReviewComment(deserialize_or_default(event_type, payload))
        }
        "issue_comment" => GitHubEvent::IssueComment(deserialize_or_default(event_type, payload)),
        "issues" => GitHubEvent::Issues(deserialize_or_default(event_type, payload)),
        "push" => GitHubEvent::Push(deserialize_or_default(event_type, payload)),
        "ping" => GitHubEvent::Ping,
        other => GitHubEvent::Other(OtherEvent {
            name: other.to_string(),
            action: payload
                .get("action")
                .and_then(Value::as_str)
                .map(str::to_string),
            sender: payload
                .get("sender")
                .and_then(|s| User::deserialize(s).ok()),
        }),
    }
}

/// Extracts the repository name from a webhook payload.
///
/// Most GitHub webhook events include a `repository` object; `ping` events
/// for organisation hooks do not.
pub fn repository_name(payload: &Value) -> Option<String> {
    payload
        .get("repository")
        .and_then(|r| r.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Deserialises `payload` into `T`, falling back to `T::default()` when the
/// payload is not an object. Field-level mismatches are absorbed by the
/// event structs themselves.
fn deserialize_or_default<T>(event_type: &str, payload: &Value) -> T
where
    T: DeserializeOwned + Default,
{
    match T::deserialize(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(event_type, error = %e, "Payload did not match expected shape");
            T::default()
        }
    }
}
