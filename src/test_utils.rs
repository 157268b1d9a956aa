//! Shared test fixtures, a recording sink, and proptest generators.

use std::future::Future;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::{Value, json};

use crate::delivery::{DeliveryError, DiscordMessage, MessageSink};
use crate::directory::IdentityDirectory;
use crate::mention::PrMentionInfo;

const REPO_URL: &str = "https://github.com/test/test-repo";

// ============================================================================
// Directory
// ============================================================================

/// `froster01` and `chaad98`, the two accounts used across scenarios.
pub fn test_directory() -> IdentityDirectory {
    IdentityDirectory::from_pairs([
        ("froster01", "620058726069567503"),
        ("chaad98", "335363734446931968"),
    ])
}

// ============================================================================
// Payloads
// ============================================================================

pub fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "html_url": format!("https://github.com/{login}"),
        "avatar_url": format!("https://avatars.githubusercontent.com/{login}"),
        "type": "User"
    })
}

fn repository_json() -> Value {
    json!({
        "name": "test-repo",
        "full_name": "test/test-repo",
        "html_url": REPO_URL
    })
}

fn pull_request_json(author: &str) -> Value {
    json!({
        "number": 1,
        "title": "Test PR",
        "body": "Adds a test",
        "html_url": format!("{REPO_URL}/pull/1"),
        "user": user_json(author),
        "merged": false,
        "draft": false,
        "base": { "ref": "main", "sha": "a".repeat(40) },
        "head": { "ref": "feature", "sha": "b".repeat(40) }
    })
}

/// A `pull_request` payload for PR #1 in `test-repo`.
pub fn pull_request_payload(
    action: &str,
    author: &str,
    sender: &str,
    requested_reviewer: Option<&str>,
) -> Value {
    let mut payload = json!({
        "action": action,
        "number": 1,
        "pull_request": pull_request_json(author),
        "repository": repository_json(),
        "sender": user_json(sender)
    });
    if let Some(reviewer) = requested_reviewer {
        payload["requested_reviewer"] = user_json(reviewer);
    }
    payload
}

/// A submitted `pull_request_review` payload.
pub fn review_payload(state: &str, reviewer: &str, pr_author: &str) -> Value {
    json!({
        "action": "submitted",
        "review": {
            "state": state,
            "body": "Looks good",
            "html_url": format!("{REPO_URL}/pull/1#pullrequestreview-1"),
            "user": user_json(reviewer)
        },
        "pull_request": pull_request_json(pr_author),
        "repository": repository_json(),
        "sender": user_json(reviewer)
    })
}

/// A created `issue_comment` payload, on PR #1 when `on_pull_request`,
/// otherwise on plain issue #1.
pub fn issue_comment_payload(commenter: &str, issue_author: &str, on_pull_request: bool) -> Value {
    let mut issue = json!({
        "number": 1,
        "title": "Test PR",
        "html_url": format!("{REPO_URL}/issues/1"),
        "state": "open",
        "user": user_json(issue_author)
    });
    if on_pull_request {
        issue["pull_request"] = json!({ "html_url": format!("{REPO_URL}/pull/1") });
    }

    json!({
        "action": "created",
        "comment": {
            "body": "Thanks!",
            "html_url": format!("{REPO_URL}/issues/1#issuecomment-1"),
            "user": user_json(commenter)
        },
        "issue": issue,
        "repository": repository_json(),
        "sender": user_json(commenter)
    })
}

// ============================================================================
// Sinks
// ============================================================================

/// A [`MessageSink`] that records every delivery instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    deliveries: Arc<Mutex<Vec<(String, DiscordMessage)>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records deliveries but reports each one as rejected by Discord.
    pub fn failing() -> Self {
        RecordingSink {
            fail: true,
            ..Self::default()
        }
    }

    pub fn deliveries(&self) -> Vec<(String, DiscordMessage)> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn deliver(
        &self,
        url: &str,
        message: &DiscordMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        self.deliveries
            .lock()
            .unwrap()
            .push((url.to_string(), message.clone()));

        let result = if self.fail {
            Err(DeliveryError::Status {
                status: 500,
                body: "recording sink set to fail".to_string(),
            })
        } else {
            Ok(())
        };
        std::future::ready(result)
    }
}

// ============================================================================
// Generators
// ============================================================================

pub fn arb_login() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Mention info with every field independently present or absent, and the
/// actor frequently equal to the author.
pub fn arb_mention_info() -> impl Strategy<Value = PrMentionInfo> {
    (
        prop::option::of(arb_login()),
        prop::option::of(arb_login()),
        prop::option::of(arb_login()),
        any::<bool>(),
    )
        .prop_map(|(pr_author, actor, requested_reviewer, self_action)| {
            let actor = if self_action {
                pr_author.clone()
            } else {
                actor
            };
            PrMentionInfo {
                pr_author,
                actor,
                requested_reviewer,
            }
        })
}
