//! Pull request event classification and actor extraction.
//!
//! Who the "PR author" and the "actor" are depends on the event subtype:
//!
//! | Event | PR author | Actor | Requested reviewer |
//! |-------|-----------|-------|--------------------|
//! | `pull_request` | `pull_request.user` | `sender` | `requested_reviewer` |
//! | `pull_request_review` | `pull_request.user` | `review.user` | - |
//! | `pull_request_review_comment` | - | `comment.user` | - |
//! | `issue_comment` on a PR | `issue.user` | `comment.user` | - |
//! | anything else | - | - | - |
//!
//! The review comment payload does carry a `pull_request`, but its author is
//! not used; only the commenter is extracted.

use serde_json::Value;

use crate::webhooks::events::{Comment, GitHubEvent, PullRequest, User};
use crate::webhooks::parse_event;

/// The GitHub logins relevant to one pull request interaction.
///
/// Every field is optional: not every event subtype carries every role, and
/// payloads may be missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrMentionInfo {
    /// The author of the affected pull request.
    pub pr_author: Option<String>,
    /// Whoever performed this specific action (sender, reviewer, commenter).
    pub actor: Option<String>,
    /// The reviewer whose review was requested, on review-request actions.
    pub requested_reviewer: Option<String>,
}

impl PrMentionInfo {
    /// Extracts the PR roles from a parsed event.
    ///
    /// Events outside the pull request family, and `issue_comment` events on
    /// plain issues, yield an all-absent record.
    pub fn from_event(event: &GitHubEvent) -> Self {
        match event {
            GitHubEvent::PullRequest(e) => PrMentionInfo {
                pr_author: pr_author(e.pull_request.as_ref()),
                actor: login(e.sender.as_ref()),
                requested_reviewer: login(e.requested_reviewer.as_ref()),
            },
            GitHubEvent::PullRequestReview(e) => PrMentionInfo {
                pr_author: pr_author(e.pull_request.as_ref()),
                actor: login(e.review.as_ref().and_then(|r| r.user.as_ref())),
                requested_reviewer: None,
            },
            GitHubEvent::PullRequestReviewComment(e) => PrMentionInfo {
                pr_author: None,
                actor: comment_author(e.comment.as_ref()),
                requested_reviewer: None,
            },
            GitHubEvent::IssueComment(e) if e.is_on_pull_request() => PrMentionInfo {
                pr_author: login(e.issue.as_ref().and_then(|i| i.user.as_ref())),
                actor: comment_author(e.comment.as_ref()),
                requested_reviewer: None,
            },
            GitHubEvent::IssueComment(_)
            | GitHubEvent::Issues(_)
            | GitHubEvent::Push(_)
            | GitHubEvent::Ping
            | GitHubEvent::Other(_) => PrMentionInfo::default(),
        }
    }
}

impl GitHubEvent {
    /// Returns true if this event concerns a pull request.
    ///
    /// The three `pull_request*` events always do, whatever their payload.
    /// `issue_comment` does only when the commented issue is a pull request.
    pub fn is_pull_request_related(&self) -> bool {
        match self {
            GitHubEvent::PullRequest(_)
            | GitHubEvent::PullRequestReview(_)
            | GitHubEvent::PullRequestReviewComment(_) => true,
            GitHubEvent::IssueComment(e) => e.is_on_pull_request(),
            GitHubEvent::Issues(_)
            | GitHubEvent::Push(_)
            | GitHubEvent::Ping
            | GitHubEvent::Other(_) => false,
        }
    }
}

/// Returns true if the raw webhook event concerns a pull request.
pub fn is_pr_event(event_name: &str, payload: &Value) -> bool {
    parse_event(event_name, payload).is_pull_request_related()
}

/// Extracts the PR roles from a raw webhook event.
pub fn extract(event_name: &str, payload: &Value) -> PrMentionInfo {
    PrMentionInfo::from_event(&parse_event(event_name, payload))
}

fn login(user: Option<&User>) -> Option<String> {
    user.and_then(User::login).map(str::to_string)
}

fn pr_author(pr: Option<&PullRequest>) -> Option<String> {
    login(pr.and_then(|pr| pr.user.as_ref()))
}

fn comment_author(comment: Option<&Comment>) -> Option<String> {
    login(comment.and_then(|c| c.user.as_ref()))
}
