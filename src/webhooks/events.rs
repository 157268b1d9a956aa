//! GitHub webhook event types.
//!
//! Typed representations of the webhook payloads the relay understands. The
//! pull-request family (`pull_request`, `pull_request_review`,
//! `pull_request_review_comment`, `issue_comment`) drives mention resolution;
//! `issues` and `push` only feed the Discord embed. Everything else lands in
//! [`GitHubEvent::Other`].
//!
//! GitHub's payloads drift over time and differ per event type, so every field
//! here is optional and unknown fields are ignored. A missing, null, or
//! mistyped field means "nothing to say about it", never a parse failure,
//! and never costs the fields around it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{PrNumber, Sha};

/// A parsed GitHub webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubEvent {
    /// A pull request was opened, closed, had a review requested, etc.
    PullRequest(PullRequestEvent),

    /// A review was submitted, edited, or dismissed on a pull request.
    PullRequestReview(PullRequestReviewEvent),

    /// A comment was left on a line of a pull request diff.
    PullRequestReviewComment(ReviewCommentEvent),

    /// A comment on the conversation tab of an issue or pull request.
    ///
    /// GitHub delivers both under the same event name; a pull request is
    /// recognisable by the presence of `issue.pull_request`.
    IssueComment(IssueCommentEvent),

    /// An issue was opened, closed, reopened, etc.
    Issues(IssuesEvent),

    /// Commits were pushed to a branch.
    Push(PushEvent),

    /// GitHub's webhook configuration check.
    Ping,

    /// Any other event type.
    Other(OtherEvent),
}

impl GitHubEvent {
    /// Returns the webhook event name this variant was parsed from.
    pub fn name(&self) -> &str {
        match self {
            GitHubEvent::PullRequest(_) => "pull_request",
            GitHubEvent::PullRequestReview(_) => "pull_request_review",
            GitHubEvent::PullRequestReviewComment(_) => "pull_request_review_comment",
            GitHubEvent::IssueComment(_) => "issue_comment",
            GitHubEvent::Issues(_) => "issues",
            GitHubEvent::Push(_) => "push",
            GitHubEvent::Ping => "ping",
            GitHubEvent::Other(e) => &e.name,
        }
    }

    /// Returns the login of the user who triggered the delivery, if present.
    pub fn sender_login(&self) -> Option<&str> {
        let sender = match self {
            GitHubEvent::PullRequest(e) => e.sender.as_ref(),
            GitHubEvent::PullRequestReview(e) => e.sender.as_ref(),
            GitHubEvent::PullRequestReviewComment(e) => e.sender.as_ref(),
            GitHubEvent::IssueComment(e) => e.sender.as_ref(),
            GitHubEvent::Issues(e) => e.sender.as_ref(),
            GitHubEvent::Push(e) => e.sender.as_ref(),
            GitHubEvent::Ping => None,
            GitHubEvent::Other(e) => e.sender.as_ref(),
        };
        sender.and_then(User::login)
    }
}

// ============================================================================
// Field leniency
// ============================================================================

/// Reads an optional field, mapping null and wrongly-typed values to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(T::deserialize(value).ok())
}

/// Reads a list field, keeping the elements that fit and dropping the rest.
/// Anything other than an array reads as empty.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

// ============================================================================
// Shared payload pieces
// ============================================================================

/// A GitHub user or bot account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "lenient")]
    pub login: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Returns the login, if present.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }
}

/// Minimal repository info present in most webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
}

/// A branch reference on a pull request (`base` or `head`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitRef {
    #[serde(rename = "ref", deserialize_with = "lenient")]
    pub ref_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub sha: Option<Sha>,
}

/// The `pull_request` object embedded in pull request payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    #[serde(deserialize_with = "lenient")]
    pub number: Option<PrNumber>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub user: Option<User>,
    #[serde(deserialize_with = "lenient")]
    pub merged: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub draft: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub base: Option<GitRef>,
    #[serde(deserialize_with = "lenient")]
    pub head: Option<GitRef>,
}

/// A pull request review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Review {
    #[serde(deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub user: Option<User>,
}

/// An issue comment or a review (diff) comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub user: Option<User>,
    /// File path for review comments; absent on issue comments.
    #[serde(deserialize_with = "lenient")]
    pub path: Option<String>,
}

/// An issue, which may actually be a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Issue {
    #[serde(deserialize_with = "lenient")]
    pub number: Option<PrNumber>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub user: Option<User>,
    /// Present (and non-null) only when the issue is a pull request.
    #[serde(deserialize_with = "lenient")]
    pub pull_request: Option<Value>,
}

impl Issue {
    /// Returns true if this issue is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// A commit author as reported in push payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommitAuthor {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub username: Option<String>,
}

/// A commit included in a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<Sha>,
    #[serde(deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<CommitAuthor>,
}

// ============================================================================
// Event payloads
// ============================================================================

/// A `pull_request` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PullRequestEvent {
    #[serde(deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub pull_request: Option<PullRequest>,
    /// Only present on `review_requested` / `review_request_removed`.
    #[serde(deserialize_with = "lenient")]
    pub requested_reviewer: Option<User>,
    #[serde(deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "lenient")]
    pub sender: Option<User>,
}

/// A `pull_request_review` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PullRequestReviewEvent {
    #[serde(deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub review: Option<Review>,
    #[serde(deserialize_with = "lenient")]
    pub pull_request: Option<PullRequest>,
    #[serde(deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "lenient")]
    pub sender: Option<User>,
}

/// A `pull_request_review_comment` event.
///
/// GitHub does include `pull_request` here, but the relay deliberately only
/// reads it for the embed; the PR author is not used for mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewCommentEvent {
    #[serde(deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub comment: Option<Comment>,
    #[serde(deserialize_with = "lenient")]
    pub pull_request: Option<PullRequest>,
    #[serde(deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "lenient")]
    pub sender: Option<User>,
}

/// An `issue_comment` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssueCommentEvent {
    #[serde(deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub comment: Option<Comment>,
    #[serde(deserialize_with = "lenient")]
    pub issue: Option<Issue>,
    #[serde(deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "lenient")]
    pub sender: Option<User>,
}

impl IssueCommentEvent {
    /// Returns true if the comment was left on a pull request.
    pub fn is_on_pull_request(&self) -> bool {
        self.issue.as_ref().is_some_and(Issue::is_pull_request)
    }
}

/// An `issues` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IssuesEvent {
    #[serde(deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub issue: Option<Issue>,
    #[serde(deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "lenient")]
    pub sender: Option<User>,
}

/// A `push` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushEvent {
    #[serde(rename = "ref", deserialize_with = "lenient")]
    pub ref_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub compare: Option<String>,
    #[serde(deserialize_with = "lenient_seq")]
    pub commits: Vec<Commit>,
    #[serde(deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "lenient")]
    pub sender: Option<User>,
}

impl PushEvent {
    /// Returns the branch name (`refs/heads/` stripped), if the ref is a branch.
    pub fn branch(&self) -> Option<&str> {
        self.ref_name
            .as_deref()
            .and_then(|r| r.strip_prefix("refs/heads/"))
    }
}

/// Any event the relay has no dedicated shape for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherEvent {
    /// The `X-GitHub-Event` value.
    pub name: String,
    pub action: Option<String>,
    pub sender: Option<User>,
}
