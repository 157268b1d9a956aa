//! Discord embeds for GitHub events.
//!
//! [`build_embed`] turns a parsed [`GitHubEvent`] into the card posted to the
//! repository's channel, or `None` when the event is not worth relaying
//! (an uninteresting action, a push without commits).
//!
//! Embed content is independent of mentions: the card describes what
//! happened, the message `content` carries who gets pinged.

pub mod colors;
pub mod model;
pub mod text;

pub use model::{Embed, EmbedAuthor, EmbedField, EmbedFooter};

use chrono::{DateTime, Utc};

use crate::webhooks::GitHubEvent;
use crate::webhooks::events::{
    Commit, IssueCommentEvent, IssuesEvent, OtherEvent, PullRequest, PullRequestEvent,
    PullRequestReviewEvent, PushEvent, ReviewCommentEvent, User,
};
use text::{
    BODY_LIMIT, COMMIT_SUBJECT_LIMIT, FIELD_VALUE_LIMIT, TITLE_LIMIT, first_line, non_blank,
    truncate_text,
};

/// Commits listed in a push embed before the rest are summarised.
pub const MAX_PUSH_COMMITS: usize = 5;

/// Builds the embed for an event delivered for `repo`.
pub fn build_embed(event: &GitHubEvent, repo: &str) -> Option<Embed> {
    build_embed_at(event, repo, Utc::now())
}

/// Like [`build_embed`], with an explicit timestamp.
pub fn build_embed_at(event: &GitHubEvent, repo: &str, now: DateTime<Utc>) -> Option<Embed> {
    let embed = match event {
        GitHubEvent::PullRequest(e) => pull_request(e)?,
        GitHubEvent::PullRequestReview(e) => review(e)?,
        GitHubEvent::PullRequestReviewComment(e) => review_comment(e)?,
        GitHubEvent::IssueComment(e) => issue_comment(e)?,
        GitHubEvent::Issues(e) => issue(e)?,
        GitHubEvent::Push(e) => push(e)?,
        GitHubEvent::Ping => return None,
        GitHubEvent::Other(e) => other(e),
    };

    Some(Embed {
        footer: Some(EmbedFooter {
            text: repo.to_string(),
        }),
        timestamp: Some(now),
        ..embed
    })
}

// ============================================================================
// Per-event builders
// ============================================================================

fn pull_request(e: &PullRequestEvent) -> Option<Embed> {
    let pr = e.pull_request.as_ref()?;
    let merged = pr.merged == Some(true);

    let (verb, color) = match e.action.as_deref()? {
        "opened" if pr.draft == Some(true) => ("Draft pull request opened", colors::DRAFT),
        "opened" => ("Pull request opened", colors::OPEN),
        "reopened" => ("Pull request reopened", colors::OPEN),
        "closed" if merged => ("Pull request merged", colors::MERGED),
        "closed" => ("Pull request closed", colors::CLOSED),
        "ready_for_review" => ("Pull request ready for review", colors::OPEN),
        "converted_to_draft" => ("Pull request converted to draft", colors::DRAFT),
        "review_requested" => ("Review requested", colors::COMMENTED),
        "review_request_removed" => ("Review request removed", colors::NEUTRAL),
        _ => return None,
    };

    let description = match e.action.as_deref() {
        Some("opened" | "reopened" | "ready_for_review") => body(pr.body.as_deref()),
        _ => None,
    };

    let mut fields = Vec::new();
    if let Some(branches) = branches(pr) {
        fields.push(EmbedField::inline("Branch", branches));
    }
    if let Some(reviewer) = e.requested_reviewer.as_ref().and_then(User::login) {
        fields.push(EmbedField::inline("Reviewer", reviewer));
    }

    Some(Embed {
        title: Some(pr_title(verb, pr)),
        description,
        url: pr.html_url.clone(),
        color: Some(color),
        author: author(e.sender.as_ref()),
        fields,
        ..Default::default()
    })
}

fn review(e: &PullRequestReviewEvent) -> Option<Embed> {
    if e.action.as_deref() != Some("submitted") {
        return None;
    }
    let review = e.review.as_ref()?;
    let state = review.state.as_deref();

    let verb = match state {
        Some("approved") => "Pull request approved",
        Some("changes_requested") => "Changes requested",
        Some("commented") => "Pull request reviewed",
        _ => "Review submitted",
    };
    let pr = e.pull_request.clone().unwrap_or_default();

    Some(Embed {
        title: Some(pr_title(verb, &pr)),
        description: body(review.body.as_deref()),
        url: review.html_url.clone().or(pr.html_url),
        color: Some(colors::for_review_state(state)),
        author: author(review.user.as_ref().or(e.sender.as_ref())),
        ..Default::default()
    })
}

fn review_comment(e: &ReviewCommentEvent) -> Option<Embed> {
    if e.action.as_deref() != Some("created") {
        return None;
    }
    let comment = e.comment.as_ref()?;
    let pr = e.pull_request.clone().unwrap_or_default();

    let fields = comment
        .path
        .as_deref()
        .map(|path| EmbedField::inline("File", truncate_text(path, FIELD_VALUE_LIMIT)))
        .into_iter()
        .collect();

    Some(Embed {
        title: Some(pr_title("New review comment", &pr)),
        description: body(comment.body.as_deref()),
        url: comment.html_url.clone().or(pr.html_url),
        color: Some(colors::COMMENTED),
        author: author(comment.user.as_ref().or(e.sender.as_ref())),
        fields,
        ..Default::default()
    })
}

fn issue_comment(e: &IssueCommentEvent) -> Option<Embed> {
    if e.action.as_deref() != Some("created") {
        return None;
    }
    let comment = e.comment.as_ref()?;
    let issue = e.issue.clone().unwrap_or_default();

    let verb = if issue.is_pull_request() {
        "New comment on pull request"
    } else {
        "New comment on issue"
    };

    Some(Embed {
        title: Some(numbered_title(
            verb,
            issue.number.map(|n| n.to_string()),
            issue.title.as_deref(),
        )),
        description: body(comment.body.as_deref()),
        url: comment.html_url.clone().or(issue.html_url),
        color: Some(colors::COMMENTED),
        author: author(comment.user.as_ref().or(e.sender.as_ref())),
        ..Default::default()
    })
}

fn issue(e: &IssuesEvent) -> Option<Embed> {
    let issue = e.issue.as_ref()?;

    let (verb, color) = match e.action.as_deref()? {
        "opened" => ("Issue opened", colors::OPEN),
        "reopened" => ("Issue reopened", colors::OPEN),
        "closed" => ("Issue closed", colors::CLOSED),
        _ => return None,
    };

    let description = match e.action.as_deref() {
        Some("opened") => body(issue.body.as_deref()),
        _ => None,
    };

    Some(Embed {
        title: Some(numbered_title(
            verb,
            issue.number.map(|n| n.to_string()),
            issue.title.as_deref(),
        )),
        description,
        url: issue.html_url.clone(),
        color: Some(color),
        author: author(e.sender.as_ref()),
        ..Default::default()
    })
}

fn push(e: &PushEvent) -> Option<Embed> {
    if e.commits.is_empty() {
        return None;
    }

    let count = e.commits.len();
    let noun = if count == 1 { "commit" } else { "commits" };
    let title = match e.branch().or(e.ref_name.as_deref()) {
        Some(branch) => format!("{count} new {noun} pushed to {branch}"),
        None => format!("{count} new {noun} pushed"),
    };

    let mut lines: Vec<String> = e
        .commits
        .iter()
        .take(MAX_PUSH_COMMITS)
        .map(commit_line)
        .collect();
    if count > MAX_PUSH_COMMITS {
        lines.push(format!("... and {} more", count - MAX_PUSH_COMMITS));
    }

    Some(Embed {
        title: Some(truncate_text(&title, TITLE_LIMIT)),
        description: Some(lines.join("\n")),
        url: e.compare.clone(),
        color: Some(colors::PUSH),
        author: author(e.sender.as_ref()),
        ..Default::default()
    })
}

fn other(e: &OtherEvent) -> Embed {
    let title = match &e.action {
        Some(action) => format!("GitHub event: {} ({action})", e.name),
        None => format!("GitHub event: {}", e.name),
    };

    Embed {
        title: Some(truncate_text(&title, TITLE_LIMIT)),
        color: Some(colors::NEUTRAL),
        author: author(e.sender.as_ref()),
        ..Default::default()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn author(user: Option<&User>) -> Option<EmbedAuthor> {
    user.and_then(EmbedAuthor::from_user)
}

fn body(text: Option<&str>) -> Option<String> {
    non_blank(text).map(|t| truncate_text(t, BODY_LIMIT))
}

fn pr_title(verb: &str, pr: &PullRequest) -> String {
    numbered_title(verb, pr.number.map(|n| n.to_string()), pr.title.as_deref())
}

/// `"{verb}: #{number} {title}"`, leaving out whatever is missing.
fn numbered_title(verb: &str, number: Option<String>, title: Option<&str>) -> String {
    let subject = [number.as_deref(), non_blank(title)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let full = if subject.is_empty() {
        verb.to_string()
    } else {
        format!("{verb}: {subject}")
    };
    truncate_text(&full, TITLE_LIMIT)
}

fn branches(pr: &PullRequest) -> Option<String> {
    let head = pr.head.as_ref()?.ref_name.as_deref()?;
    let base = pr.base.as_ref()?.ref_name.as_deref()?;
    Some(format!("{head} → {base}"))
}

/// ``[`abc1234`](url) Subject line - Author``
fn commit_line(commit: &Commit) -> String {
    let short = commit.id.as_ref().map(|id| id.short()).unwrap_or("unknown");
    let sha = match &commit.url {
        Some(url) => format!("[`{short}`]({url})"),
        None => format!("`{short}`"),
    };
    let subject = truncate_text(
        first_line(commit.message.as_deref().unwrap_or("")),
        COMMIT_SUBJECT_LIMIT,
    );
    let who = commit
        .author
        .as_ref()
        .and_then(|a| a.name.as_deref().or(a.username.as_deref()))
        .unwrap_or("unknown");

    format!("{sha} {subject} - {who}")
}
