//! Mention resolution for pull request events.
//!
//! Classify → extract → select → render:
//!
//! ```text
//! GitHubEvent ──is_pull_request_related──▶ PrMentionInfo::from_event
//!             ──select_mentionees──▶ [login] ──render_many──▶ [<@id>]
//! ```
//!
//! Each step is pure. Missing data of any kind degrades to fewer mentions,
//! never to an error.

pub mod classify;
pub mod format;
pub mod policy;

pub use classify::{PrMentionInfo, extract, is_pr_event};
pub use format::{MentionToken, join_tokens, render_many, render_one};
pub use policy::select_mentionees;

use crate::directory::IdentityDirectory;
use crate::webhooks::GitHubEvent;

/// The outcome of mention resolution for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionPlan {
    /// Logins the policy selected, in notification order.
    pub mentionees: Vec<String>,
    /// Tokens for the mentionees that have a directory entry.
    pub tokens: Vec<MentionToken>,
}

impl MentionPlan {
    /// Returns the Discord message content, or `None` if nobody is pinged.
    pub fn content(&self) -> Option<String> {
        join_tokens(&self.tokens)
    }
}

/// Resolves who to ping for an event.
///
/// Returns an empty plan for events that do not concern a pull request,
/// without running extraction at all.
pub fn plan_mentions(event: &GitHubEvent, directory: &IdentityDirectory) -> MentionPlan {
    if !event.is_pull_request_related() {
        return MentionPlan::default();
    }

    let info = PrMentionInfo::from_event(event);
    let mentionees = select_mentionees(&info);
    let tokens = render_many(&mentionees, directory);

    MentionPlan { mentionees, tokens }
}
