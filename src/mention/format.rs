//! Rendering GitHub logins as Discord mention tokens.

use std::fmt;

use crate::directory::IdentityDirectory;
use crate::types::DiscordId;

/// A Discord user mention, `<@ID>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MentionToken(String);

impl MentionToken {
    /// Returns the token as it goes on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MentionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders the mention token for a single Discord user.
pub fn render_one(id: &DiscordId) -> MentionToken {
    MentionToken(format!("<@{id}>"))
}

/// Resolves each login against the directory and renders its token.
///
/// Logins without a directory entry are dropped silently. The relative order
/// of the remaining logins is preserved.
pub fn render_many<S: AsRef<str>>(logins: &[S], directory: &IdentityDirectory) -> Vec<MentionToken> {
    logins
        .iter()
        .filter_map(|login| directory.lookup(login.as_ref()))
        .map(render_one)
        .collect()
}

/// Joins tokens into Discord message content, or `None` if there are none.
pub fn join_tokens(tokens: &[MentionToken]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    Some(
        tokens
            .iter()
            .map(MentionToken::as_str)
            .collect::<Vec<_>>()
            .join(" "),
    )
}
