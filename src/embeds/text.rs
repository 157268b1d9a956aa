//! Text shaping for embed fields.
//!
//! Discord rejects embeds whose fields exceed fixed character limits, so
//! everything taken from a payload goes through [`truncate_text`] first.

/// Maximum embed title length accepted by Discord.
pub const TITLE_LIMIT: usize = 256;

/// Description length used for PR, issue and comment bodies.
pub const BODY_LIMIT: usize = 1000;

/// Maximum embed field value length accepted by Discord.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Length of a commit subject line in push summaries.
pub const COMMIT_SUBJECT_LIMIT: usize = 72;

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
///
/// Text of `max` characters or fewer is returned unchanged. Longer text keeps
/// its first `max - 3` characters. Counting is by `char`, so a multi-byte
/// sequence is never split.
///
/// ```
/// use pr_relay::embeds::text::truncate_text;
///
/// assert_eq!(truncate_text("hello world", 5), "he...");
/// assert_eq!(truncate_text("hello", 5), "hello");
/// ```
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Returns the first line of `text`, without its line terminator.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Returns `text` with surrounding whitespace removed, or `None` if nothing
/// is left.
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
