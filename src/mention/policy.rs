//! Who gets pinged for a pull request interaction.

use super::classify::PrMentionInfo;

/// Selects the GitHub logins to notify for an interaction.
///
/// 1. The PR author, if both author and actor are known and differ. The
///    comparison is exact (case-sensitive), as GitHub delivers logins with
///    consistent casing.
/// 2. The requested reviewer, if any. No self-check: GitHub never lets a
///    requester request themselves.
///
/// The result never contains the same login twice and keeps that order.
pub fn select_mentionees(info: &PrMentionInfo) -> Vec<String> {
    let mut mentionees = Vec::with_capacity(2);

    if let (Some(author), Some(actor)) = (&info.pr_author, &info.actor)
        && author != actor
    {
        mentionees.push(author.clone());
    }

    if let Some(reviewer) = &info.requested_reviewer
        && !mentionees.contains(reviewer)
    {
        mentionees.push(reviewer.clone());
    }

    mentionees
}
