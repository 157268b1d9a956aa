//! Embed sidebar colours, as Discord's 24-bit RGB integers.

/// Newly opened or reopened pull requests and issues.
pub const OPEN: u32 = 0x2EA4_4F;

/// Merged pull requests.
pub const MERGED: u32 = 0x6F42_C1;

/// Closed without merging.
pub const CLOSED: u32 = 0xCB24_31;

/// Draft pull requests.
pub const DRAFT: u32 = 0x6A73_7D;

/// Approving reviews.
pub const APPROVED: u32 = 0x2EA4_4F;

/// Reviews requesting changes.
pub const CHANGES_REQUESTED: u32 = 0xE362_09;

/// Comments, comment-only reviews and review requests.
pub const COMMENTED: u32 = 0x0366_D6;

/// Pushes.
pub const PUSH: u32 = 0x2429_2E;

/// Anything without a more specific colour.
pub const NEUTRAL: u32 = 0x5860_69;

/// Picks the colour for a review by its `state`.
pub fn for_review_state(state: Option<&str>) -> u32 {
    match state {
        Some("approved") => APPROVED,
        Some("changes_requested") => CHANGES_REQUESTED,
        Some("commented") => COMMENTED,
        _ => NEUTRAL,
    }
}
