//! GitHub webhook payloads.
//!
//! This module provides:
//! - Typed, lenient event structs ([`events`])
//! - Parsing from the `X-GitHub-Event` name and JSON body ([`parser`])

pub mod events;
pub mod parser;

pub use events::GitHubEvent;
pub use parser::{parse_event, repository_name};
