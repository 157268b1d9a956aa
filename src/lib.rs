//! PR Relay - forwards GitHub webhook events to Discord, pinging the people a
//! pull request interaction concerns.
//!
//! This library provides the event model, the mention pipeline (classify,
//! select, render), Discord embeds and delivery, and the HTTP server.

pub mod config;
pub mod delivery;
pub mod directory;
pub mod embeds;
pub mod mention;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
