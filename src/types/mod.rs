//! Core identifier types shared by the relay.

pub mod ids;

pub use ids::{DeliveryId, DiscordId, PrNumber, Sha};
