//! Core types shared across the lnops workspace.
//!
//! This crate holds the domain model for an Eclair-backed Lightning node:
//! channels, directional routing policies, graph edges, and the raw audit
//! event records, plus the toolkit configuration.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::LnopsConfig;
pub use error::ConfigError;
pub use events::{
    AuditReport, EventTime, ReceivedPart, ReceivedPayment, RelayedPayment, SentPart, SentPayment,
};
pub use types::{Channel, ChannelDesc, ChannelId, Edge, EndpointPolicy, PubKey, RoutingPolicy};
