//! Node gateway for lnops — the boundary to the underlying Eclair node.
//!
//! This crate provides:
//! - [`NodeGateway`] — the async request/response contract the engine
//!   consumes (channel list, policy updates, pathfinding oracle, payment
//!   submission, audit listing).
//! - [`EclairGateway`] — the HTTP implementation over the Eclair REST API.
//! - [`Session`] — a scoped memoizing wrapper for the idempotent queries,
//!   valid for the lifetime of one invocation.
//! - [`AliasResolver`] — per-session node/channel labelling.
//! - [`pay_via_route`] — payment submission with a bounded status poll.

pub mod alias;
pub mod eclair;
pub mod error;
pub mod pay;
pub mod session;
pub mod traits;
pub mod types;
pub mod wire;

pub use alias::AliasResolver;
pub use eclair::EclairGateway;
pub use error::GatewayError;
pub use pay::{pay_via_route, PollConfig};
pub use session::Session;
pub use traits::NodeGateway;
pub use types::{
    FoundHop, FoundPath, Invoice, NodeAnnouncement, NodeInfo, PathRequest, PaymentId,
    PaymentStatus, Peer, PolicyUpdate,
};
