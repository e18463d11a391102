//! Route composition for lnops.
//!
//! This crate turns hop constraints into payable routes:
//! - [`EdgeResolver`] — resolves a channel id into a graph edge and selects
//!   the directional policy toward or away from the local node.
//! - [`fees`] — the pure fee arithmetic shared with the node's own
//!   convention (truncating base + proportional formula).
//! - [`Hop`] and [`Route`] — the spliced result with msat/sat accounting.
//! - [`RouteComposer`] — pins a first and/or last hop, queries the node's
//!   pathfinding oracle for the middle segment, and splices and validates
//!   the result.

pub mod composer;
pub mod error;
pub mod fees;
pub mod resolver;
pub mod route;

pub use composer::{ComposeRequest, RouteComposer};
pub use error::RoutingError;
pub use resolver::EdgeResolver;
pub use route::{Hop, Route};
