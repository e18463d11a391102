//! Audit reconciliation for lnops.
//!
//! Takes the raw sent/received/relayed event listing from the node and
//! derives activity records: sent+received pairs sharing a payment hash
//! become rebalances ("the node paid itself through two channels"), relay
//! events pass through with their fee derived. Pure computation — no I/O.

pub mod error;
pub mod reconcile;

pub use error::AuditError;
pub use reconcile::{reconcile, AuditSummary, Rebalance, Relay};
