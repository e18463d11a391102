use serde::{Deserialize, Serialize};
use std::fmt;

use lnops_core::events::EventTime;
use lnops_core::types::{ChannelId, PubKey, RoutingPolicy};

/// Identity of the local node, from `getinfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub node_id: PubKey,
    pub alias: String,
}

/// A node announcement from the global `nodes` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAnnouncement {
    pub node_id: PubKey,
    pub alias: String,
}

/// A directly connected peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub node_id: PubKey,
    pub state: String,
    #[serde(default)]
    pub alias: Option<String>,
}

/// A directional channel update as the node announces it (`allupdates`,
/// `channelUpdate`, oracle hop metadata). Field names are Eclair's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdate {
    pub short_channel_id: ChannelId,
    pub cltv_expiry_delta: u32,
    pub htlc_minimum_msat: u64,
    pub htlc_maximum_msat: u64,
    pub fee_base_msat: u64,
    pub fee_proportional_millionths: u64,
    pub channel_flags: ChannelFlags,
    pub timestamp: EventTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFlags {
    pub is_enabled: bool,
    pub is_node1: bool,
}

impl PolicyUpdate {
    /// Strip the wire envelope down to the directional policy.
    pub fn to_policy(&self) -> RoutingPolicy {
        RoutingPolicy {
            cltv_expiry_delta: self.cltv_expiry_delta,
            htlc_minimum_msat: self.htlc_minimum_msat,
            htlc_maximum_msat: self.htlc_maximum_msat,
            fee_base_msat: self.fee_base_msat,
            fee_proportional_millionths: self.fee_proportional_millionths,
            enabled: self.channel_flags.is_enabled,
            timestamp: self.timestamp.unix,
        }
    }
}

/// Request for the node's pathfinding oracle (`findroutebetweennodes`).
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub source: PubKey,
    pub target: PubKey,
    pub amount_msat: u64,
    pub ignore_node_ids: Vec<PubKey>,
    pub ignore_channel_ids: Vec<ChannelId>,
    /// Fee budget for the searched segment. May be negative when a caller
    /// pre-subtracts a spliced hop's fee; passed through as-is so the oracle
    /// decides feasibility.
    pub max_fee_msat: Option<i64>,
}

/// One hop of an oracle-proposed path (`format: full`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundHop {
    pub node_id: PubKey,
    pub next_node_id: PubKey,
    pub last_update: PolicyUpdate,
}

/// A complete oracle answer: the amount the path was computed for and its
/// ordered hops, starting at the requested source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundPath {
    pub amount: u64,
    pub hops: Vec<FoundHop>,
}

/// Identifier of a submitted payment (Eclair's `parentId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub String);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal and non-terminal payment states from `getsentinfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Settled { payment_preimage: String },
    Failed { reasons: Vec<String> },
}

/// A decoded invoice. Invoice internals are the node's concern; we carry the
/// fields the engine needs to submit a payment along a composed route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Destination node.
    pub node_id: PubKey,
    pub payment_hash: String,
    /// Invoice amount in msat.
    pub amount: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub expiry: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    pub min_final_cltv_expiry: u32,
    pub serialized: String,
}
