use serde::{Deserialize, Serialize};
use std::fmt;

/// A node identity: the hex-encoded compressed public key announced on the
/// network. Treated as an opaque string; equality is byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubKey(String);

impl PubKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PubKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A channel identifier. Eclair uses two forms: the short channel id
/// ("845000x12x1") once a channel is confirmed and announced, and the
/// funding-output channel id (hex) in commitment and audit data. Both are
/// opaque strings from our side; one newtype covers both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One direction's fee and timing terms for a channel, as carried by a
/// channel update. Always attached to a directional endpoint, never to the
/// channel as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// CLTV delta this node requires when forwarding over the channel.
    pub cltv_expiry_delta: u32,
    /// Smallest forwardable amount (msat).
    pub htlc_minimum_msat: u64,
    /// Largest forwardable amount (msat).
    pub htlc_maximum_msat: u64,
    /// Flat fee charged per forward (msat).
    pub fee_base_msat: u64,
    /// Proportional fee in parts per million.
    pub fee_proportional_millionths: u64,
    /// Whether the direction is currently enabled.
    pub enabled: bool,
    /// Unix timestamp of the update that carried this policy.
    pub timestamp: i64,
}

/// A currently (or formerly) open channel of the local node.
///
/// `node1_pub`/`node2_pub` follow the channel-announcement normalisation:
/// "node1" is the lexicographically first endpoint, not necessarily the local
/// node. `local_pubkey`/`remote_pubkey` carry the ownership view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Short channel id from the most recent channel update.
    pub chan_id: ChannelId,
    /// Funding-output channel id.
    pub channel_id: ChannelId,
    pub local_pubkey: PubKey,
    pub remote_pubkey: PubKey,
    pub node1_pub: PubKey,
    pub node2_pub: PubKey,
    /// Channel state as reported by the node ("NORMAL", "OFFLINE", ...).
    pub state: String,
    pub local_balance_sat: u64,
    pub remote_balance_sat: u64,
    pub local_reserve_sat: u64,
    pub remote_reserve_sat: u64,
    /// Always `local_balance_sat + remote_balance_sat`.
    pub capacity_sat: u64,
    /// The policy the local node last announced for its own direction,
    /// if a channel update has been emitted yet.
    pub channel_update: Option<RoutingPolicy>,
}

impl Channel {
    /// A channel is usable for routing only in the NORMAL state.
    pub fn is_active(&self) -> bool {
        self.state == "NORMAL"
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.chan_id, self.node1_pub, self.node2_pub)
    }
}

/// A channel announcement from the global listing, used as a fallback when a
/// channel id does not match any locally open channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDesc {
    #[serde(rename = "shortChannelId")]
    pub short_channel_id: ChannelId,
    #[serde(rename = "a")]
    pub node_a: PubKey,
    #[serde(rename = "b")]
    pub node_b: PubKey,
}

/// One endpoint of a graph edge together with that endpoint's outbound
/// policy over the channel, when an update has been observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointPolicy {
    pub pub_key: PubKey,
    pub policy: Option<RoutingPolicy>,
}

/// A channel viewed as a graph edge: both endpoint identities in announcement
/// order, each with its directional policy. An absent policy means no update
/// has ever been observed for that direction, which callers must treat as
/// "unroutable via local knowledge", not as zero fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub chan_id: ChannelId,
    pub endpoints: [EndpointPolicy; 2],
}

impl Edge {
    pub fn new(chan_id: ChannelId, node1: EndpointPolicy, node2: EndpointPolicy) -> Self {
        Self {
            chan_id,
            endpoints: [node1, node2],
        }
    }

    /// The endpoint entry whose identity equals `key`.
    pub fn endpoint(&self, key: &PubKey) -> Option<&EndpointPolicy> {
        self.endpoints.iter().find(|e| &e.pub_key == key)
    }

    /// The endpoint entry whose identity is NOT `key`.
    pub fn counterparty(&self, key: &PubKey) -> Option<&EndpointPolicy> {
        self.endpoints.iter().find(|e| &e.pub_key != key)
    }
}
