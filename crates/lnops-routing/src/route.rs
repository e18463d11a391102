use serde::{Deserialize, Serialize};

use lnops_core::types::{Channel, ChannelId, PubKey};
use lnops_gateway::FoundHop;

use crate::fees;

/// One traversal step of a route. Immutable once constructed; amounts are
/// msat with whole-satoshi values derived by truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hop {
    pub source: PubKey,
    pub target: PubKey,
    pub chan_id: ChannelId,
    pub chan_capacity_sat: u64,
    pub amt_to_forward_msat: u64,
    pub fee_msat: u64,
}

impl Hop {
    pub fn amt_to_forward_sat(&self) -> u64 {
        self.amt_to_forward_msat / 1000
    }

    pub fn fee_sat(&self) -> u64 {
        self.fee_msat / 1000
    }

    /// Convert an oracle hop, computing its fee with the shared truncating
    /// formula so our accounting matches the oracle's own.
    pub fn from_oracle(hop: &FoundHop, amt_to_forward_msat: u64) -> Self {
        let update = &hop.last_update;
        let fee_msat = fees::hop_fee_msat(&update.to_policy(), amt_to_forward_msat);
        Self {
            source: hop.node_id.clone(),
            target: hop.next_node_id.clone(),
            chan_id: update.short_channel_id.clone(),
            chan_capacity_sat: update.htlc_maximum_msat / 1000,
            amt_to_forward_msat,
            fee_msat,
        }
    }

    /// Build the splice hop for a pinned local channel. A pinned first hop
    /// leaves the local node toward the remote peer; a pinned last hop
    /// arrives at the local node from the remote peer.
    pub fn from_pinned_channel(
        channel: &Channel,
        amt_to_forward_msat: u64,
        fee_msat: u64,
        first: bool,
    ) -> Self {
        let (source, target) = if first {
            (channel.local_pubkey.clone(), channel.remote_pubkey.clone())
        } else {
            (channel.remote_pubkey.clone(), channel.local_pubkey.clone())
        };
        Self {
            source,
            target,
            chan_id: channel.chan_id.clone(),
            chan_capacity_sat: channel.capacity_sat,
            amt_to_forward_msat,
            fee_msat,
        }
    }
}

/// An ordered hop sequence for one payment attempt, payer-adjacent first.
/// Totals are fixed at construction: the total fee is the sum of hop fees
/// and the payer must fund the requested amount plus that fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub amount_msat: u64,
    pub hops: Vec<Hop>,
    pub total_fees_msat: u64,
    pub total_amount_msat: u64,
}

impl Route {
    pub fn new(amount_msat: u64, hops: Vec<Hop>) -> Self {
        let total_fees_msat = hops.iter().map(|h| h.fee_msat).sum();
        Self {
            amount_msat,
            hops,
            total_fees_msat,
            total_amount_msat: amount_msat + total_fees_msat,
        }
    }

    pub fn total_fees_sat(&self) -> u64 {
        self.total_fees_msat / 1000
    }

    pub fn total_amount_sat(&self) -> u64 {
        self.total_amount_msat / 1000
    }

    /// The channel sequence, as submitted to the node for payment.
    pub fn short_channel_ids(&self) -> Vec<ChannelId> {
        self.hops.iter().map(|h| h.chan_id.clone()).collect()
    }
}
