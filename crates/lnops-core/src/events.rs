use serde::{Deserialize, Serialize};

use crate::types::ChannelId;

/// A point in time as Eclair reports it: unix seconds plus the ISO rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    pub iso: String,
    pub unix: i64,
}

/// One part of an outgoing payment. All amounts are msat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentPart {
    pub amount: u64,
    pub fees_paid: u64,
    pub to_channel_id: ChannelId,
    pub timestamp: EventTime,
}

/// An outgoing payment within the audit window, keyed by payment hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentPayment {
    pub payment_hash: String,
    pub parts: Vec<SentPart>,
}

/// One part of an incoming payment. Amounts are msat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedPart {
    pub amount: u64,
    pub from_channel_id: ChannelId,
    pub timestamp: EventTime,
}

/// An incoming payment within the audit window, keyed by payment hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedPayment {
    pub payment_hash: String,
    pub parts: Vec<ReceivedPart>,
}

/// A payment forwarded by the local node. Already a complete unit; the fee
/// earned is `amount_in - amount_out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayedPayment {
    pub payment_hash: String,
    pub amount_in: u64,
    pub amount_out: u64,
    pub from_channel_id: ChannelId,
    pub to_channel_id: ChannelId,
    pub started_at: EventTime,
    pub settled_at: EventTime,
}

/// The raw audit listing for one time window, exactly as the node returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditReport {
    pub sent: Vec<SentPayment>,
    pub received: Vec<ReceivedPayment>,
    pub relayed: Vec<RelayedPayment>,
}
