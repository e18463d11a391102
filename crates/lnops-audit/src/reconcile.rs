use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lnops_core::events::{AuditReport, EventTime, ReceivedPayment, RelayedPayment, SentPayment};
use lnops_core::types::ChannelId;

use crate::error::AuditError;

/// A sent+received pair sharing one payment hash: the node paid itself out
/// through one channel and back in through another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rebalance {
    pub payment_hash: String,
    /// Departure of the outbound payment's earliest part.
    pub sent_at: EventTime,
    /// Arrival of the inbound payment's latest part — the completion time.
    pub received_at: EventTime,
    pub amount_sent_msat: u64,
    pub amount_received_msat: u64,
    /// Total fees paid across the outbound parts.
    pub fees_msat: u64,
    /// `sent_at - received_at` in seconds, signed. Clock skew between the
    /// two sides can make this negative; it is preserved, not clamped.
    pub latency_secs: i64,
    /// Channel the payment left through.
    pub out_channel: ChannelId,
    /// Channel the payment came back through.
    pub in_channel: ChannelId,
}

/// A forwarded payment, passed through with its fee derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relay {
    pub payment_hash: String,
    pub started_at: EventTime,
    pub settled_at: EventTime,
    pub amount_out_msat: u64,
    /// `amount_in - amount_out`, signed so a malformed listing surfaces
    /// as a negative fee instead of being masked.
    pub fee_msat: i64,
    pub in_channel: ChannelId,
    pub out_channel: ChannelId,
    pub latency_secs: i64,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Sorted ascending by received-side completion time.
    pub rebalances: Vec<Rebalance>,
    pub relays: Vec<Relay>,
}

/// Reconcile a raw audit listing into rebalance and relay records.
///
/// Sent and received entries are grouped by payment hash; a hash present on
/// both sides is a rebalance. Entries violating the single-channel-per-
/// payment assumption or duplicated within one direction fail the pass —
/// they are never silently merged or overwritten.
pub fn reconcile(report: &AuditReport) -> Result<AuditSummary, AuditError> {
    let mut sent_by_hash: HashMap<&str, &SentPayment> = HashMap::new();
    for sent in &report.sent {
        if sent_by_hash
            .insert(sent.payment_hash.as_str(), sent)
            .is_some()
        {
            return Err(AuditError::DuplicateHash {
                payment_hash: sent.payment_hash.clone(),
                direction: "sent",
            });
        }
    }

    let mut received_by_hash: HashMap<&str, &ReceivedPayment> = HashMap::new();
    for received in &report.received {
        if received_by_hash
            .insert(received.payment_hash.as_str(), received)
            .is_some()
        {
            return Err(AuditError::DuplicateHash {
                payment_hash: received.payment_hash.clone(),
                direction: "received",
            });
        }
    }

    let mut rebalances = Vec::new();
    for (hash, received) in &received_by_hash {
        if let Some(sent) = sent_by_hash.get(hash) {
            rebalances.push(pair_rebalance(sent, received)?);
        }
    }
    rebalances.sort_by_key(|r| r.received_at.unix);

    let relays = report.relayed.iter().map(map_relay).collect();

    tracing::debug!(
        rebalances = rebalances.len(),
        relays = report.relayed.len(),
        "audit reconciled"
    );

    Ok(AuditSummary { rebalances, relays })
}

fn pair_rebalance(sent: &SentPayment, received: &ReceivedPayment) -> Result<Rebalance, AuditError> {
    let sent_at = sent
        .parts
        .iter()
        .min_by_key(|p| p.timestamp.unix)
        .map(|p| p.timestamp.clone())
        .ok_or_else(|| AuditError::EmptyEntry {
            payment_hash: sent.payment_hash.clone(),
            direction: "sent",
        })?;
    let received_at = received
        .parts
        .iter()
        .max_by_key(|p| p.timestamp.unix)
        .map(|p| p.timestamp.clone())
        .ok_or_else(|| AuditError::EmptyEntry {
            payment_hash: received.payment_hash.clone(),
            direction: "received",
        })?;

    let out_channel = single_channel(
        sent.parts.iter().map(|p| &p.to_channel_id),
        &sent.payment_hash,
        "sent",
    )?;
    let in_channel = single_channel(
        received.parts.iter().map(|p| &p.from_channel_id),
        &received.payment_hash,
        "received",
    )?;

    Ok(Rebalance {
        payment_hash: sent.payment_hash.clone(),
        latency_secs: sent_at.unix - received_at.unix,
        sent_at,
        received_at,
        amount_sent_msat: sent.parts.iter().map(|p| p.amount).sum(),
        amount_received_msat: received.parts.iter().map(|p| p.amount).sum(),
        fees_msat: sent.parts.iter().map(|p| p.fees_paid).sum(),
        out_channel,
        in_channel,
    })
}

/// All parts of one payment must enter or leave through the same channel.
fn single_channel<'a>(
    mut channels: impl Iterator<Item = &'a ChannelId>,
    payment_hash: &str,
    direction: &'static str,
) -> Result<ChannelId, AuditError> {
    let first = channels.next().ok_or_else(|| AuditError::EmptyEntry {
        payment_hash: payment_hash.to_string(),
        direction,
    })?;
    for channel in channels {
        if channel != first {
            return Err(AuditError::MultiPathUnsupported {
                payment_hash: payment_hash.to_string(),
                direction,
            });
        }
    }
    Ok(first.clone())
}

fn map_relay(relayed: &RelayedPayment) -> Relay {
    Relay {
        payment_hash: relayed.payment_hash.clone(),
        started_at: relayed.started_at.clone(),
        settled_at: relayed.settled_at.clone(),
        amount_out_msat: relayed.amount_out,
        fee_msat: relayed.amount_in as i64 - relayed.amount_out as i64,
        in_channel: relayed.from_channel_id.clone(),
        out_channel: relayed.to_channel_id.clone(),
        latency_secs: relayed.settled_at.unix - relayed.started_at.unix,
    }
}
