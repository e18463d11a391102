//! Serde mappings for the Eclair REST responses whose shape differs from the
//! domain model. Field names here are Eclair's wire contract and must stay
//! byte-for-byte.

use serde::Deserialize;

use lnops_core::types::{Channel, ChannelId, PubKey};

use crate::types::PolicyUpdate;

/// One entry of the `channels` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelJson {
    /// Remote peer.
    pub node_id: PubKey,
    pub channel_id: ChannelId,
    pub state: String,
    pub data: ChannelData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelData {
    pub commitments: Commitments,
    #[serde(default)]
    pub channel_update: Option<PolicyUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitments {
    pub local_params: LocalParams,
    pub remote_params: RemoteParams,
    pub local_commit: LocalCommit,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalParams {
    pub node_id: PubKey,
    pub channel_reserve: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteParams {
    pub channel_reserve: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCommit {
    pub spec: CommitSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSpec {
    /// Local balance, msat.
    pub to_local: u64,
    /// Remote balance, msat.
    pub to_remote: u64,
}

impl ChannelJson {
    /// Flatten the commitment tree into the domain [`Channel`].
    ///
    /// Without a channel update yet (young channel), the short channel id
    /// falls back to the funding channel id, and node1/node2 fall back to
    /// the announcement normalisation (lexicographic endpoint order).
    pub fn into_channel(self) -> Channel {
        let local_pubkey = self.data.commitments.local_params.node_id.clone();
        let remote_pubkey = self.node_id.clone();

        let local_balance_sat = self.data.commitments.local_commit.spec.to_local / 1000;
        let remote_balance_sat = self.data.commitments.local_commit.spec.to_remote / 1000;

        let (chan_id, node1_pub, node2_pub, channel_update) = match &self.data.channel_update {
            Some(update) => {
                let (node1, node2) = if update.channel_flags.is_node1 {
                    (local_pubkey.clone(), remote_pubkey.clone())
                } else {
                    (remote_pubkey.clone(), local_pubkey.clone())
                };
                (
                    update.short_channel_id.clone(),
                    node1,
                    node2,
                    Some(update.to_policy()),
                )
            }
            None => {
                let (node1, node2) = if local_pubkey.as_str() <= remote_pubkey.as_str() {
                    (local_pubkey.clone(), remote_pubkey.clone())
                } else {
                    (remote_pubkey.clone(), local_pubkey.clone())
                };
                (self.channel_id.clone(), node1, node2, None)
            }
        };

        Channel {
            chan_id,
            channel_id: self.channel_id,
            local_pubkey,
            remote_pubkey,
            node1_pub,
            node2_pub,
            state: self.state,
            local_balance_sat,
            remote_balance_sat,
            local_reserve_sat: self.data.commitments.local_params.channel_reserve,
            remote_reserve_sat: self.data.commitments.remote_params.channel_reserve,
            capacity_sat: local_balance_sat + remote_balance_sat,
            channel_update,
        }
    }
}

/// Envelope of the `findroutebetweennodes` response (`format: full`).
#[derive(Debug, Clone, Deserialize)]
pub struct FoundRoutes {
    pub routes: Vec<crate::types::FoundPath>,
}

/// Envelope of the `sendtoroute` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendToRouteResponse {
    pub parent_id: String,
}

/// One attempt entry of the `getsentinfo` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SentAttempt {
    pub status: SentStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentStatus {
    #[serde(rename = "type")]
    pub status_type: String,
    #[serde(default)]
    pub payment_preimage: Option<String>,
    #[serde(default)]
    pub failures: Option<Vec<SentFailure>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentFailure {
    pub failure_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL_JSON: &str = r#"{
        "nodeId": "03bb",
        "channelId": "f00d",
        "state": "NORMAL",
        "data": {
            "commitments": {
                "localParams": {"nodeId": "02aa", "channelReserve": 10000},
                "remoteParams": {"channelReserve": 10000},
                "localCommit": {"spec": {"toLocal": 600000000, "toRemote": 400000000}}
            },
            "channelUpdate": {
                "shortChannelId": "845000x12x1",
                "cltvExpiryDelta": 40,
                "htlcMinimumMsat": 1,
                "htlcMaximumMsat": 990000000,
                "feeBaseMsat": 1000,
                "feeProportionalMillionths": 150,
                "channelFlags": {"isEnabled": true, "isNode1": true},
                "timestamp": {"iso": "2024-05-01T10:00:00Z", "unix": 1714557600}
            }
        }
    }"#;

    #[test]
    fn test_channel_json_flattening() {
        let parsed: ChannelJson = serde_json::from_str(CHANNEL_JSON).unwrap();
        let channel = parsed.into_channel();

        assert_eq!(channel.chan_id.as_str(), "845000x12x1");
        assert_eq!(channel.channel_id.as_str(), "f00d");
        assert_eq!(channel.local_pubkey.as_str(), "02aa");
        assert_eq!(channel.remote_pubkey.as_str(), "03bb");
        // isNode1 = true puts the local node first.
        assert_eq!(channel.node1_pub.as_str(), "02aa");
        assert_eq!(channel.node2_pub.as_str(), "03bb");
        assert_eq!(channel.local_balance_sat, 600_000);
        assert_eq!(channel.remote_balance_sat, 400_000);
        assert_eq!(channel.capacity_sat, 1_000_000);
        assert!(channel.is_active());
        assert_eq!(channel.channel_update.unwrap().fee_base_msat, 1000);
    }

    #[test]
    fn test_channel_json_without_update() {
        let raw = r#"{
            "nodeId": "01bb",
            "channelId": "f00d",
            "state": "WAIT_FOR_FUNDING_CONFIRMED",
            "data": {
                "commitments": {
                    "localParams": {"nodeId": "02aa", "channelReserve": 0},
                    "remoteParams": {"channelReserve": 0},
                    "localCommit": {"spec": {"toLocal": 1000000, "toRemote": 0}}
                }
            }
        }"#;
        let channel: Channel = serde_json::from_str::<ChannelJson>(raw)
            .unwrap()
            .into_channel();
        // Falls back to the funding id and lexicographic endpoint order.
        assert_eq!(channel.chan_id.as_str(), "f00d");
        assert_eq!(channel.node1_pub.as_str(), "01bb");
        assert_eq!(channel.node2_pub.as_str(), "02aa");
        assert!(channel.channel_update.is_none());
        assert!(!channel.is_active());
    }

    #[test]
    fn test_sent_status_variants() {
        let pending: SentAttempt =
            serde_json::from_str(r#"{"status": {"type": "pending"}}"#).unwrap();
        assert_eq!(pending.status.status_type, "pending");

        let failed: SentAttempt = serde_json::from_str(
            r#"{"status": {"type": "failed", "failures": [{"failureMessage": "no route"}]}}"#,
        )
        .unwrap();
        assert_eq!(
            failed.status.failures.unwrap()[0].failure_message,
            "no route"
        );
    }
}
