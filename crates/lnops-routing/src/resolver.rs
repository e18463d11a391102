use lnops_core::types::{Channel, ChannelId, Edge, EndpointPolicy, PubKey, RoutingPolicy};
use lnops_gateway::NodeGateway;

use crate::error::RoutingError;
use crate::fees;

/// Resolves channel ids into graph edges and directional policies, relative
/// to the local node's identity.
///
/// "Toward local" is the policy the remote endpoint publishes for traffic
/// arriving at us over the channel; "away from local" is the policy we
/// publish ourselves. An absent policy means no update has been observed for
/// that direction and the channel must be treated as unroutable via local
/// knowledge, never as free.
pub struct EdgeResolver<'a> {
    gateway: &'a dyn NodeGateway,
    local_node: PubKey,
}

impl<'a> EdgeResolver<'a> {
    pub fn new(gateway: &'a dyn NodeGateway, local_node: PubKey) -> Self {
        Self {
            gateway,
            local_node,
        }
    }

    pub fn local_node(&self) -> &PubKey {
        &self.local_node
    }

    /// The local channel with this short channel id, if open.
    pub async fn channel_by_id(
        &self,
        chan_id: &ChannelId,
    ) -> Result<Option<Channel>, RoutingError> {
        let channels = self.gateway.list_channels(false).await?;
        Ok(channels.into_iter().find(|ch| &ch.chan_id == chan_id))
    }

    /// The policy `node` announces for this channel, if any update has been
    /// observed. For the local node that is the channel's own last update;
    /// for a remote node, its most recent update set is scanned by channel id.
    async fn policy_announced_by(
        &self,
        node: &PubKey,
        chan_id: &ChannelId,
    ) -> Result<Option<RoutingPolicy>, RoutingError> {
        if node == &self.local_node {
            return Ok(self
                .channel_by_id(chan_id)
                .await?
                .and_then(|ch| ch.channel_update));
        }
        let updates = self.gateway.policy_updates(node).await?;
        Ok(updates
            .iter()
            .find(|u| &u.short_channel_id == chan_id)
            .map(|u| u.to_policy()))
    }

    /// Resolve a channel into an edge: endpoint identities plus both
    /// directional policies. Falls back to the global announcement listing
    /// for the endpoints when the channel is not locally open (policies may
    /// then still be unknown).
    pub async fn resolve_edge(&self, chan_id: &ChannelId) -> Result<Option<Edge>, RoutingError> {
        let (node1, node2) = match self.channel_by_id(chan_id).await? {
            Some(channel) => (channel.node1_pub, channel.node2_pub),
            None => {
                let descs = self.gateway.list_edges().await?;
                match descs.into_iter().find(|d| &d.short_channel_id == chan_id) {
                    Some(desc) => (desc.node_a, desc.node_b),
                    None => return Ok(None),
                }
            }
        };

        let policy1 = self.policy_announced_by(&node1, chan_id).await?;
        let policy2 = self.policy_announced_by(&node2, chan_id).await?;
        Ok(Some(Edge::new(
            chan_id.clone(),
            EndpointPolicy {
                pub_key: node1,
                policy: policy1,
            },
            EndpointPolicy {
                pub_key: node2,
                policy: policy2,
            },
        )))
    }

    /// Policy applying to payments arriving at the local node over this
    /// channel: the remote endpoint's outbound policy.
    pub async fn policy_toward_local(
        &self,
        chan_id: &ChannelId,
    ) -> Result<Option<RoutingPolicy>, RoutingError> {
        let edge = self
            .resolve_edge(chan_id)
            .await?
            .ok_or_else(|| RoutingError::ChannelNotFound {
                chan_id: chan_id.clone(),
            })?;
        Ok(edge
            .counterparty(&self.local_node)
            .and_then(|e| e.policy.clone()))
    }

    /// Policy the local node publishes for outbound use over this channel.
    pub async fn policy_away_from_local(
        &self,
        chan_id: &ChannelId,
    ) -> Result<Option<RoutingPolicy>, RoutingError> {
        let edge = self
            .resolve_edge(chan_id)
            .await?
            .ok_or_else(|| RoutingError::ChannelNotFound {
                chan_id: chan_id.clone(),
            })?;
        Ok(edge
            .endpoint(&self.local_node)
            .and_then(|e| e.policy.clone()))
    }

    /// Proportional fee rate (ppm) charged toward the local node.
    pub async fn ppm_toward_local(
        &self,
        chan_id: &ChannelId,
    ) -> Result<Option<u64>, RoutingError> {
        Ok(self
            .policy_toward_local(chan_id)
            .await?
            .map(|p| p.fee_proportional_millionths))
    }

    /// Proportional fee rate (ppm) the local node charges outbound.
    pub async fn ppm_away_from_local(
        &self,
        chan_id: &ChannelId,
    ) -> Result<Option<u64>, RoutingError> {
        Ok(self
            .policy_away_from_local(chan_id)
            .await?
            .map(|p| p.fee_proportional_millionths))
    }

    /// Fee the channel's remote endpoint charges to forward `amount_msat`
    /// onward to us — the last-hop fee of a composed route. An unknown
    /// policy is an error here, not zero.
    pub async fn forwarding_fee_msat(
        &self,
        chan_id: &ChannelId,
        amount_msat: u64,
    ) -> Result<u64, RoutingError> {
        let policy = self.policy_toward_local(chan_id).await?.ok_or_else(|| {
            RoutingError::PolicyUnknown {
                chan_id: chan_id.clone(),
            }
        })?;
        Ok(fees::hop_fee_msat(&policy, amount_msat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use lnops_core::events::{AuditReport, EventTime};
    use lnops_core::types::ChannelDesc;
    use lnops_gateway::types::{ChannelFlags, PolicyUpdate};
    use lnops_gateway::{
        FoundPath, GatewayError, Invoice, NodeAnnouncement, NodeInfo, PathRequest, PaymentId,
        PaymentStatus, Peer,
    };

    const LOCAL: &str = "02local";

    fn update(chan: &str, base: u64, ppm: u64) -> PolicyUpdate {
        PolicyUpdate {
            short_channel_id: ChannelId::from(chan),
            cltv_expiry_delta: 40,
            htlc_minimum_msat: 1,
            htlc_maximum_msat: 990_000_000,
            fee_base_msat: base,
            fee_proportional_millionths: ppm,
            channel_flags: ChannelFlags {
                is_enabled: true,
                is_node1: true,
            },
            timestamp: EventTime {
                iso: "2024-05-01T10:00:00Z".into(),
                unix: 1_714_557_600,
            },
        }
    }

    fn channel(chan: &str, remote: &str, own_policy: Option<RoutingPolicy>) -> Channel {
        Channel {
            chan_id: ChannelId::from(chan),
            channel_id: ChannelId::from(&*format!("funding-{chan}")),
            local_pubkey: PubKey::from(LOCAL),
            remote_pubkey: PubKey::from(remote),
            node1_pub: PubKey::from(LOCAL),
            node2_pub: PubKey::from(remote),
            state: "NORMAL".into(),
            local_balance_sat: 600_000,
            remote_balance_sat: 400_000,
            local_reserve_sat: 10_000,
            remote_reserve_sat: 10_000,
            capacity_sat: 1_000_000,
            channel_update: own_policy,
        }
    }

    struct StaticGateway {
        channels: Vec<Channel>,
        edges: Vec<ChannelDesc>,
        updates: HashMap<PubKey, Vec<PolicyUpdate>>,
    }

    #[async_trait]
    impl NodeGateway for StaticGateway {
        async fn get_info(&self) -> Result<NodeInfo, GatewayError> {
            unimplemented!()
        }

        async fn list_nodes(&self) -> Result<Vec<NodeAnnouncement>, GatewayError> {
            unimplemented!()
        }

        async fn list_peers(&self) -> Result<Vec<Peer>, GatewayError> {
            unimplemented!()
        }

        async fn list_channels(&self, active_only: bool) -> Result<Vec<Channel>, GatewayError> {
            Ok(self
                .channels
                .iter()
                .filter(|ch| !active_only || ch.is_active())
                .cloned()
                .collect())
        }

        async fn list_edges(&self) -> Result<Vec<ChannelDesc>, GatewayError> {
            Ok(self.edges.clone())
        }

        async fn policy_updates(
            &self,
            node_id: &PubKey,
        ) -> Result<Vec<PolicyUpdate>, GatewayError> {
            Ok(self.updates.get(node_id).cloned().unwrap_or_default())
        }

        async fn find_path(&self, _request: &PathRequest) -> Result<Vec<FoundPath>, GatewayError> {
            unimplemented!()
        }

        async fn submit_payment(
            &self,
            _short_channel_ids: &[ChannelId],
            _invoice: &Invoice,
        ) -> Result<PaymentId, GatewayError> {
            unimplemented!()
        }

        async fn payment_status(&self, _id: &PaymentId) -> Result<PaymentStatus, GatewayError> {
            unimplemented!()
        }

        async fn audit(&self, _from: i64, _to: Option<i64>) -> Result<AuditReport, GatewayError> {
            unimplemented!()
        }

        async fn generate_invoice(
            &self,
            _description: &str,
            _amount_msat: u64,
        ) -> Result<Invoice, GatewayError> {
            unimplemented!()
        }

        async fn parse_invoice(&self, _serialized: &str) -> Result<Invoice, GatewayError> {
            unimplemented!()
        }
    }

    /// Local channel to alice ("700x1x0") with our own outbound policy;
    /// a purely remote channel between alice and bob ("900x1x0") known only
    /// from announcements; alice publishes updates for both.
    fn gateway() -> StaticGateway {
        let local = channel("700x1x0", "03alice", Some(update("700x1x0", 500, 50).to_policy()));
        let mut updates = HashMap::new();
        updates.insert(
            PubKey::from("03alice"),
            vec![update("700x1x0", 1000, 100), update("900x1x0", 2000, 200)],
        );
        updates.insert(PubKey::from("03bob"), vec![update("900x1x0", 3000, 300)]);
        StaticGateway {
            channels: vec![local],
            edges: vec![ChannelDesc {
                short_channel_id: ChannelId::from("900x1x0"),
                node_a: PubKey::from("03alice"),
                node_b: PubKey::from("03bob"),
            }],
            updates,
        }
    }

    fn resolver(gateway: &StaticGateway) -> EdgeResolver<'_> {
        EdgeResolver::new(gateway, PubKey::from(LOCAL))
    }

    #[tokio::test]
    async fn test_resolve_edge_local_channel() {
        let gateway = gateway();
        let edge = resolver(&gateway)
            .resolve_edge(&ChannelId::from("700x1x0"))
            .await
            .unwrap()
            .unwrap();

        // Our direction comes from the channel's own last update; alice's
        // from her announced update set.
        let ours = edge.endpoint(&PubKey::from(LOCAL)).unwrap();
        assert_eq!(ours.policy.as_ref().unwrap().fee_base_msat, 500);
        let theirs = edge.endpoint(&PubKey::from("03alice")).unwrap();
        assert_eq!(theirs.policy.as_ref().unwrap().fee_base_msat, 1000);
    }

    #[tokio::test]
    async fn test_resolve_edge_announcement_fallback() {
        // "900x1x0" is not locally open; endpoints come from the global
        // listing and both policies from the endpoints' update sets.
        let gateway = gateway();
        let edge = resolver(&gateway)
            .resolve_edge(&ChannelId::from("900x1x0"))
            .await
            .unwrap()
            .unwrap();

        let alice = edge.endpoint(&PubKey::from("03alice")).unwrap();
        assert_eq!(alice.policy.as_ref().unwrap().fee_base_msat, 2000);
        let bob = edge.endpoint(&PubKey::from("03bob")).unwrap();
        assert_eq!(bob.policy.as_ref().unwrap().fee_base_msat, 3000);
    }

    #[tokio::test]
    async fn test_resolve_edge_unknown_channel() {
        let gateway = gateway();
        let edge = resolver(&gateway)
            .resolve_edge(&ChannelId::from("999x9x9"))
            .await
            .unwrap();
        assert!(edge.is_none());
    }

    #[tokio::test]
    async fn test_directional_policy_selection() {
        let gateway = gateway();
        let r = resolver(&gateway);
        let chan = ChannelId::from("700x1x0");

        // Toward local: alice's outbound policy. Away: our own.
        let toward = r.policy_toward_local(&chan).await.unwrap().unwrap();
        assert_eq!(toward.fee_base_msat, 1000);
        let away = r.policy_away_from_local(&chan).await.unwrap().unwrap();
        assert_eq!(away.fee_base_msat, 500);

        assert_eq!(r.ppm_toward_local(&chan).await.unwrap(), Some(100));
        assert_eq!(r.ppm_away_from_local(&chan).await.unwrap(), Some(50));
    }

    #[tokio::test]
    async fn test_missing_update_is_none_not_zero() {
        // Channel to carol with no update observed in either direction.
        let mut gateway = gateway();
        gateway.channels.push(channel("700x2x0", "03carol", None));

        let r = resolver(&gateway);
        let chan = ChannelId::from("700x2x0");
        assert!(r.policy_toward_local(&chan).await.unwrap().is_none());
        assert!(r.policy_away_from_local(&chan).await.unwrap().is_none());

        // An unknown fee must surface as an error, never as zero.
        let err = r.forwarding_fee_msat(&chan, 5_000_000).await.unwrap_err();
        assert!(matches!(err, RoutingError::PolicyUnknown { .. }));
    }

    #[tokio::test]
    async fn test_forwarding_fee_uses_toward_policy() {
        let gateway = gateway();
        let fee = resolver(&gateway)
            .forwarding_fee_msat(&ChannelId::from("700x1x0"), 5_000_000)
            .await
            .unwrap();
        // Alice's policy: 1000 + 5_000_000 * 100 / 1_000_000.
        assert_eq!(fee, 1500);
    }
}
