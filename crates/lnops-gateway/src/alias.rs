use std::collections::HashMap;

use lnops_core::types::{ChannelId, PubKey};

use crate::error::GatewayError;
use crate::traits::NodeGateway;

/// Per-session node and channel labelling.
///
/// Built once from the gateway (own info, peer list, node announcements,
/// channel list) and then consulted without further I/O. Lookup order for a
/// node label: peer-announced alias, network-announced alias, the channel's
/// short id, the raw node id.
pub struct AliasResolver {
    own_node: PubKey,
    own_alias: String,
    peer_aliases: HashMap<PubKey, String>,
    network_aliases: HashMap<PubKey, String>,
    /// funding channel id -> (short channel id, remote node)
    channels: HashMap<ChannelId, (ChannelId, PubKey)>,
}

impl AliasResolver {
    pub async fn load(gateway: &dyn NodeGateway) -> Result<Self, GatewayError> {
        let info = gateway.get_info().await?;

        let mut peer_aliases = HashMap::new();
        for peer in gateway.list_peers().await? {
            if let Some(alias) = peer.alias {
                peer_aliases.insert(peer.node_id, alias);
            }
        }

        let mut network_aliases = HashMap::new();
        for node in gateway.list_nodes().await? {
            network_aliases.insert(node.node_id, node.alias);
        }

        let mut channels = HashMap::new();
        for channel in gateway.list_channels(false).await? {
            channels.insert(
                channel.channel_id.clone(),
                (channel.chan_id.clone(), channel.remote_pubkey.clone()),
            );
        }

        tracing::debug!(
            peers = peer_aliases.len(),
            nodes = network_aliases.len(),
            channels = channels.len(),
            "alias resolver loaded"
        );

        Ok(Self {
            own_node: info.node_id,
            own_alias: info.alias,
            peer_aliases,
            network_aliases,
            channels,
        })
    }

    /// The remote endpoint of a local channel, by funding channel id.
    pub fn node_for_channel(&self, channel_id: &ChannelId) -> Option<&PubKey> {
        self.channels.get(channel_id).map(|(_, node)| node)
    }

    /// Best known alias for a node, if any.
    pub fn node_alias(&self, node: &PubKey) -> Option<&str> {
        if node == &self.own_node {
            return Some(&self.own_alias);
        }
        if let Some(alias) = self.peer_aliases.get(node) {
            // A peer "alias" that just repeats the node id carries no info.
            if alias != node.as_str() {
                return Some(alias);
            }
        }
        self.network_aliases.get(node).map(String::as_str)
    }

    /// Human-usable label for a channel referenced in audit events.
    pub fn channel_label(&self, channel_id: &ChannelId) -> String {
        match self.channels.get(channel_id) {
            Some((short_id, node)) => self
                .node_alias(node)
                .map(str::to_string)
                .unwrap_or_else(|| short_id.to_string()),
            None => channel_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AliasResolver {
        let mut peer_aliases = HashMap::new();
        peer_aliases.insert(PubKey::from("03bb"), "bob".to_string());
        // Degenerate peer alias equal to the node id.
        peer_aliases.insert(PubKey::from("04cc"), "04cc".to_string());

        let mut network_aliases = HashMap::new();
        network_aliases.insert(PubKey::from("04cc"), "carol".to_string());

        let mut channels = HashMap::new();
        channels.insert(
            ChannelId::from("f00d"),
            (ChannelId::from("845000x12x1"), PubKey::from("03bb")),
        );
        channels.insert(
            ChannelId::from("beef"),
            (ChannelId::from("845001x3x0"), PubKey::from("05dd")),
        );

        AliasResolver {
            own_node: PubKey::from("02aa"),
            own_alias: "local".into(),
            peer_aliases,
            network_aliases,
            channels,
        }
    }

    #[test]
    fn test_alias_fallback_chain() {
        let r = resolver();
        assert_eq!(r.node_alias(&PubKey::from("02aa")), Some("local"));
        assert_eq!(r.node_alias(&PubKey::from("03bb")), Some("bob"));
        // Peer alias equal to the node id falls through to the network alias.
        assert_eq!(r.node_alias(&PubKey::from("04cc")), Some("carol"));
        assert_eq!(r.node_alias(&PubKey::from("05dd")), None);
    }

    #[test]
    fn test_channel_label() {
        let r = resolver();
        assert_eq!(r.channel_label(&ChannelId::from("f00d")), "bob");
        // Known channel, unknown node alias: short channel id.
        assert_eq!(r.channel_label(&ChannelId::from("beef")), "845001x3x0");
        // Unknown channel: the raw id.
        assert_eq!(r.channel_label(&ChannelId::from("cafe")), "cafe");
    }
}
