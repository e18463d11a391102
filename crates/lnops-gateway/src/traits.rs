use async_trait::async_trait;

use lnops_core::events::AuditReport;
use lnops_core::types::{Channel, ChannelDesc, ChannelId, PubKey};

use crate::error::GatewayError;
use crate::types::{
    FoundPath, Invoice, NodeAnnouncement, NodeInfo, PathRequest, PaymentId, PaymentStatus, Peer,
    PolicyUpdate,
};

/// The node gateway contract: every interaction the engine has with the
/// underlying Lightning node.
///
/// All operations are synchronous request/response from the engine's point
/// of view — one call, one answer, no background state. Implementations are
/// the HTTP client ([`crate::EclairGateway`]), the per-invocation memoizing
/// wrapper ([`crate::Session`]), and test doubles.
#[async_trait]
pub trait NodeGateway: Send + Sync {
    /// Identity and alias of the local node.
    async fn get_info(&self) -> Result<NodeInfo, GatewayError>;

    /// All node announcements known to the local node.
    async fn list_nodes(&self) -> Result<Vec<NodeAnnouncement>, GatewayError>;

    /// Directly connected peers.
    async fn list_peers(&self) -> Result<Vec<Peer>, GatewayError>;

    /// Local channels. With `active_only`, only channels in the NORMAL state.
    async fn list_channels(&self, active_only: bool) -> Result<Vec<Channel>, GatewayError>;

    /// Global channel announcements: the fallback source of endpoint
    /// identities for channels we do not hold ourselves.
    async fn list_edges(&self) -> Result<Vec<ChannelDesc>, GatewayError>;

    /// The most recent set of directional channel updates announced by a
    /// node, across all of its channels.
    async fn policy_updates(&self, node_id: &PubKey) -> Result<Vec<PolicyUpdate>, GatewayError>;

    /// Ask the pathfinding oracle for paths between two nodes. An empty
    /// vector means "no path" and is not an error.
    async fn find_path(&self, request: &PathRequest) -> Result<Vec<FoundPath>, GatewayError>;

    /// Submit a payment along an explicit channel sequence.
    async fn submit_payment(
        &self,
        short_channel_ids: &[ChannelId],
        invoice: &Invoice,
    ) -> Result<PaymentId, GatewayError>;

    /// Current status of a previously submitted payment.
    async fn payment_status(&self, id: &PaymentId) -> Result<PaymentStatus, GatewayError>;

    /// Raw payment-event history: sent, received, and relayed, bounded below
    /// by `from` (unix seconds) and optionally above by `to`.
    async fn audit(&self, from: i64, to: Option<i64>) -> Result<AuditReport, GatewayError>;

    /// Create an invoice on the local node.
    async fn generate_invoice(
        &self,
        description: &str,
        amount_msat: u64,
    ) -> Result<Invoice, GatewayError>;

    /// Decode a serialized invoice.
    async fn parse_invoice(&self, serialized: &str) -> Result<Invoice, GatewayError>;
}
