use lnops_core::types::ChannelId;
use lnops_gateway::GatewayError;

/// Errors that can occur while composing routes.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("channel not found: {chan_id}")]
    ChannelNotFound { chan_id: ChannelId },

    #[error("no policy update observed for channel {chan_id} in the required direction")]
    PolicyUnknown { chan_id: ChannelId },

    #[error("oracle path does not start at the pinned first hop: expected {expected}, got {got}")]
    InconsistentResponse {
        expected: ChannelId,
        got: ChannelId,
    },

    #[error("oracle returned a path with no hops")]
    EmptyPath,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
