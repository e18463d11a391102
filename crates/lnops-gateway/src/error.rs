/// Errors raised at the node gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node RPC error: {0}")]
    Rpc(String),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    #[error("payment failed: {}", reasons.join(", "))]
    PaymentFailed { reasons: Vec<String> },

    #[error("payment still pending after {attempts} status polls")]
    PollTimeout { attempts: u32 },
}

impl GatewayError {
    /// True for the distinguished node errors that mean "no usable path for
    /// this request" rather than a real failure. The routing layer treats
    /// these as an empty pathfinding result.
    pub fn is_route_unavailable(&self) -> bool {
        match self {
            Self::Rpc(message) => {
                let message = message.to_ascii_lowercase();
                message.contains("route not found") || message.contains("balance too low")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_unavailable_classification() {
        assert!(GatewayError::Rpc("route not found".into()).is_route_unavailable());
        assert!(GatewayError::Rpc("Balance too low".into()).is_route_unavailable());
        assert!(!GatewayError::Rpc("invalid payment hash".into()).is_route_unavailable());
        assert!(!GatewayError::PollTimeout { attempts: 5 }.is_route_unavailable());
    }
}
