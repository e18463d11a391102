use std::time::Duration;

use lnops_core::config::LnopsConfig;
use lnops_core::types::ChannelId;

use crate::error::GatewayError;
use crate::traits::NodeGateway;
use crate::types::{Invoice, PaymentStatus};

/// Bounds for the payment-status poll.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub attempts: u32,
}

impl From<&LnopsConfig> for PollConfig {
    fn from(config: &LnopsConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            attempts: config.poll_attempts,
        }
    }
}

/// Submit a payment along an explicit channel sequence and poll its status
/// at a fixed interval until it reaches a terminal state.
///
/// Returns the payment preimage on settlement. A failed payment surfaces the
/// node's failure reasons ([`GatewayError::PaymentFailed`]); exhausting the
/// attempt bound while the payment is still pending surfaces
/// [`GatewayError::PollTimeout`] — the payment may still settle later.
pub async fn pay_via_route(
    gateway: &dyn NodeGateway,
    short_channel_ids: &[ChannelId],
    invoice: &Invoice,
    poll: &PollConfig,
) -> Result<String, GatewayError> {
    let payment_id = gateway.submit_payment(short_channel_ids, invoice).await?;
    tracing::info!(payment_id = %payment_id, hops = short_channel_ids.len(), "payment submitted");

    for attempt in 0..poll.attempts {
        match gateway.payment_status(&payment_id).await? {
            PaymentStatus::Pending => {
                tracing::debug!(payment_id = %payment_id, attempt, "payment still pending");
                tokio::time::sleep(poll.interval).await;
            }
            PaymentStatus::Settled { payment_preimage } => {
                tracing::info!(payment_id = %payment_id, "payment settled");
                return Ok(payment_preimage);
            }
            PaymentStatus::Failed { reasons } => {
                tracing::warn!(payment_id = %payment_id, reasons = ?reasons, "payment failed");
                return Err(GatewayError::PaymentFailed { reasons });
            }
        }
    }

    Err(GatewayError::PollTimeout {
        attempts: poll.attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lnops_core::events::AuditReport;
    use lnops_core::types::{Channel, ChannelDesc, PubKey};

    use crate::types::{
        FoundPath, NodeAnnouncement, NodeInfo, PathRequest, PaymentId, Peer, PolicyUpdate,
    };

    /// Returns a scripted sequence of statuses, then repeats the last one.
    struct ScriptedGateway {
        statuses: Vec<PaymentStatus>,
        polls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(statuses: Vec<PaymentStatus>) -> Self {
            Self {
                statuses,
                polls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NodeGateway for ScriptedGateway {
        async fn get_info(&self) -> Result<NodeInfo, GatewayError> {
            unimplemented!()
        }
        async fn list_nodes(&self) -> Result<Vec<NodeAnnouncement>, GatewayError> {
            unimplemented!()
        }
        async fn list_peers(&self) -> Result<Vec<Peer>, GatewayError> {
            unimplemented!()
        }
        async fn list_channels(&self, _active_only: bool) -> Result<Vec<Channel>, GatewayError> {
            unimplemented!()
        }
        async fn list_edges(&self) -> Result<Vec<ChannelDesc>, GatewayError> {
            unimplemented!()
        }
        async fn policy_updates(
            &self,
            _node_id: &PubKey,
        ) -> Result<Vec<PolicyUpdate>, GatewayError> {
            unimplemented!()
        }
        async fn find_path(&self, _request: &PathRequest) -> Result<Vec<FoundPath>, GatewayError> {
            unimplemented!()
        }

        async fn submit_payment(
            &self,
            _short_channel_ids: &[ChannelId],
            _invoice: &Invoice,
        ) -> Result<PaymentId, GatewayError> {
            Ok(PaymentId("pay-1".into()))
        }

        async fn payment_status(&self, _id: &PaymentId) -> Result<PaymentStatus, GatewayError> {
            let i = self.polls.fetch_add(1, Ordering::SeqCst);
            let i = i.min(self.statuses.len() - 1);
            Ok(self.statuses[i].clone())
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

    fn invoice() -> Invoice {
        Invoice {
            node_id: PubKey::from("02aa"),
            payment_hash: "aa11".into(),
            amount: 50_000_000,
            timestamp: 1_714_557_600,
            expiry: Some(3600),
            description: Some("rebalance".into()),
            min_final_cltv_expiry: 30,
            serialized: "lnbc1...".into(),
        }
    }

    fn fast_poll(attempts: u32) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            attempts,
        }
    }

    #[tokio::test]
    async fn test_settles_after_pending() {
        let gateway = ScriptedGateway::new(vec![
            PaymentStatus::Pending,
            PaymentStatus::Pending,
            PaymentStatus::Settled {
                payment_preimage: "preimage".into(),
            },
        ]);
        let chans = [ChannelId::from("845000x12x1")];
        let preimage = pay_via_route(&gateway, &chans, &invoice(), &fast_poll(10))
            .await
            .unwrap();
        assert_eq!(preimage, "preimage");
        assert_eq!(gateway.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_payment_surfaces_reasons() {
        let gateway = ScriptedGateway::new(vec![PaymentStatus::Failed {
            reasons: vec!["TemporaryChannelFailure".into()],
        }]);
        let chans = [ChannelId::from("845000x12x1")];
        let err = pay_via_route(&gateway, &chans, &invoice(), &fast_poll(10))
            .await
            .unwrap_err();
        match err {
            GatewayError::PaymentFailed { reasons } => {
                assert_eq!(reasons, vec!["TemporaryChannelFailure".to_string()]);
            }
            other => panic!("expected PaymentFailed, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_poll_bound_is_a_timeout_not_a_failure() {
        let gateway = ScriptedGateway::new(vec![PaymentStatus::Pending]);
        let chans = [ChannelId::from("845000x12x1")];
        let err = pay_via_route(&gateway, &chans, &invoice(), &fast_poll(3))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PollTimeout { attempts: 3 }));
        assert_eq!(gateway.polls.load(Ordering::SeqCst), 3);
    }
}
