use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use lnops_core::config::LnopsConfig;
use lnops_core::events::AuditReport;
use lnops_core::types::{Channel, ChannelDesc, ChannelId, PubKey};

use crate::error::GatewayError;
use crate::traits::NodeGateway;
use crate::types::{
    FoundPath, Invoice, NodeAnnouncement, NodeInfo, PathRequest, PaymentId, PaymentStatus, Peer,
    PolicyUpdate,
};
use crate::wire::{ChannelJson, FoundRoutes, SendToRouteResponse, SentAttempt};

/// HTTP client for the Eclair REST API.
///
/// Every endpoint is a POST with HTTP basic auth (user `eclair-cli`) and a
/// form-encoded body; replies are JSON. A reply carrying an `error` key is
/// surfaced as [`GatewayError::Rpc`].
pub struct EclairGateway {
    address: String,
    password: String,
    http: reqwest::Client,
}

impl EclairGateway {
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            password: password.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &LnopsConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_password.clone())
    }

    async fn call(&self, endpoint: &str, form: &[(&str, String)]) -> Result<Value, GatewayError> {
        let url = format!("http://{}/{}", self.address, endpoint);
        tracing::debug!(endpoint = %endpoint, "calling eclair");
        let response = self
            .http
            .post(&url)
            .basic_auth("eclair-cli", Some(&self.password))
            .form(form)
            .send()
            .await?;
        let value: Value = response.json().await?;
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(GatewayError::Rpc(message.to_string()));
        }
        Ok(value)
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let value = self.call(endpoint, form).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl NodeGateway for EclairGateway {
    async fn get_info(&self) -> Result<NodeInfo, GatewayError> {
        self.call_typed("getinfo", &[]).await
    }

    async fn list_nodes(&self) -> Result<Vec<NodeAnnouncement>, GatewayError> {
        self.call_typed("nodes", &[]).await
    }

    async fn list_peers(&self) -> Result<Vec<Peer>, GatewayError> {
        self.call_typed("peers", &[]).await
    }

    async fn list_channels(&self, active_only: bool) -> Result<Vec<Channel>, GatewayError> {
        let raw: Vec<ChannelJson> = self.call_typed("channels", &[]).await?;
        Ok(raw
            .into_iter()
            .filter(|ch| !active_only || ch.state == "NORMAL")
            .map(ChannelJson::into_channel)
            .collect())
    }

    async fn list_edges(&self) -> Result<Vec<ChannelDesc>, GatewayError> {
        self.call_typed("allchannels", &[]).await
    }

    async fn policy_updates(&self, node_id: &PubKey) -> Result<Vec<PolicyUpdate>, GatewayError> {
        self.call_typed("allupdates", &[("nodeId", node_id.to_string())])
            .await
    }

    async fn find_path(&self, request: &PathRequest) -> Result<Vec<FoundPath>, GatewayError> {
        let mut form: Vec<(&str, String)> = vec![
            ("sourceNodeId", request.source.to_string()),
            ("targetNodeId", request.target.to_string()),
            ("amountMsat", request.amount_msat.to_string()),
            ("format", "full".to_string()),
        ];
        if !request.ignore_node_ids.is_empty() {
            form.push(("ignoreNodeIds", join_ids(&request.ignore_node_ids)));
        }
        if !request.ignore_channel_ids.is_empty() {
            form.push(("ignoreChannelIds", join_ids(&request.ignore_channel_ids)));
        }
        if let Some(max_fee) = request.max_fee_msat {
            form.push(("maxFeeMsat", max_fee.to_string()));
        }

        match self
            .call_typed::<FoundRoutes>("findroutebetweennodes", &form)
            .await
        {
            Ok(found) => Ok(found.routes),
            Err(err) if err.is_route_unavailable() => {
                tracing::debug!(target_node = %request.target, "oracle found no path");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn submit_payment(
        &self,
        short_channel_ids: &[ChannelId],
        invoice: &Invoice,
    ) -> Result<PaymentId, GatewayError> {
        let form: Vec<(&str, String)> = vec![
            ("shortChannelIds", join_ids(short_channel_ids)),
            ("amountMsat", invoice.amount.to_string()),
            ("invoice", invoice.serialized.clone()),
            ("finalCltvExpiry", invoice.min_final_cltv_expiry.to_string()),
        ];
        let response: SendToRouteResponse = self.call_typed("sendtoroute", &form).await?;
        Ok(PaymentId(response.parent_id))
    }

    async fn payment_status(&self, id: &PaymentId) -> Result<PaymentStatus, GatewayError> {
        let attempts: Vec<SentAttempt> = self
            .call_typed("getsentinfo", &[("id", id.to_string())])
            .await?;
        let attempt = attempts
            .into_iter()
            .next()
            .ok_or(GatewayError::MissingField("getsentinfo[0]"))?;

        match attempt.status.status_type.as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "sent" => {
                let payment_preimage = attempt
                    .status
                    .payment_preimage
                    .ok_or(GatewayError::MissingField("status.paymentPreimage"))?;
                Ok(PaymentStatus::Settled { payment_preimage })
            }
            "failed" => {
                let reasons = attempt
                    .status
                    .failures
                    .unwrap_or_default()
                    .into_iter()
                    .map(|f| f.failure_message)
                    .collect();
                Ok(PaymentStatus::Failed { reasons })
            }
            other => Err(GatewayError::Rpc(format!(
                "unknown payment status type: {other}"
            ))),
        }
    }

    async fn audit(&self, from: i64, to: Option<i64>) -> Result<AuditReport, GatewayError> {
        let mut form: Vec<(&str, String)> = vec![("from", from.to_string())];
        if let Some(to) = to {
            form.push(("to", to.to_string()));
        }
        self.call_typed("audit", &form).await
    }

    async fn generate_invoice(
        &self,
        description: &str,
        amount_msat: u64,
    ) -> Result<Invoice, GatewayError> {
        let form: Vec<(&str, String)> = vec![
            ("description", description.to_string()),
            ("amountMsat", amount_msat.to_string()),
        ];
        self.call_typed("createinvoice", &form).await
    }

    async fn parse_invoice(&self, serialized: &str) -> Result<Invoice, GatewayError> {
        self.call_typed("parseinvoice", &[("invoice", serialized.to_string())])
            .await
    }
}
