use lnops_core::types::{Channel, ChannelId, PubKey};
use lnops_gateway::{NodeGateway, PathRequest};

use crate::error::RoutingError;
use crate::resolver::EdgeResolver;
use crate::route::{Hop, Route};

/// Constraints for one composition pass. At least one pinned hop is
/// required; with neither, composition yields nothing.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub first_hop: Option<Channel>,
    pub last_hop: Option<Channel>,
    pub amount_msat: u64,
    pub ignored_channels: Vec<ChannelId>,
    pub ignored_nodes: Vec<PubKey>,
    pub fee_limit_msat: Option<u64>,
}

/// Composes payable routes by pinning local hops and delegating the middle
/// segment to the node's pathfinding oracle.
///
/// When only one end is pinned, the other end ranges over all currently
/// active local channels except the pinned one; every candidate pair is
/// attempted and all successes are accumulated, in gateway-return order.
/// Candidates only read session-memoized gateway state plus their own
/// oracle call, so they are explored concurrently.
pub struct RouteComposer<'a> {
    gateway: &'a dyn NodeGateway,
    resolver: EdgeResolver<'a>,
}

impl<'a> RouteComposer<'a> {
    pub fn new(gateway: &'a dyn NodeGateway, local_node: PubKey) -> Self {
        Self {
            gateway,
            resolver: EdgeResolver::new(gateway, local_node),
        }
    }

    pub fn resolver(&self) -> &EdgeResolver<'a> {
        &self.resolver
    }

    pub async fn compose_routes(
        &self,
        request: &ComposeRequest,
    ) -> Result<Vec<Route>, RoutingError> {
        let (first_hops, last_hops) = match (&request.first_hop, &request.last_hop) {
            (None, None) => return Ok(Vec::new()),
            (Some(first), Some(last)) => (vec![first.clone()], vec![last.clone()]),
            (Some(first), None) => {
                let candidates = self.candidate_channels(&first.chan_id).await?;
                (vec![first.clone()], candidates)
            }
            (None, Some(last)) => {
                let candidates = self.candidate_channels(&last.chan_id).await?;
                (candidates, vec![last.clone()])
            }
        };

        let mut attempts = Vec::new();
        for first in &first_hops {
            for last in &last_hops {
                attempts.push(self.find_one_route(first, last, request));
            }
        }
        tracing::debug!(candidates = attempts.len(), "exploring route candidates");

        let results = futures::future::try_join_all(attempts).await?;
        Ok(results.into_iter().flatten().collect())
    }

    /// All active local channels other than the pinned one.
    async fn candidate_channels(
        &self,
        pinned: &ChannelId,
    ) -> Result<Vec<Channel>, RoutingError> {
        let channels = self.gateway.list_channels(true).await?;
        Ok(channels
            .into_iter()
            .filter(|ch| &ch.chan_id != pinned)
            .collect())
    }

    /// Attempt one (first hop, last hop) candidate. `Ok(None)` means the
    /// candidate is infeasible (ignored channel, or the oracle found no
    /// middle segment) — never fatal for the whole composition.
    async fn find_one_route(
        &self,
        first_hop: &Channel,
        last_hop: &Channel,
        request: &ComposeRequest,
    ) -> Result<Option<Route>, RoutingError> {
        if request.ignored_channels.contains(&first_hop.chan_id)
            || request.ignored_channels.contains(&last_hop.chan_id)
        {
            tracing::debug!(
                first = %first_hop.chan_id,
                last = %last_hop.chan_id,
                "candidate skipped: pinned channel is ignored"
            );
            return Ok(None);
        }

        // The last hop's own forwarding fee is outside the oracle's search,
        // so it comes off the budget before the query. A channel with no
        // observed inbound policy is unroutable via local knowledge, which
        // rules out this candidate but not the composition.
        let last_hop_fee_msat = match self
            .resolver
            .forwarding_fee_msat(&last_hop.chan_id, request.amount_msat)
            .await
        {
            Ok(fee) => fee,
            Err(RoutingError::PolicyUnknown { chan_id }) => {
                tracing::debug!(
                    last = %chan_id,
                    "candidate skipped: no policy observed toward the local node"
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let max_fee_msat = request
            .fee_limit_msat
            .map(|limit| limit as i64 - last_hop_fee_msat as i64);

        // Keep the oracle off the local node's other channels: everything
        // locally known except the pinned first hop is out of bounds, on top
        // of the caller's ignore list.
        let mut ignore_channel_ids: Vec<ChannelId> = self
            .gateway
            .list_channels(false)
            .await?
            .into_iter()
            .map(|ch| ch.chan_id)
            .filter(|chan_id| chan_id != &first_hop.chan_id)
            .collect();
        ignore_channel_ids.extend(request.ignored_channels.iter().cloned());

        let path_request = PathRequest {
            source: self.resolver.local_node().clone(),
            target: last_hop.remote_pubkey.clone(),
            amount_msat: request.amount_msat,
            ignore_node_ids: request.ignored_nodes.clone(),
            ignore_channel_ids,
            max_fee_msat,
        };

        let paths = self.gateway.find_path(&path_request).await?;
        let Some(path) = paths.into_iter().next() else {
            tracing::debug!(
                first = %first_hop.chan_id,
                last = %last_hop.chan_id,
                "candidate infeasible: oracle found no path"
            );
            return Ok(None);
        };
        if path.hops.is_empty() {
            return Err(RoutingError::EmptyPath);
        }

        let mut hops: Vec<Hop> = path
            .hops
            .iter()
            .map(|hop| Hop::from_oracle(hop, path.amount))
            .collect();

        // The oracle was asked to start exactly at the pinned first hop; a
        // different starting channel means local state and the node's view
        // have diverged.
        if hops[0].chan_id != first_hop.chan_id {
            return Err(RoutingError::InconsistentResponse {
                expected: first_hop.chan_id.clone(),
                got: hops[0].chan_id.clone(),
            });
        }

        // The payer pays no fee on its own outbound channel; re-splice the
        // validated first hop at zero fee rather than keeping the fee the
        // oracle attributed to it.
        hops[0] = Hop::from_pinned_channel(first_hop, path.amount, 0, true);

        hops.push(Hop::from_pinned_channel(
            last_hop,
            path.amount,
            last_hop_fee_msat,
            false,
        ));

        let route = Route::new(path.amount, hops);
        tracing::debug!(
            first = %first_hop.chan_id,
            last = %last_hop.chan_id,
            total_fees_msat = route.total_fees_msat,
            "route composed"
        );
        Ok(Some(route))
    }
}
