//! Fee arithmetic. The formula must match the node's own convention exactly
//! (truncating integer division), since the oracle's fee budget and our
//! spliced-hop fees have to agree on the wire.

use lnops_core::types::RoutingPolicy;

/// Fee owed for forwarding `amount_msat` over a channel under the given
/// outbound policy: `fee_base + amount * ppm / 1_000_000`, truncated toward
/// zero.
pub fn hop_fee_msat(policy: &RoutingPolicy, amount_msat: u64) -> u64 {
    let proportional =
        (amount_msat as u128 * policy.fee_proportional_millionths as u128) / 1_000_000;
    policy.fee_base_msat + proportional as u64
}
