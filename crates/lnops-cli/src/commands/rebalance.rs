//! `lnops rebalance` — Compose circular routes between two local channels
//! and optionally pay one of them.

use clap::Args;
use std::path::Path;

use lnops_core::config::LnopsConfig;
use lnops_core::types::{Channel, ChannelId, PubKey};
use lnops_gateway::{pay_via_route, AliasResolver, EclairGateway, NodeGateway, PollConfig, Session};
use lnops_routing::{ComposeRequest, Route, RouteComposer};

#[derive(Args, Debug)]
pub struct RebalanceArgs {
    /// Short channel id to leave through.
    #[arg(long)]
    pub from_channel: Option<String>,

    /// Short channel id to come back through.
    #[arg(long)]
    pub to_channel: Option<String>,

    /// Amount to move, in satoshi.
    #[arg(long)]
    pub amount_sat: u64,

    /// Maximum total fee, in satoshi.
    #[arg(long)]
    pub fee_limit_sat: Option<u64>,

    /// Short channel ids the oracle must avoid (repeatable).
    #[arg(long = "ignore-channel")]
    pub ignore_channels: Vec<String>,

    /// Node ids the oracle must avoid (repeatable).
    #[arg(long = "ignore-node")]
    pub ignore_nodes: Vec<String>,

    /// Pay via the cheapest composed route instead of only listing routes.
    #[arg(long)]
    pub pay: bool,
}

pub async fn run(args: &RebalanceArgs, config_path: &Path) -> anyhow::Result<()> {
    if args.from_channel.is_none() && args.to_channel.is_none() {
        anyhow::bail!("at least one of --from-channel / --to-channel is required");
    }

    let config = LnopsConfig::load(config_path)?;
    let gateway = Session::new(EclairGateway::from_config(&config));

    let info = gateway.get_info().await?;
    let channels = gateway.list_channels(false).await?;

    let request = ComposeRequest {
        first_hop: pinned(&channels, args.from_channel.as_deref())?,
        last_hop: pinned(&channels, args.to_channel.as_deref())?,
        amount_msat: args.amount_sat * 1000,
        ignored_channels: args
            .ignore_channels
            .iter()
            .map(|c| ChannelId::from(c.as_str()))
            .collect(),
        ignored_nodes: args
            .ignore_nodes
            .iter()
            .map(|n| PubKey::from(n.as_str()))
            .collect(),
        fee_limit_msat: args.fee_limit_sat.map(|sat| sat * 1000),
    };

    let composer = RouteComposer::new(&gateway, info.node_id.clone());
    let mut routes = composer.compose_routes(&request).await?;
    if routes.is_empty() {
        println!("No route satisfies the constraints.");
        return Ok(());
    }
    routes.sort_by_key(|r| r.total_fees_msat);

    let aliases = AliasResolver::load(&gateway).await?;
    for (idx, route) in routes.iter().enumerate() {
        print_route(idx, route, &aliases);
    }

    if args.pay {
        let cheapest = &routes[0];
        let invoice = gateway
            .generate_invoice("lnops rebalance", request.amount_msat)
            .await?;
        tracing::info!(
            payment_hash = %invoice.payment_hash,
            fees_msat = cheapest.total_fees_msat,
            "paying via cheapest route"
        );
        let poll = PollConfig::from(&config);
        let preimage =
            pay_via_route(&gateway, &cheapest.short_channel_ids(), &invoice, &poll).await?;
        println!("Settled. Preimage: {preimage}");
    }

    Ok(())
}

/// Look up a pinned channel by short id among the node's own channels.
fn pinned(channels: &[Channel], chan_id: Option<&str>) -> anyhow::Result<Option<Channel>> {
    match chan_id {
        None => Ok(None),
        Some(id) => channels
            .iter()
            .find(|c| c.chan_id.as_str() == id)
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("no local channel with short id {id}")),
    }
}

fn print_route(idx: usize, route: &Route, aliases: &AliasResolver) {
    println!(
        "route {idx}: {} sat + {} msat fees",
        route.amount_msat / 1000,
        route.total_fees_msat
    );
    for hop in &route.hops {
        let source = aliases
            .node_alias(&hop.source)
            .unwrap_or_else(|| hop.source.as_str());
        let target = aliases
            .node_alias(&hop.target)
            .unwrap_or_else(|| hop.target.as_str());
        println!(
            "  {source} -> {target}  chan {}  forward {} msat  fee {} msat",
            hop.chan_id, hop.amt_to_forward_msat, hop.fee_msat
        );
    }
}
