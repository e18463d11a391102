//! `lnops audit` — Reconcile payment history into rebalance and relay
//! listings, labelled with channel aliases.

use clap::Args;
use std::path::Path;

use lnops_audit::reconcile;
use lnops_core::config::LnopsConfig;
use lnops_gateway::{AliasResolver, EclairGateway, NodeGateway, Session};

/// Default lookback when --since is not given.
const DEFAULT_WINDOW_DAYS: i64 = 31;

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Start of the window, unix seconds (default: 31 days ago).
    #[arg(long)]
    pub since: Option<i64>,

    /// End of the window, unix seconds (default: open).
    #[arg(long)]
    pub until: Option<i64>,
}

pub async fn run(args: &AuditArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = LnopsConfig::load(config_path)?;
    let gateway = Session::new(EclairGateway::from_config(&config));

    let since = args.since.unwrap_or_else(|| {
        (chrono::Utc::now() - chrono::Duration::days(DEFAULT_WINDOW_DAYS)).timestamp()
    });

    let report = gateway.audit(since, args.until).await?;
    let summary = reconcile(&report)?;
    let aliases = AliasResolver::load(&gateway).await?;

    println!("rebalances ({}):", summary.rebalances.len());
    for r in &summary.rebalances {
        println!(
            "  {}  {} -> {}  {} sat  fee {} msat  latency {}s",
            r.received_at.iso,
            aliases.channel_label(&r.out_channel),
            aliases.channel_label(&r.in_channel),
            r.amount_received_msat / 1000,
            r.fees_msat,
            r.latency_secs
        );
    }

    println!();
    println!("relays ({}):", summary.relays.len());
    for relay in &summary.relays {
        println!(
            "  {}  {} -> {}  {} sat  fee {} msat  latency {}s",
            relay.settled_at.iso,
            aliases.channel_label(&relay.in_channel),
            aliases.channel_label(&relay.out_channel),
            relay.amount_out_msat / 1000,
            relay.fee_msat,
            relay.latency_secs
        );
    }

    Ok(())
}
