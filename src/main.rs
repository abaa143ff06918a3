//! `proxy-selector` command line.
//!
//! # Commands
//! - `check`: load and validate a config, print the resolved groups
//! - `select`: run selections against a group and print pick counts
//! - `watch`: run the health checkers and log node health until signalled

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use proxy_selector::config::{load_config, parse_strategy, SelectorFileConfig};
use proxy_selector::lifecycle::{wait_for_signal, Shutdown};
use proxy_selector::observability::{logging, metrics};
use proxy_selector::{NodeManager, SelectContext};

#[derive(Parser)]
#[command(name = "proxy-selector")]
#[command(about = "Upstream selection with filters, strategies and health checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and print the resolved groups
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run selections against a group and print per-node pick counts
    Select {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long)]
        group: String,

        #[arg(short = 'n', long, default_value_t = 100)]
        count: usize,

        /// Routing hash source for the hash strategy
        #[arg(long)]
        hash: Option<String>,
    },
    /// Run health checkers and log node health until Ctrl-C / SIGTERM
    Watch {
        #[arg(short, long)]
        config: PathBuf,

        /// Seconds between health reports
        #[arg(long, default_value_t = 10)]
        report_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => {
            let config = load_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&describe(&config))?);
        }
        Commands::Select {
            config,
            group,
            count,
            hash,
        } => {
            let config = load_config(&config)?;
            let manager = NodeManager::new(&config);
            let ctx = match hash {
                Some(source) => SelectContext::with_hash(source),
                None => SelectContext::new(),
            };

            let mut picks: BTreeMap<String, usize> = BTreeMap::new();
            let mut misses = 0usize;
            for _ in 0..count {
                match manager.select(&group, &ctx) {
                    Some(node) => *picks.entry(node.name().to_string()).or_default() += 1,
                    None => misses += 1,
                }
            }

            let out = json!({ "group": group, "picks": picks, "none": misses });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Watch {
            config,
            report_secs,
        } => watch(load_config(&config)?, Duration::from_secs(report_secs.max(1))).await?,
    }

    Ok(())
}

async fn watch(
    config: SelectorFileConfig,
    report_every: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability)?;

    if let Some(address) = &config.observability.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %address,
                error = %e,
                "failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let manager = NodeManager::new(&config);
    let handles = manager.start_health_checks(&shutdown);
    tracing::info!(
        groups = config.groups.len(),
        checkers = handles.len(),
        "proxy-selector watching"
    );

    let mut stop = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let mut ticker = tokio::time::interval(report_every);
    loop {
        tokio::select! {
            _ = stop.recv() => break,
            _ = ticker.tick() => report(&manager),
        }
    }

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "health checker task failed");
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}

fn report(manager: &NodeManager) {
    for group in manager.groups() {
        for node in group.nodes() {
            let marker = node.marker();
            tracing::info!(
                group = %group.name(),
                node = %node.name(),
                fails = marker.count(),
                since_last_failure = ?marker.since_last_failure(),
                active_conns = node.active_conns(),
                "node status"
            );
        }
    }
}

fn describe(config: &SelectorFileConfig) -> serde_json::Value {
    let groups: Vec<_> = config
        .groups
        .iter()
        .map(|g| {
            let health = &g.selector.health_check;
            json!({
                "name": g.name,
                "strategy": parse_strategy(&g.selector.strategy).to_string(),
                "liveness": if health.enabled { "health_check" } else { "fail" },
                "max_fails": g.selector.max_fails,
                "fail_timeout_ms": g.selector.fail_timeout.as_millis() as u64,
                "health_check": health.enabled.then(|| json!({
                    "type": health.check_type,
                    "interval_secs": health.interval_secs,
                    "timeout_secs": health.timeout_secs,
                    "path": health.path,
                    "expect_status": health.expect_status,
                })),
                "nodes": g.nodes,
            })
        })
        .collect();
    json!({ "groups": groups })
}
