//! Streaming capacity and cost planner
//!
//! Estimates throughput, storage, capacity units and cost for a managed
//! streaming platform across five business domains and four environments.

mod catalog;
mod export;
mod models;
mod pricing;
mod sizer;
mod store;

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use crate::models::{DomainId, DomainInput, EnvId, InputSet, Snapshot, Tier, TopologyPolicy};
use crate::pricing::PricingTable;
use crate::sizer::PlanReport;
use crate::store::SnapshotStore;

#[derive(Parser)]
#[command(name = "stream-cost-planner")]
#[command(about = "Capacity and cost planner for managed streaming clusters")]
struct Cli {
    /// Path to the SQLite snapshot database
    #[arg(short, long, default_value = "planner.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the sizing plan and print the report
    Plan {
        /// Show the per-cell breakdown table
        #[arg(short, long)]
        verbose: bool,
    },

    /// Update one domain's workload parameters
    Set {
        /// Domain id (cust, ordr, pay, lgst, mkt)
        domain: String,

        #[command(flatten)]
        args: SetArgs,
    },

    /// Update one (domain, environment) scale factor or enabled flag
    Env {
        /// Domain id (cust, ordr, pay, lgst, mkt)
        domain: String,

        /// Environment id (dev, tst, pre, prd)
        env: String,

        /// Scale factor applied to the base message rate (> 0)
        #[arg(long)]
        scale: Option<f64>,

        /// Enable the environment
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable the environment
        #[arg(long)]
        disable: bool,
    },

    /// Set the cluster topology (shared | per-domain)
    Topology {
        policy: String,
    },

    /// Show current workload inputs per domain
    Show,

    /// Show the service tiers and their prices and ceilings
    Tiers,

    /// Show the suggested topic names for a domain
    Topics {
        /// Domain id (cust, ordr, pay, lgst, mkt)
        domain: String,
    },

    /// Write the tabular CSV export
    ExportCsv {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the HTML report
    ExportHtml {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Discard the saved snapshot and restore defaults
    Reset,
}

/// Workload parameter updates; omitted options leave the field untouched.
#[derive(Args, Default)]
struct SetArgs {
    /// Base message rate in messages per second
    #[arg(long)]
    mps: Option<u64>,

    /// Average message size in bytes
    #[arg(long)]
    msg_bytes: Option<u64>,

    /// Retention in days (1-365)
    #[arg(long)]
    retention: Option<u32>,

    /// Replication factor (1, 3 or 5)
    #[arg(long)]
    replication: Option<u32>,

    /// Partitions per topic (1-100)
    #[arg(long)]
    partitions: Option<u32>,

    /// Number of topics
    #[arg(long)]
    topics: Option<u32>,

    /// Peak burst multiplier (1.0-10.0)
    #[arg(long)]
    peak: Option<f64>,

    /// Compression ratio, fraction of bytes remaining (0-1]
    #[arg(long)]
    compression: Option<f64>,

    /// Durability level (basic, standard, dedicated)
    #[arg(long)]
    durability: Option<String>,
}

/// Applies one `set` invocation to a domain's input.
///
/// Out-of-range numeric values are clamped into their declared ranges;
/// values with no nearby legal interpretation (replication factor outside
/// {1, 3, 5}, unknown durability names) are rejected outright. The sizing
/// engine never sees an unclamped value.
fn apply_set(input: &mut DomainInput, args: SetArgs) -> Result<()> {
    if let Some(v) = args.mps {
        input.messages_per_second = v;
    }
    if let Some(v) = args.msg_bytes {
        input.avg_message_bytes = v.max(1);
    }
    if let Some(v) = args.retention {
        input.retention_days = v.clamp(1, 365);
    }
    if let Some(v) = args.replication {
        if !matches!(v, 1 | 3 | 5) {
            bail!("replication factor must be 1, 3 or 5 (got {})", v);
        }
        input.replication_factor = v;
    }
    if let Some(v) = args.partitions {
        input.partitions_per_topic = v.clamp(1, 100);
    }
    if let Some(v) = args.topics {
        input.topics = v.max(1);
    }
    if let Some(v) = args.peak {
        input.peak_multiplier = v.clamp(1.0, 10.0);
    }
    if let Some(v) = args.compression {
        input.compression_ratio = v.clamp(0.01, 1.0);
    }
    if let Some(v) = args.durability {
        input.durability = v.parse::<Tier>().map_err(|e| anyhow!(e))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Persistence is best-effort: a broken store downgrades to in-memory
    // defaults with a warning, never a failed run.
    let store = match SnapshotStore::open(&cli.database) {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("warning: {}; continuing without persistence", e);
            None
        }
    };
    let (mut inputs, mut topology) = load_state(store.as_ref());
    let pricing = PricingTable::default();

    match cli.command {
        Commands::Plan { verbose } => {
            let (results, totals) = sizer::recompute(&inputs, topology, &pricing);
            let report = PlanReport {
                results: &results,
                totals: &totals,
                topology,
                verbose,
            };
            println!("{}", report);
        }

        Commands::Set { domain, args } => {
            let domain: DomainId = domain.parse().map_err(|e: String| anyhow!(e))?;
            apply_set(inputs.domain_mut(domain), args)?;

            save_state(store.as_ref(), &inputs, topology);
            let (_, totals) = sizer::recompute(&inputs, topology, &pricing);
            println!(
                "Updated {}. Monthly total now {:.2} ({} ECKUs).",
                catalog::domain_name(domain),
                totals.monthly_cost,
                totals.ecku
            );
        }

        Commands::Env {
            domain,
            env,
            scale,
            enable,
            disable,
        } => {
            let domain: DomainId = domain.parse().map_err(|e: String| anyhow!(e))?;
            let env: EnvId = env.parse().map_err(|e: String| anyhow!(e))?;

            let cfg = inputs
                .domain_mut(domain)
                .environments
                .get_mut(&env)
                .ok_or_else(|| anyhow!("no environment config for {}/{}", domain, env))?;
            if let Some(v) = scale {
                if v <= 0.0 {
                    bail!("scale factor must be > 0 (got {})", v);
                }
                cfg.scale = v;
            }
            if enable {
                cfg.enabled = true;
            }
            if disable {
                cfg.enabled = false;
            }

            save_state(store.as_ref(), &inputs, topology);
            let (_, totals) = sizer::recompute(&inputs, topology, &pricing);
            println!(
                "Updated {}/{}. Monthly total now {:.2}.",
                domain, env, totals.monthly_cost
            );
        }

        Commands::Topology { policy } => {
            topology = policy.parse().map_err(|e: String| anyhow!(e))?;
            save_state(store.as_ref(), &inputs, topology);
            let (_, totals) = sizer::recompute(&inputs, topology, &pricing);
            println!(
                "Topology set to '{}'. Total ECKUs now {}, storage {:.0} GB.",
                topology.label(),
                totals.ecku,
                totals.storage_gb
            );
        }

        Commands::Show => {
            for domain in DomainId::ALL {
                let input = inputs.domain(domain);
                println!("{} ({})", catalog::domain_name(domain), domain);
                println!(
                    "  {} msg/s x {} B, retention {} d, replication {}",
                    input.messages_per_second,
                    input.avg_message_bytes,
                    input.retention_days,
                    input.replication_factor
                );
                println!(
                    "  {} topics x {} partitions, peak x{}, compression {}, durability {}",
                    input.topics,
                    input.partitions_per_topic,
                    input.peak_multiplier,
                    input.compression_ratio,
                    input.durability
                );
                for env in EnvId::ALL {
                    if let Some(cfg) = input.env(env) {
                        println!(
                            "  {:<4} scale {:<4} {}",
                            env,
                            cfg.scale,
                            if cfg.enabled { "enabled" } else { "disabled" }
                        );
                    }
                }
            }
            println!("Topology: {}", topology.label());
        }

        Commands::Tiers => {
            println!(
                "{:<10} {:>10} {:>6} {:>10} {:>11} {:>12} {:>14} {:>12}",
                "Tier", "$/month", "ECKUs", "MB/s max", "Partitions", "Connections", "Retention (d)", "GB-month $"
            );
            println!("{}", "-".repeat(92));
            for tier in Tier::ALL {
                let def = pricing.tier(tier);
                println!(
                    "{:<10} {:>10.2} {:>6} {:>10.0} {:>11} {:>12} {:>14} {:>12.2}",
                    def.tier,
                    def.monthly_price,
                    def.units_per_price_step,
                    def.throughput_ceiling_mbps,
                    def.partition_ceiling,
                    def.connection_ceiling,
                    def.retention_ceiling_days,
                    pricing.storage_price_per_gb(tier),
                );
            }
        }

        Commands::Topics { domain } => {
            let domain: DomainId = domain.parse().map_err(|e: String| anyhow!(e))?;
            println!("Suggested topics for {}:", catalog::domain_name(domain));
            for name in catalog::topic_names(domain) {
                println!("  {}", name);
            }
        }

        Commands::ExportCsv { output } => {
            let (results, totals) = sizer::recompute(&inputs, topology, &pricing);
            let csv = export::render_csv(&results, &totals, topology);
            write_export(output, &csv)?;
        }

        Commands::ExportHtml { output } => {
            let (results, totals) = sizer::recompute(&inputs, topology, &pricing);
            let html = export::render_html(&results, &totals, topology);
            write_export(output, &html)?;
        }

        Commands::Reset => {
            if let Some(store) = store.as_ref() {
                if let Err(e) = store.clear() {
                    eprintln!("warning: failed to clear snapshot: {}", e);
                }
            }
            println!("Inputs reset to defaults.");
        }
    }

    Ok(())
}

/// Loads the saved state, falling back to defaults when there is no store,
/// no snapshot, or a snapshot that cannot be used.
fn load_state(store: Option<&SnapshotStore>) -> (InputSet, TopologyPolicy) {
    let defaults = || (catalog::default_input_set(), TopologyPolicy::Shared);
    let Some(store) = store else {
        return defaults();
    };
    match store.load() {
        Ok(Some(snapshot)) => (snapshot.inputs, snapshot.topology),
        Ok(None) => defaults(),
        Err(e) => {
            if e.is_malformed() {
                eprintln!("warning: {}; starting from defaults", e);
            } else {
                eprintln!("warning: failed to load snapshot: {}; starting from defaults", e);
            }
            defaults()
        }
    }
}

/// Persists the state; a failed write is a warning, not an error.
fn save_state(store: Option<&SnapshotStore>, inputs: &InputSet, topology: TopologyPolicy) {
    let Some(store) = store else {
        return;
    };
    let snapshot = Snapshot {
        inputs: inputs.clone(),
        topology,
        saved_at: Utc::now(),
    };
    if let Err(e) = store.save(&snapshot) {
        eprintln!("warning: failed to save snapshot: {}; changes not persisted", e);
    }
}

fn write_export(output: Option<PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_input_set;

    fn cust() -> DomainInput {
        default_input_set().domain(DomainId::Cust).clone()
    }

    #[test]
    fn set_clamps_low_values_up_into_range() {
        let mut input = cust();
        apply_set(
            &mut input,
            SetArgs {
                msg_bytes: Some(0),
                retention: Some(0),
                partitions: Some(0),
                topics: Some(0),
                peak: Some(0.5),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(input.avg_message_bytes, 1);
        assert_eq!(input.retention_days, 1);
        assert_eq!(input.partitions_per_topic, 1);
        assert_eq!(input.topics, 1);
        assert_eq!(input.peak_multiplier, 1.0);
    }

    #[test]
    fn set_clamps_high_values_down_into_range() {
        let mut input = cust();
        apply_set(
            &mut input,
            SetArgs {
                retention: Some(9999),
                partitions: Some(500),
                peak: Some(99.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(input.retention_days, 365);
        assert_eq!(input.partitions_per_topic, 100);
        assert_eq!(input.peak_multiplier, 10.0);
    }

    #[test]
    fn set_clamps_compression_into_unit_interval() {
        let mut input = cust();
        apply_set(
            &mut input,
            SetArgs {
                compression: Some(-2.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(input.compression_ratio, 0.01);

        apply_set(
            &mut input,
            SetArgs {
                compression: Some(1.8),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(input.compression_ratio, 1.0);
    }

    #[test]
    fn set_accepts_only_legal_replication_factors() {
        let mut input = cust();
        for v in [1, 3, 5] {
            apply_set(
                &mut input,
                SetArgs {
                    replication: Some(v),
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(input.replication_factor, v);
        }

        let err = apply_set(
            &mut input,
            SetArgs {
                replication: Some(2),
                ..Default::default()
            },
        );
        assert!(err.is_err());
        // The rejected value leaves the input untouched.
        assert_eq!(input.replication_factor, 5);
    }

    #[test]
    fn set_rejects_unknown_durability_names() {
        let mut input = cust();
        let err = apply_set(
            &mut input,
            SetArgs {
                durability: Some("ultra".into()),
                ..Default::default()
            },
        );
        assert!(err.is_err());
        assert_eq!(input.durability, Tier::Basic);
    }

    #[test]
    fn set_applies_in_range_values_verbatim() {
        let mut input = cust();
        apply_set(
            &mut input,
            SetArgs {
                mps: Some(42_000),
                msg_bytes: Some(2048),
                retention: Some(30),
                topics: Some(12),
                compression: Some(0.65),
                durability: Some("dedicated".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(input.messages_per_second, 42_000);
        assert_eq!(input.avg_message_bytes, 2048);
        assert_eq!(input.retention_days, 30);
        assert_eq!(input.topics, 12);
        assert_eq!(input.compression_ratio, 0.65);
        assert_eq!(input.durability, Tier::Dedicated);
    }
}
