//! Sizing and cost-derivation engine
//!
//! Pure computation: maps workload inputs to throughput, storage, tier
//! selection and cost, then rolls the per-cell results up into cluster-wide
//! totals. Every function here is total over its documented input range and
//! has no error path; range enforcement happens at the CLI boundary.

use std::collections::BTreeMap;
use std::fmt;

use crate::catalog;
use crate::models::{
    DomainId, DomainInput, EnvId, InputSet, ResultCell, ResultSet, Tier, TopologyPolicy, Totals,
};
use crate::pricing::PricingTable;

const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = 1024.0 * 1024.0 * 1024.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Outcome of tier selection: the chosen tier and the ECKUs required in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSelection {
    pub tier: Tier,
    pub ecku: u32,
}

/// Picks the cheapest tier that fits the effective throughput and partition
/// count, and the ECKU count within it.
///
/// Thresholds are strict: 200 MB/s and 3000 partitions still fit basic,
/// 400 MB/s and 8000 partitions still fit standard. Dedicated durability
/// forces the dedicated tier with at least 4 ECKUs; it never downgrades a
/// selection already in dedicated. The dedicated unit formula is used as-is
/// without a floor, so a partition-driven dedicated selection at zero
/// throughput yields zero units unless durability raises it.
pub fn select_tier(throughput_mbps: f64, partitions: u64, durability: Tier) -> TierSelection {
    let (tier, ecku) = if throughput_mbps > 400.0 || partitions > 8000 {
        (Tier::Dedicated, (throughput_mbps / 500.0).ceil() as u32 * 4)
    } else if throughput_mbps > 200.0 || partitions > 3000 {
        (Tier::Standard, (throughput_mbps / 250.0).ceil() as u32 * 2)
    } else {
        (Tier::Basic, (throughput_mbps / 100.0).ceil() as u32)
    };

    if durability == Tier::Dedicated {
        return TierSelection {
            tier: Tier::Dedicated,
            ecku: ecku.max(4),
        };
    }
    TierSelection { tier, ecku }
}

/// Sizes one (domain, environment) cell, or `None` when the environment is
/// disabled (or unknown to the input, which a complete input set rules out).
pub fn size_cell(input: &DomainInput, env: EnvId, pricing: &PricingTable) -> Option<ResultCell> {
    let cfg = input.env(env)?;
    if !cfg.enabled {
        return None;
    }

    let scaled_mps = input.messages_per_second as f64 * cfg.scale;
    let scaled_peak_mps = scaled_mps * input.peak_multiplier;
    let raw_throughput_mbps = scaled_peak_mps * input.avg_message_bytes as f64 / MB;
    let throughput_mbps = raw_throughput_mbps * input.compression_ratio;

    let daily_gb = scaled_mps * input.avg_message_bytes as f64 * SECONDS_PER_DAY / GB;
    let compressed_daily_gb = daily_gb * input.compression_ratio;
    let storage_gb =
        compressed_daily_gb * input.retention_days as f64 * input.replication_factor as f64;
    let raw_storage_gb = storage_gb / input.compression_ratio;

    let partitions = input.topics as u64 * input.partitions_per_topic as u64;
    let selection = select_tier(throughput_mbps, partitions, input.durability);

    let tier_def = pricing.tier(selection.tier);
    let monthly_ecku_cost =
        selection.ecku as f64 / tier_def.units_per_price_step as f64 * tier_def.monthly_price;
    let monthly_storage_cost = storage_gb * pricing.storage_price_per_gb(selection.tier);
    let monthly_cost = monthly_ecku_cost + monthly_storage_cost;
    let annual_cost = monthly_cost * 12.0;

    Some(ResultCell {
        raw_throughput_mbps,
        throughput_mbps,
        raw_storage_gb,
        storage_gb,
        topics: input.topics,
        partitions,
        tier: selection.tier,
        ecku: selection.ecku,
        monthly_ecku_cost,
        monthly_storage_cost,
        monthly_cost,
        annual_cost,
        scale: cfg.scale,
        peak_multiplier: input.peak_multiplier,
        compression_ratio: input.compression_ratio,
    })
}

/// Rolls all cells up into cluster-wide totals.
///
/// ECKUs and storage combine by max under a shared cluster (one cluster must
/// fit its peak tenant) and by sum under per-domain clusters. Cost is always
/// summed: every enabled cell is billed whether or not clusters are shared.
pub fn aggregate(results: &ResultSet, topology: TopologyPolicy) -> Totals {
    let mut monthly_cost = 0.0;
    let mut ecku_max: u32 = 0;
    let mut ecku_sum: u32 = 0;
    let mut storage_max: f64 = 0.0;
    let mut storage_sum: f64 = 0.0;
    let mut monthly_by_domain: BTreeMap<DomainId, f64> =
        DomainId::ALL.iter().map(|&d| (d, 0.0)).collect();
    let mut monthly_by_env: BTreeMap<EnvId, f64> =
        EnvId::ALL.iter().map(|&e| (e, 0.0)).collect();

    for (&domain, cells) in results {
        for (&env, cell) in cells {
            monthly_cost += cell.monthly_cost;
            *monthly_by_domain.entry(domain).or_insert(0.0) += cell.monthly_cost;
            *monthly_by_env.entry(env).or_insert(0.0) += cell.monthly_cost;
            ecku_sum += cell.ecku;
            ecku_max = ecku_max.max(cell.ecku);
            storage_sum += cell.storage_gb;
            storage_max = storage_max.max(cell.storage_gb);
        }
    }

    let (ecku, storage_gb) = match topology {
        TopologyPolicy::Shared => (ecku_max, storage_max),
        TopologyPolicy::PerDomain => (ecku_sum, storage_sum),
    };

    Totals {
        monthly_cost,
        annual_cost: monthly_cost * 12.0,
        ecku,
        storage_gb,
        monthly_by_domain,
        monthly_by_env,
    }
}

/// Recomputes the full derived state from scratch.
///
/// The caller replaces its previous `(ResultSet, Totals)` wholesale with the
/// returned pair; nothing is mutated in place, so no torn state is ever
/// observable.
pub fn recompute(
    inputs: &InputSet,
    topology: TopologyPolicy,
    pricing: &PricingTable,
) -> (ResultSet, Totals) {
    let mut results: ResultSet = BTreeMap::new();
    for (&domain, input) in &inputs.domains {
        let mut cells = BTreeMap::new();
        for &env in &EnvId::ALL {
            if let Some(cell) = size_cell(input, env, pricing) {
                cells.insert(env, cell);
            }
        }
        results.insert(domain, cells);
    }
    let totals = aggregate(&results, topology);
    (results, totals)
}

/// Console report over a computed plan.
pub struct PlanReport<'a> {
    pub results: &'a ResultSet,
    pub totals: &'a Totals,
    pub topology: TopologyPolicy,
    pub verbose: bool,
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Streaming Capacity Plan ===")?;
        writeln!(f, "Topology: {}", self.topology.label())?;
        writeln!(f)?;

        if self.verbose {
            writeln!(
                f,
                "{:<6} {:<4} {:>5} {:>5} {:>5} {:>9} {:>9} {:>9} {:>9} {:>6} {:>5} {:<9} {:>10}",
                "Domain",
                "Env",
                "Scale",
                "Peak",
                "Compr",
                "Raw MB/s",
                "MB/s",
                "Raw GB",
                "GB",
                "Parts",
                "ECKU",
                "Tier",
                "$/month"
            )?;
            writeln!(f, "{}", "-".repeat(104))?;
            for (domain, cells) in self.results {
                for (env, cell) in cells {
                    writeln!(
                        f,
                        "{:<6} {:<4} {:>5} {:>5} {:>5} {:>9.2} {:>9.2} {:>9.0} {:>9.0} {:>6} {:>5} {:<9} {:>10.2}",
                        domain,
                        env,
                        cell.scale,
                        cell.peak_multiplier,
                        cell.compression_ratio,
                        cell.raw_throughput_mbps,
                        cell.throughput_mbps,
                        cell.raw_storage_gb,
                        cell.storage_gb,
                        cell.partitions,
                        cell.ecku,
                        cell.tier,
                        cell.monthly_cost,
                    )?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "Monthly cost by domain:")?;
        for (domain, cost) in &self.totals.monthly_by_domain {
            writeln!(f, "  {:<12} {:>12.2}", catalog::domain_name(*domain), cost)?;
        }
        writeln!(f, "Monthly cost by environment:")?;
        for (env, cost) in &self.totals.monthly_by_env {
            writeln!(f, "  {:<16} {:>12.2}", catalog::env_label(*env), cost)?;
        }
        writeln!(f)?;

        writeln!(f, "Total ECKUs:      {}", self.totals.ecku)?;
        writeln!(f, "Total storage:    {:.0} GB", self.totals.storage_gb)?;
        writeln!(f, "Monthly total:    {:.2}", self.totals.monthly_cost)?;
        writeln!(f, "Annual total:     {:.2}", self.totals.annual_cost)?;

        Ok(())
    }
}
