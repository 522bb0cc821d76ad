//! Data models for workloads, environments and computed sizing results

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed taxonomy of business domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainId {
    Cust,
    Ordr,
    Pay,
    Lgst,
    Mkt,
}

impl DomainId {
    pub const ALL: [DomainId; 5] = [
        DomainId::Cust,
        DomainId::Ordr,
        DomainId::Pay,
        DomainId::Lgst,
        DomainId::Mkt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DomainId::Cust => "cust",
            DomainId::Ordr => "ordr",
            DomainId::Pay => "pay",
            DomainId::Lgst => "lgst",
            DomainId::Mkt => "mkt",
        }
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cust" => Ok(DomainId::Cust),
            "ordr" => Ok(DomainId::Ordr),
            "pay" => Ok(DomainId::Pay),
            "lgst" => Ok(DomainId::Lgst),
            "mkt" => Ok(DomainId::Mkt),
            other => Err(format!(
                "unknown domain '{}' (expected one of: cust, ordr, pay, lgst, mkt)",
                other
            )),
        }
    }
}

/// Deployment environments, ordered from least to most production-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvId {
    Dev,
    Tst,
    Pre,
    Prd,
}

impl EnvId {
    pub const ALL: [EnvId; 4] = [EnvId::Dev, EnvId::Tst, EnvId::Pre, EnvId::Prd];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvId::Dev => "dev",
            EnvId::Tst => "tst",
            EnvId::Pre => "pre",
            EnvId::Prd => "prd",
        }
    }
}

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(EnvId::Dev),
            "tst" => Ok(EnvId::Tst),
            "pre" => Ok(EnvId::Pre),
            "prd" => Ok(EnvId::Prd),
            other => Err(format!(
                "unknown environment '{}' (expected one of: dev, tst, pre, prd)",
                other
            )),
        }
    }
}

/// Service tiers, in ascending order of capability.
///
/// The same three names serve as the durability level on [`DomainInput`]:
/// requesting `dedicated` durability forces the dedicated tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Standard,
    Dedicated,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Standard, Tier::Dedicated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Standard => "standard",
            Tier::Dedicated => "dedicated",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Tier::Basic),
            "standard" => Ok(Tier::Standard),
            "dedicated" => Ok(Tier::Dedicated),
            other => Err(format!(
                "unknown tier '{}' (expected one of: basic, standard, dedicated)",
                other
            )),
        }
    }
}

/// How clusters are laid out across domains.
///
/// Affects only how ECKU and storage totals are combined; per-cell results
/// and all cost totals are topology-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyPolicy {
    /// One cluster shared by all domains; capacity is driven by the peak cell.
    Shared,
    /// One independently provisioned cluster per domain.
    PerDomain,
}

impl TopologyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyPolicy::Shared => "shared",
            TopologyPolicy::PerDomain => "per-domain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TopologyPolicy::Shared => "Single shared cluster",
            TopologyPolicy::PerDomain => "Cluster per domain",
        }
    }
}

impl fmt::Display for TopologyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopologyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(TopologyPolicy::Shared),
            "per-domain" => Ok(TopologyPolicy::PerDomain),
            other => Err(format!(
                "unknown topology '{}' (expected 'shared' or 'per-domain')",
                other
            )),
        }
    }
}

/// Per (domain, environment) scaling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Multiplier applied to the domain's base message rate (> 0).
    pub scale: f64,
    /// Disabled environments produce no result cell at all.
    pub enabled: bool,
}

/// One domain's workload parameters, as entered by the user.
///
/// All ranges are enforced at the mutation boundary (the CLI), never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInput {
    pub messages_per_second: u64,
    pub avg_message_bytes: u64,
    /// 1..=365
    pub retention_days: u32,
    /// One of {1, 3, 5}.
    pub replication_factor: u32,
    /// 1..=100
    pub partitions_per_topic: u32,
    pub topics: u32,
    /// Burst factor applied on top of the scaled base rate, 1.0..=10.0.
    pub peak_multiplier: f64,
    /// Fraction of raw bytes remaining after compression, (0.0, 1.0].
    pub compression_ratio: f64,
    pub durability: Tier,
    pub environments: BTreeMap<EnvId, EnvConfig>,
}

impl DomainInput {
    pub fn env(&self, env: EnvId) -> Option<&EnvConfig> {
        self.environments.get(&env)
    }
}

/// The full set of user inputs: one [`DomainInput`] per domain.
///
/// Never partially initialized: construction seeds every domain, and a
/// loaded snapshot missing any domain is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSet {
    pub domains: BTreeMap<DomainId, DomainInput>,
}

impl InputSet {
    /// True when every domain carries a config for every environment.
    pub fn is_complete(&self) -> bool {
        DomainId::ALL.iter().all(|d| {
            self.domains
                .get(d)
                .is_some_and(|input| EnvId::ALL.iter().all(|e| input.environments.contains_key(e)))
        })
    }

    pub fn domain(&self, id: DomainId) -> &DomainInput {
        &self.domains[&id]
    }

    pub fn domain_mut(&mut self, id: DomainId) -> &mut DomainInput {
        self.domains.get_mut(&id).expect("input set is complete")
    }
}

/// Computed sizing result for one enabled (domain, environment) pair.
///
/// Entirely derived: regenerated wholesale on every recompute, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCell {
    pub raw_throughput_mbps: f64,
    pub throughput_mbps: f64,
    pub raw_storage_gb: f64,
    pub storage_gb: f64,
    pub topics: u32,
    /// `topics * partitions_per_topic`; u64 so large topic counts never wrap.
    pub partitions: u64,
    pub tier: Tier,
    pub ecku: u32,
    pub monthly_ecku_cost: f64,
    pub monthly_storage_cost: f64,
    pub monthly_cost: f64,
    pub annual_cost: f64,
    // Scaling inputs echoed for traceability
    pub scale: f64,
    pub peak_multiplier: f64,
    pub compression_ratio: f64,
}

/// All computed cells, keyed by domain then enabled environment.
pub type ResultSet = BTreeMap<DomainId, BTreeMap<EnvId, ResultCell>>;

/// Cluster-wide aggregates over a [`ResultSet`] under a topology policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub monthly_cost: f64,
    pub annual_cost: f64,
    /// Max single-cell ECKU under shared topology, sum under per-domain.
    pub ecku: u32,
    /// Same max-vs-sum rule as `ecku`.
    pub storage_gb: f64,
    pub monthly_by_domain: BTreeMap<DomainId, f64>,
    pub monthly_by_env: BTreeMap<EnvId, f64>,
}

/// The persisted state: inputs, topology choice and when they were saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub inputs: InputSet,
    pub topology: TopologyPolicy,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        for d in DomainId::ALL {
            assert_eq!(d.as_str().parse::<DomainId>().unwrap(), d);
        }
        for e in EnvId::ALL {
            assert_eq!(e.as_str().parse::<EnvId>().unwrap(), e);
        }
        for t in Tier::ALL {
            assert_eq!(t.as_str().parse::<Tier>().unwrap(), t);
        }
        assert_eq!(
            "per-domain".parse::<TopologyPolicy>().unwrap(),
            TopologyPolicy::PerDomain
        );
        assert!("prod".parse::<EnvId>().is_err());
    }

    #[test]
    fn tiers_order_ascending() {
        assert!(Tier::Basic < Tier::Standard);
        assert!(Tier::Standard < Tier::Dedicated);
    }
}
