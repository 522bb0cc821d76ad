//! Static domain catalog and environment taxonomy
//!
//! Read-only reference data: the five business domains with their ordered
//! subdomains, the four deployment environments, and the seed values for a
//! fresh input set. Nothing here is mutated at runtime.

use std::collections::BTreeMap;

use crate::models::{DomainId, DomainInput, EnvConfig, EnvId, InputSet, Tier};

/// One business domain and its ordered subdomains.
///
/// Subdomain order is meaningful: it drives the topic naming preview and
/// the default topic count (two topics per subdomain).
pub struct Domain {
    pub id: DomainId,
    pub name: &'static str,
    pub subdomains: &'static [&'static str],
}

pub const DOMAINS: [Domain; 5] = [
    Domain {
        id: DomainId::Cust,
        name: "Customer",
        subdomains: &["profile", "consent", "preferences"],
    },
    Domain {
        id: DomainId::Ordr,
        name: "Orders",
        subdomains: &["checkout", "fulfilment", "returns"],
    },
    Domain {
        id: DomainId::Pay,
        name: "Payments",
        subdomains: &["transactions", "settlements", "fraud", "disputes"],
    },
    Domain {
        id: DomainId::Lgst,
        name: "Logistics",
        subdomains: &["shipments", "tracking", "warehousing"],
    },
    Domain {
        id: DomainId::Mkt,
        name: "Marketing",
        subdomains: &["campaigns", "audiences"],
    },
];

/// Topic type suffixes used in the naming preview.
pub const TOPIC_TYPES: [&str; 2] = ["events", "commands"];

// DOMAINS is laid out in DomainId discriminant order.
pub fn domain(id: DomainId) -> &'static Domain {
    &DOMAINS[id as usize]
}

pub fn domain_name(id: DomainId) -> &'static str {
    domain(id).name
}

pub fn env_label(env: EnvId) -> &'static str {
    match env {
        EnvId::Dev => "Development",
        EnvId::Tst => "Test",
        EnvId::Pre => "Pre-production",
        EnvId::Prd => "Production",
    }
}

/// Default scale factor per environment.
pub fn default_scale(env: EnvId) -> f64 {
    match env {
        EnvId::Dev => 0.1,
        EnvId::Tst => 0.3,
        EnvId::Pre => 0.7,
        EnvId::Prd => 1.0,
    }
}

/// Suggested topic names for a domain: `{domain}.{subdomain}.{type}.v1`.
pub fn topic_names(id: DomainId) -> Vec<String> {
    let d = domain(id);
    let mut names = Vec::with_capacity(d.subdomains.len() * TOPIC_TYPES.len());
    for sub in d.subdomains {
        for ty in TOPIC_TYPES {
            names.push(format!("{}.{}.{}.v1", d.id, sub, ty));
        }
    }
    names
}

fn default_env_configs() -> BTreeMap<EnvId, EnvConfig> {
    EnvId::ALL
        .iter()
        .map(|&env| {
            (
                env,
                EnvConfig {
                    scale: default_scale(env),
                    enabled: true,
                },
            )
        })
        .collect()
}

fn default_domain_input(id: DomainId) -> DomainInput {
    DomainInput {
        messages_per_second: 1000,
        avg_message_bytes: 1024,
        retention_days: 7,
        replication_factor: 3,
        partitions_per_topic: 6,
        topics: 2 * domain(id).subdomains.len() as u32,
        peak_multiplier: 2.0,
        compression_ratio: 1.0,
        durability: Tier::Basic,
        environments: default_env_configs(),
    }
}

/// A freshly seeded input set covering every domain and environment.
pub fn default_input_set() -> InputSet {
    InputSet {
        domains: DomainId::ALL
            .iter()
            .map(|&id| (id, default_domain_input(id)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains_table_matches_id_order() {
        for (i, d) in DOMAINS.iter().enumerate() {
            assert_eq!(d.id as usize, i);
        }
    }

    #[test]
    fn default_input_set_is_complete() {
        let set = default_input_set();
        assert!(set.is_complete());
        assert_eq!(set.domains.len(), 5);
    }

    #[test]
    fn default_topics_follow_subdomain_count() {
        let set = default_input_set();
        assert_eq!(set.domain(DomainId::Cust).topics, 6);
        assert_eq!(set.domain(DomainId::Pay).topics, 8);
        assert_eq!(set.domain(DomainId::Mkt).topics, 4);
    }

    #[test]
    fn topic_names_follow_convention() {
        let names = topic_names(DomainId::Cust);
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "cust.profile.events.v1");
        assert_eq!(names[1], "cust.profile.commands.v1");
        assert!(names.iter().all(|n| n.ends_with(".v1")));
    }

    #[test]
    fn prd_scale_is_full() {
        let set = default_input_set();
        let prd = set.domain(DomainId::Cust).env(crate::models::EnvId::Prd).unwrap();
        assert_eq!(prd.scale, 1.0);
        assert!(prd.enabled);
    }
}
