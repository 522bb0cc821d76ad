//! Pricing table: tier definitions and storage prices
//!
//! Configuration constants, not derived values. The table is built once and
//! passed by reference into the sizing engine so tests can substitute an
//! alternate table.

use crate::models::Tier;

/// One service tier's price and ceilings.
///
/// Only the monthly price and `units_per_price_step` feed the cost math;
/// the ceilings are reference figures for reports.
#[derive(Debug, Clone, Copy)]
pub struct TierDef {
    pub tier: Tier,
    /// Price per billing month for one bundle of `units_per_price_step` ECKUs.
    pub monthly_price: f64,
    /// Bundle size the monthly price is quoted for.
    pub units_per_price_step: u32,
    pub throughput_ceiling_mbps: f64,
    pub partition_ceiling: u32,
    pub connection_ceiling: u32,
    pub retention_ceiling_days: u32,
}

/// Tier definitions plus per-tier storage pricing.
#[derive(Debug, Clone)]
pub struct PricingTable {
    tiers: [TierDef; 3],
    /// Price per GB-month of retained (replicated, compressed) data.
    storage_gb_month: [f64; 3],
}

impl PricingTable {
    pub fn tier(&self, tier: Tier) -> &TierDef {
        &self.tiers[tier as usize]
    }

    pub fn storage_price_per_gb(&self, tier: Tier) -> f64 {
        self.storage_gb_month[tier as usize]
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        PricingTable {
            tiers: [
                TierDef {
                    tier: Tier::Basic,
                    monthly_price: 215.0,
                    units_per_price_step: 1,
                    throughput_ceiling_mbps: 200.0,
                    partition_ceiling: 3000,
                    connection_ceiling: 1000,
                    retention_ceiling_days: 90,
                },
                TierDef {
                    tier: Tier::Standard,
                    monthly_price: 1150.0,
                    units_per_price_step: 2,
                    throughput_ceiling_mbps: 400.0,
                    partition_ceiling: 8000,
                    connection_ceiling: 4500,
                    retention_ceiling_days: 365,
                },
                TierDef {
                    tier: Tier::Dedicated,
                    monthly_price: 2940.0,
                    units_per_price_step: 4,
                    throughput_ceiling_mbps: 2000.0,
                    partition_ceiling: 30000,
                    connection_ceiling: 18000,
                    retention_ceiling_days: 365,
                },
            ],
            storage_gb_month: [0.10, 0.08, 0.06],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_lookup_is_positional() {
        let table = PricingTable::default();
        for t in Tier::ALL {
            assert_eq!(table.tier(t).tier, t);
        }
    }

    #[test]
    fn storage_price_drops_with_tier() {
        let table = PricingTable::default();
        assert!(table.storage_price_per_gb(Tier::Basic) > table.storage_price_per_gb(Tier::Standard));
        assert!(
            table.storage_price_per_gb(Tier::Standard) > table.storage_price_per_gb(Tier::Dedicated)
        );
    }
}
