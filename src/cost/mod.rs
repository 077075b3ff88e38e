pub mod calculator;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::PlanId;

pub use calculator::{compute_cost, compute_cost_with, try_compute_cost};

/// First-year cost of one plan against one usage projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    pub plan_id: PlanId,
    pub annual_kwh: Decimal,
    pub base_usage_cost: Decimal,
    /// Populated for tiered plans only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tier_usage: Vec<TierUsage>,
    pub total_monthly_fees: Decimal,
    pub connection_fee: Decimal,
    pub total_annual_cost: Decimal,
    /// Cautionary allowance for variable-rate plans. Excluded from scoring.
    pub uncertainty_buffer: Decimal,
    pub displayed_annual_cost: Decimal,
    pub average_rate_per_kwh: Decimal,
    /// Set when the projection has no usage and the average rate fell back to the base rate.
    pub zero_usage: bool,
}

impl CostBreakdown {
    pub fn monthly_cost(&self) -> Decimal {
        (self.total_annual_cost / Decimal::from(12)).round_dp(2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierUsage {
    pub tier: usize,
    pub kwh: Decimal,
    pub rate_per_kwh: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostParams {
    /// Buffer fraction applied at full confidence.
    #[serde(default = "default_buffer_min")]
    pub variable_buffer_min: Decimal,
    /// Buffer fraction applied at zero confidence.
    #[serde(default = "default_buffer_max")]
    pub variable_buffer_max: Decimal,
    #[serde(default = "default_peak_fraction")]
    pub default_peak_fraction: Decimal,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            variable_buffer_min: default_buffer_min(),
            variable_buffer_max: default_buffer_max(),
            default_peak_fraction: default_peak_fraction(),
        }
    }
}

fn default_buffer_min() -> Decimal {
    dec!(0.05)
}

fn default_buffer_max() -> Decimal {
    dec!(0.15)
}

fn default_peak_fraction() -> Decimal {
    dec!(0.5)
}
