use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::PlanId;

#[derive(Debug, Error, PartialEq)]
pub enum AdvisorError {
    #[error("preference weights must sum to 100, got {total}")]
    InvalidPreferences { total: u32 },
    #[error("invalid usage projection: {0}")]
    InvalidProjection(String),
    #[error("negative usage in month {month}: {kwh} kWh")]
    NegativeUsage { month: usize, kwh: Decimal },
    #[error("malformed rate structure on plan {plan}: {reason}")]
    MalformedRate { plan: PlanId, reason: RateError },
    #[error("cost of plan {plan} exceeds the representable range")]
    CostOverflow { plan: PlanId },
    #[error("current plan cost exceeds the representable range")]
    CurrentCostOverflow,
    #[error("catalog error: {0}")]
    Catalog(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateError {
    #[error("rate must not be negative")]
    NegativeRate,
    #[error("tiered structure has no tiers")]
    NoTiers,
    #[error("tier ceilings must be positive and strictly increasing")]
    NonIncreasingTiers,
    #[error("only the final tier may be unbounded")]
    UnboundedTierNotLast,
    #[error("final tier must be unbounded")]
    BoundedFinalTier,
    #[error("peak fraction must be within [0, 1]")]
    PeakFractionOutOfRange,
}
