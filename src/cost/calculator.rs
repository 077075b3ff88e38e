use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::catalog::{Plan, RateStructure, Tier};
use crate::cost::{CostBreakdown, CostParams, TierUsage};
use crate::error::AdvisorError;
use crate::usage::UsageProjection;

const MONTHS_PER_YEAR: u32 = 12;
const AVERAGE_RATE_DP: u32 = 6;

pub fn compute_cost(
    plan: &Plan,
    usage: &UsageProjection,
) -> Result<CostBreakdown, AdvisorError> {
    compute_cost_with(plan, usage, &CostParams::default())
}

/// Validates the plan's rate structure and the projection before costing.
pub fn try_compute_cost(
    plan: &Plan,
    usage: &UsageProjection,
    params: &CostParams,
) -> Result<CostBreakdown, AdvisorError> {
    plan.rate
        .validate()
        .map_err(|reason| AdvisorError::MalformedRate {
            plan: plan.id.clone(),
            reason,
        })?;
    usage.validate()?;
    compute_cost_with(plan, usage, params)
}

/// Expects a validated rate structure; see [`RateStructure::validate`].
///
/// Fails with [`AdvisorError::CostOverflow`] when a rate or fee is too large
/// for any total to be represented.
pub fn compute_cost_with(
    plan: &Plan,
    usage: &UsageProjection,
    params: &CostParams,
) -> Result<CostBreakdown, AdvisorError> {
    price(plan, usage, params).ok_or_else(|| AdvisorError::CostOverflow {
        plan: plan.id.clone(),
    })
}

fn price(plan: &Plan, usage: &UsageProjection, params: &CostParams) -> Option<CostBreakdown> {
    let annual_kwh = usage.annual_kwh;
    let mut tier_usage = Vec::new();
    let mut uncertainty_buffer = Decimal::ZERO;

    let base_usage_cost = match &plan.rate {
        RateStructure::Fixed { rate_per_kwh } => rate_per_kwh.checked_mul(annual_kwh)?,
        RateStructure::Tiered { tiers } => {
            tier_usage = split_tiers(tiers, annual_kwh)?;
            tier_usage
                .iter()
                .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.cost))?
        }
        RateStructure::TimeOfUse {
            peak_rate,
            off_peak_rate,
            peak_fraction,
        } => {
            let fraction = peak_fraction.unwrap_or(params.default_peak_fraction);
            let peak_kwh = annual_kwh.checked_mul(fraction)?;
            let off_peak_kwh = annual_kwh.checked_sub(peak_kwh)?;
            peak_kwh
                .checked_mul(*peak_rate)?
                .checked_add(off_peak_kwh.checked_mul(*off_peak_rate)?)?
        }
        RateStructure::Variable { .. } => {
            let cost = effective_rate(&plan.rate, params)?.checked_mul(annual_kwh)?;
            uncertainty_buffer = cost
                .checked_mul(variable_buffer_fraction(usage.confidence, params))?
                .round_dp(2);
            cost
        }
    };

    let total_monthly_fees = plan
        .monthly_fee
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))?;
    let connection_fee = plan.connection_fee;
    let total_annual_cost = base_usage_cost
        .checked_add(total_monthly_fees)?
        .checked_add(connection_fee)?;

    let zero_usage = annual_kwh.is_zero();
    let average_rate_per_kwh = if zero_usage {
        warn!(plan = %plan.id, "zero annual usage; reporting base rate as average");
        effective_rate(&plan.rate, params)?
    } else {
        total_annual_cost
            .checked_div(annual_kwh)?
            .round_dp(AVERAGE_RATE_DP)
    };

    Some(CostBreakdown {
        plan_id: plan.id.clone(),
        annual_kwh,
        base_usage_cost,
        tier_usage,
        total_monthly_fees,
        connection_fee,
        total_annual_cost,
        uncertainty_buffer,
        displayed_annual_cost: total_annual_cost.checked_add(uncertainty_buffer)?,
        average_rate_per_kwh,
        zero_usage,
    })
}

/// Headline per-kWh rate of a structure, before fees. `None` if the blend overflows.
pub fn effective_rate(rate: &RateStructure, params: &CostParams) -> Option<Decimal> {
    match rate {
        RateStructure::Fixed { rate_per_kwh } => Some(*rate_per_kwh),
        RateStructure::Tiered { tiers } => {
            Some(tiers.first().map(|t| t.rate_per_kwh).unwrap_or(Decimal::ZERO))
        }
        RateStructure::TimeOfUse {
            peak_rate,
            off_peak_rate,
            peak_fraction,
        } => {
            let fraction = peak_fraction.unwrap_or(params.default_peak_fraction);
            peak_rate
                .checked_mul(fraction)?
                .checked_add(off_peak_rate.checked_mul(Decimal::ONE.checked_sub(fraction)?)?)
        }
        RateStructure::Variable {
            base_rate,
            historical_average_rate,
        } => Some(historical_average_rate.unwrap_or(*base_rate)),
    }
}

/// Lower confidence widens the buffer linearly from the minimum to the maximum.
pub fn variable_buffer_fraction(confidence: f64, params: &CostParams) -> Decimal {
    let confidence = Decimal::from_f64(confidence.clamp(0.0, 1.0))
        .unwrap_or(Decimal::ZERO)
        .round_dp(4);
    let spread = params.variable_buffer_max - params.variable_buffer_min;
    params.variable_buffer_min + spread * (Decimal::ONE - confidence)
}

fn split_tiers(tiers: &[Tier], annual_kwh: Decimal) -> Option<Vec<TierUsage>> {
    let mut out = Vec::with_capacity(tiers.len());
    let mut remaining = annual_kwh;
    let mut previous_ceiling = Decimal::ZERO;
    for (idx, tier) in tiers.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let kwh = match tier.up_to_kwh {
            Some(ceiling) => {
                let band = ceiling - previous_ceiling;
                previous_ceiling = ceiling;
                remaining.min(band)
            }
            None => remaining,
        };
        remaining -= kwh;
        out.push(TierUsage {
            tier: idx + 1,
            kwh,
            rate_per_kwh: tier.rate_per_kwh,
            cost: kwh.checked_mul(tier.rate_per_kwh)?,
        });
    }
    Some(out)
}
