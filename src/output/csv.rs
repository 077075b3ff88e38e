use anyhow::Result;

use crate::cost::CostBreakdown;
use crate::ranking::RankingResult;

pub fn ranking_to_csv(result: &RankingResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "plan_id",
        "plan_type",
        "supplier",
        "composite",
        "cost_score",
        "flexibility_score",
        "renewable_score",
        "rating_score",
        "annual_cost",
        "annual_savings",
    ])?;
    for ranked in &result.ranked_plans {
        writer.write_record([
            ranked.rank.to_string(),
            ranked.plan.id.to_string(),
            ranked.plan.plan_type().as_slug().to_string(),
            ranked.supplier_name.clone(),
            format!("{:.2}", ranked.scores.composite),
            format!("{:.2}", ranked.scores.factors.cost),
            format!("{:.2}", ranked.scores.factors.flexibility),
            format!("{:.2}", ranked.scores.factors.renewable),
            format!("{:.2}", ranked.scores.factors.rating),
            ranked.projected_annual_cost.round_dp(2).to_string(),
            ranked
                .projected_annual_savings
                .map(|s| s.round_dp(2).to_string())
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn cost_to_csv(cost: &CostBreakdown) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "plan_id",
        "annual_kwh",
        "base_usage_cost",
        "monthly_fees",
        "connection_fee",
        "total_annual_cost",
        "monthly_cost",
        "uncertainty_buffer",
        "average_rate_per_kwh",
    ])?;
    writer.write_record([
        cost.plan_id.to_string(),
        cost.annual_kwh.to_string(),
        cost.base_usage_cost.round_dp(2).to_string(),
        cost.total_monthly_fees.round_dp(2).to_string(),
        cost.connection_fee.round_dp(2).to_string(),
        cost.total_annual_cost.round_dp(2).to_string(),
        cost.monthly_cost().to_string(),
        cost.uncertainty_buffer.round_dp(2).to_string(),
        cost.average_rate_per_kwh.to_string(),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
