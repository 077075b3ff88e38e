use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use rust_decimal::Decimal;

use crate::cost::CostBreakdown;
use crate::ranking::{RankingResult, RankingStatus};
use crate::switching::{SwitchAction, SwitchingAnalysis};

pub fn render_ranking_table(result: &RankingResult) -> String {
    if result.status == RankingStatus::NoEligiblePlans {
        return format!(
            "No eligible plans available in this region ({} filtered out, {} excluded).",
            result.filtered_out_count,
            result.excluded_count()
        );
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Rank",
        "Plan",
        "Supplier",
        "Type",
        "Score",
        "Cost / Flex / Green / Rating",
        "Annual Cost",
        "Savings",
    ]);

    for ranked in &result.ranked_plans {
        let savings_cell = match ranked.projected_annual_savings {
            Some(s) if s > Decimal::ZERO => Cell::new(money(s)).fg(Color::Green),
            Some(s) => Cell::new(money(s)).fg(Color::Red),
            None => Cell::new("-"),
        };
        table.add_row(Row::from(vec![
            Cell::new(ranked.rank.to_string()),
            Cell::new(&ranked.plan.name),
            Cell::new(&ranked.supplier_name),
            Cell::new(ranked.plan.plan_type().to_string()),
            Cell::new(format!("{:.1}", ranked.scores.composite)),
            Cell::new(format!(
                "{:.0} / {:.0} / {:.0} / {:.0}",
                ranked.scores.factors.cost,
                ranked.scores.factors.flexibility,
                ranked.scores.factors.renewable,
                ranked.scores.factors.rating
            )),
            Cell::new(money(ranked.cost.displayed_annual_cost)),
            savings_cell,
        ]));
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\n{} of {} eligible plans shown",
        result.ranked_plans.len(),
        result.eligible_count
    ));
    if !result.excluded.is_empty() {
        out.push_str(&format!(
            "; {} excluded for data issues: {}",
            result.excluded_count(),
            result
                .excluded
                .iter()
                .map(|e| format!("{} ({})", e.plan_id, e.reason))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    out
}

pub fn render_cost_table(cost: &CostBreakdown) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Component", "Amount"]);
    table.add_row(vec!["Annual usage (kWh)".to_string(), cost.annual_kwh.to_string()]);
    for tier in &cost.tier_usage {
        table.add_row(vec![
            format!("  Tier {} ({} kWh @ {})", tier.tier, tier.kwh, tier.rate_per_kwh),
            money(tier.cost),
        ]);
    }
    table.add_row(vec!["Usage cost".to_string(), money(cost.base_usage_cost)]);
    table.add_row(vec!["Monthly fees".to_string(), money(cost.total_monthly_fees)]);
    table.add_row(vec!["Connection fee".to_string(), money(cost.connection_fee)]);
    table.add_row(vec!["First-year total".to_string(), money(cost.total_annual_cost)]);
    table.add_row(vec!["Per month".to_string(), money(cost.monthly_cost())]);
    if !cost.uncertainty_buffer.is_zero() {
        table.add_row(vec![
            "Variable-rate allowance".to_string(),
            money(cost.uncertainty_buffer),
        ]);
    }
    table.add_row(vec![
        "Average rate (per kWh)".to_string(),
        cost.average_rate_per_kwh.to_string(),
    ]);
    let mut out = table.to_string();
    if cost.zero_usage {
        out.push_str("\nNo usage projected; average rate shown is the plan's base rate.");
    }
    out
}

pub fn render_switching_table(analysis: &SwitchingAnalysis) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Candidate".to_string(), analysis.candidate_plan_id.to_string()]);
    table.add_row(vec![
        "Days until contract end".to_string(),
        analysis
            .days_until_contract_end
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Early termination fee".to_string(),
        money(analysis.early_termination_fee),
    ]);
    table.add_row(vec!["Current annual cost".to_string(), money(analysis.current_annual_cost)]);
    table.add_row(vec![
        "Candidate annual cost".to_string(),
        money(analysis.candidate_annual_cost),
    ]);
    table.add_row(vec!["Monthly savings".to_string(), money(analysis.monthly_savings)]);
    table.add_row(vec![
        "Break-even".to_string(),
        analysis
            .break_even_months
            .map(|m| format!("{m} months"))
            .unwrap_or_else(|| "never".to_string()),
    ]);
    let action_cell = match analysis.action {
        SwitchAction::SwitchNow => Cell::new("SWITCH NOW").fg(Color::Green),
        SwitchAction::Wait => Cell::new("WAIT").fg(Color::Yellow),
    };
    table.add_row(Row::from(vec![Cell::new("Recommendation"), action_cell]));
    table.add_row(vec!["Reason".to_string(), analysis.reason.to_string()]);
    table.add_row(vec![
        "Switch on".to_string(),
        analysis
            .optimal_switch_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.to_string()
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}
