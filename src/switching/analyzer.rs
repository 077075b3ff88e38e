use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::cost::CostBreakdown;
use crate::error::AdvisorError;
use crate::switching::{CurrentPlan, SwitchAction, SwitchReason, SwitchingAnalysis, SwitchingParams};

pub fn analyze_switching(
    top_candidate: &CostBreakdown,
    current: &CurrentPlan,
    today: NaiveDate,
) -> Result<SwitchingAnalysis, AdvisorError> {
    analyze_switching_with(top_candidate, current, today, &SwitchingParams::default())
}

/// Decides whether to switch to `top_candidate` now or wait. Rules are checked
/// in order and the first match wins:
///
/// 1. contract ends within the window: wait
/// 2. no termination fee: switch now
/// 3. no savings, or break-even beyond the limit: wait
/// 4. annual savings above the fee multiple: switch now
/// 5. otherwise wait for the contract to end
///
/// A current plan without an end date is month-to-month: rule 1 never fires,
/// any stated termination fee still applies to rules 2 to 5, and a wait
/// outcome carries no `optimal_switch_date`. Once the end date has passed the
/// fee is treated as zero.
pub fn analyze_switching_with(
    top_candidate: &CostBreakdown,
    current: &CurrentPlan,
    today: NaiveDate,
    params: &SwitchingParams,
) -> Result<SwitchingAnalysis, AdvisorError> {
    let days_until_contract_end = current
        .contract_end_date
        .map(|end| end.signed_duration_since(today).num_days());
    let contract_lapsed = days_until_contract_end.is_some_and(|days| days < 0);
    let early_termination_fee = if contract_lapsed {
        Decimal::ZERO
    } else {
        current.early_termination_fee.max(Decimal::ZERO)
    };

    let candidate_annual_cost = top_candidate.total_annual_cost;
    let (current_annual_cost, annual_savings) = current
        .annual_cost(top_candidate.annual_kwh)
        .and_then(|cost| Some((cost, cost.checked_sub(candidate_annual_cost)?)))
        .ok_or(AdvisorError::CurrentCostOverflow)?;
    let monthly_savings = (annual_savings / Decimal::from(12)).round_dp(2);
    let break_even_months = break_even(early_termination_fee, monthly_savings);

    let reason = if days_until_contract_end
        .is_some_and(|days| (0..=params.contract_end_window_days).contains(&days))
    {
        SwitchReason::ContractEndingSoon
    } else if early_termination_fee.is_zero() {
        SwitchReason::NoTerminationFee
    } else if break_even_months.map_or(true, |months| months > params.max_break_even_months) {
        SwitchReason::BreakEvenTooDistant
    } else if early_termination_fee
        .checked_mul(params.savings_to_etf_multiple)
        .is_some_and(|threshold| annual_savings > threshold)
    {
        SwitchReason::SavingsExceedPenalty
    } else {
        SwitchReason::MarginalBenefit
    };

    let action = reason.action();
    let optimal_switch_date = match action {
        SwitchAction::SwitchNow => Some(today),
        SwitchAction::Wait => current.contract_end_date,
    };

    debug!(
        plan = %top_candidate.plan_id,
        ?action,
        %reason,
        %monthly_savings,
        "switching analysis"
    );

    Ok(SwitchingAnalysis {
        candidate_plan_id: top_candidate.plan_id.clone(),
        days_until_contract_end,
        early_termination_fee,
        current_annual_cost,
        candidate_annual_cost,
        monthly_savings,
        annual_savings,
        break_even_months,
        should_wait: action == SwitchAction::Wait,
        action,
        reason,
        optimal_switch_date,
    })
}

/// Whole months of savings needed to recoup `fee`; `None` when nothing is saved.
pub fn break_even(fee: Decimal, monthly_savings: Decimal) -> Option<u32> {
    if monthly_savings <= Decimal::ZERO {
        return None;
    }
    fee.checked_div(monthly_savings)?.ceil().to_u32()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::PlanId;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    /// Candidate on 12,000 kWh costing `annual` in total.
    fn candidate(annual: Decimal) -> CostBreakdown {
        CostBreakdown {
            plan_id: PlanId::new("candidate"),
            annual_kwh: dec!(12000),
            base_usage_cost: annual,
            tier_usage: Vec::new(),
            total_monthly_fees: Decimal::ZERO,
            connection_fee: Decimal::ZERO,
            total_annual_cost: annual,
            uncertainty_buffer: Decimal::ZERO,
            displayed_annual_cost: annual,
            average_rate_per_kwh: annual / dec!(12000),
            zero_usage: false,
        }
    }

    fn analyze(
        candidate: &CostBreakdown,
        current: &CurrentPlan,
        today: NaiveDate,
    ) -> SwitchingAnalysis {
        analyze_switching(candidate, current, today).expect("costs fit")
    }

    /// Current plan at 0.12/kWh: 1,440 a year on 12,000 kWh.
    fn current(etf: Decimal, end_in_days: Option<i64>) -> CurrentPlan {
        CurrentPlan {
            name: "Incumbent".to_string(),
            rate_per_kwh: dec!(0.12),
            monthly_fee: Decimal::ZERO,
            early_termination_fee: etf,
            contract_end_date: end_in_days.map(|d| today() + chrono::Duration::days(d)),
        }
    }

    #[test]
    fn forty_a_month_against_two_hundred_fee_switches_now() {
        let analysis = analyze(&candidate(dec!(960)), &current(dec!(200), Some(200)), today());
        assert_eq!(analysis.monthly_savings, dec!(40));
        assert_eq!(analysis.annual_savings, dec!(480));
        assert_eq!(analysis.break_even_months, Some(5));
        assert_eq!(analysis.reason, SwitchReason::SavingsExceedPenalty);
        assert_eq!(analysis.action, SwitchAction::SwitchNow);
        assert!(!analysis.should_wait);
        assert_eq!(analysis.optimal_switch_date, Some(today()));
    }

    #[test]
    fn zero_fee_switches_now_even_without_savings() {
        for annual in [dec!(900), dec!(1440), dec!(1800)] {
            let analysis = analyze(&candidate(annual), &current(Decimal::ZERO, Some(120)), today());
            assert_eq!(analysis.reason, SwitchReason::NoTerminationFee);
            assert!(!analysis.should_wait);
        }
    }

    #[test]
    fn contract_ending_soon_always_waits() {
        for annual in [dec!(100), dec!(960), dec!(2000)] {
            for etf in [Decimal::ZERO, dec!(50), dec!(400)] {
                let analysis = analyze(&candidate(annual), &current(etf, Some(10)), today());
                assert_eq!(analysis.reason, SwitchReason::ContractEndingSoon);
                assert!(analysis.should_wait);
                assert_eq!(analysis.days_until_contract_end, Some(10));
                assert_eq!(
                    analysis.optimal_switch_date,
                    Some(today() + chrono::Duration::days(10))
                );
            }
        }
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let at_edge = analyze(&candidate(dec!(960)), &current(dec!(200), Some(30)), today());
        assert_eq!(at_edge.reason, SwitchReason::ContractEndingSoon);
        let past_edge = analyze(&candidate(dec!(960)), &current(dec!(200), Some(31)), today());
        assert_eq!(past_edge.reason, SwitchReason::SavingsExceedPenalty);
    }

    #[test]
    fn no_savings_means_never_breaks_even() {
        let analysis = analyze(&candidate(dec!(1500)), &current(dec!(150), Some(300)), today());
        assert_eq!(analysis.break_even_months, None);
        assert_eq!(analysis.reason, SwitchReason::BreakEvenTooDistant);
        assert!(analysis.should_wait);
        assert_eq!(
            analysis.optimal_switch_date,
            Some(today() + chrono::Duration::days(300))
        );
    }

    #[test]
    fn distant_break_even_waits() {
        // 10/month against a 300 fee => 30 months
        let analysis = analyze(&candidate(dec!(1320)), &current(dec!(300), Some(400)), today());
        assert_eq!(analysis.monthly_savings, dec!(10));
        assert_eq!(analysis.break_even_months, Some(30));
        assert_eq!(analysis.reason, SwitchReason::BreakEvenTooDistant);
    }

    #[test]
    fn modest_savings_wait_for_contract_end() {
        // 20/month against 200 => 10 months; 240/year is not above 400
        let analysis = analyze(&candidate(dec!(1200)), &current(dec!(200), Some(250)), today());
        assert_eq!(analysis.break_even_months, Some(10));
        assert_eq!(analysis.reason, SwitchReason::MarginalBenefit);
        assert!(analysis.should_wait);
    }

    #[test]
    fn lapsed_contract_carries_no_fee() {
        let analysis = analyze(&candidate(dec!(1200)), &current(dec!(200), Some(-5)), today());
        assert_eq!(analysis.early_termination_fee, Decimal::ZERO);
        assert_eq!(analysis.reason, SwitchReason::NoTerminationFee);
    }

    #[test]
    fn break_even_rounds_up() {
        assert_eq!(break_even(dec!(200), dec!(40)), Some(5));
        assert_eq!(break_even(dec!(201), dec!(40)), Some(6));
        assert_eq!(break_even(dec!(0), dec!(40)), Some(0));
        assert_eq!(break_even(dec!(200), dec!(0)), None);
    }

    #[test]
    fn month_to_month_with_fee_skips_window_and_has_no_wait_date() {
        let analysis = analyze(&candidate(dec!(1200)), &current(dec!(200), None), today());
        assert_eq!(analysis.days_until_contract_end, None);
        assert_eq!(analysis.early_termination_fee, dec!(200));
        assert_eq!(analysis.reason, SwitchReason::MarginalBenefit);
        assert!(analysis.should_wait);
        assert_eq!(analysis.optimal_switch_date, None);
    }

    #[test]
    fn oversized_current_rate_is_an_error() {
        let mut incumbent = current(dec!(200), Some(100));
        incumbent.rate_per_kwh = Decimal::MAX;
        assert_eq!(
            analyze_switching(&candidate(dec!(960)), &incumbent, today()),
            Err(AdvisorError::CurrentCostOverflow)
        );
    }
}
