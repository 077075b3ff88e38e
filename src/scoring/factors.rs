use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::catalog::{Plan, Supplier};
use crate::scoring::{ScoringParams, MAX_SCORE, NEUTRAL_SCORE};

/// Cheapest and most expensive annual cost in a scoring batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl CostRange {
    pub fn from_costs<I>(costs: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        costs.into_iter().fold(None, |range, cost| match range {
            None => Some(Self {
                min: cost,
                max: cost,
            }),
            Some(r) => Some(Self {
                min: r.min.min(cost),
                max: r.max.max(cost),
            }),
        })
    }
}

/// Inverse-linear position of `cost` within the batch range, pulled toward
/// neutral as usage confidence drops.
pub fn cost_score(cost: Decimal, range: CostRange, confidence: f64, params: &ScoringParams) -> f64 {
    let spread = range.max - range.min;
    let raw = if spread.is_zero() {
        MAX_SCORE
    } else {
        let ratio = (range.max - cost) / spread;
        (ratio.to_f64().unwrap_or(0.0) * MAX_SCORE).clamp(0.0, MAX_SCORE)
    };
    let weight = confidence.clamp(0.0, 1.0).max(params.cost_confidence_floor.clamp(0.0, 1.0));
    blend_toward_neutral(raw, weight)
}

/// 60/40 blend of contract length and early-termination fee terms by default.
pub fn flexibility_score(plan: &Plan, params: &ScoringParams) -> f64 {
    let contract_term = if params.max_contract_months == 0 {
        if plan.contract_months == 0 {
            MAX_SCORE
        } else {
            0.0
        }
    } else {
        let months = plan.contract_months.min(params.max_contract_months);
        MAX_SCORE * (1.0 - f64::from(months) / f64::from(params.max_contract_months))
    };

    let etf_term = if params.etf_cap <= Decimal::ZERO {
        if plan.early_termination_fee.is_zero() {
            MAX_SCORE
        } else {
            0.0
        }
    } else {
        let used = plan
            .early_termination_fee
            .checked_div(params.etf_cap)
            .and_then(|ratio| ratio.to_f64())
            .unwrap_or(1.0);
        (MAX_SCORE * (1.0 - used)).clamp(0.0, MAX_SCORE)
    };

    let mut score = 0.0;
    score += contract_term * params.contract_weight;
    score += etf_term * params.etf_weight;
    score.clamp(0.0, MAX_SCORE)
}

pub fn renewable_score(plan: &Plan) -> f64 {
    plan.renewable_pct.clamp(0.0, MAX_SCORE)
}

pub fn rating_score(supplier: &Supplier, params: &ScoringParams) -> f64 {
    let Some(rating) = supplier.average_rating else {
        return NEUTRAL_SCORE;
    };
    let base = (rating.clamp(0.0, 5.0) / 5.0) * MAX_SCORE;
    blend_toward_neutral(base, review_confidence(supplier.review_count, params))
}

/// Approaches 1.0 as reviews accumulate; held under a cap for thin review histories.
pub fn review_confidence(review_count: u32, params: &ScoringParams) -> f64 {
    let n = f64::from(review_count);
    let half = params.review_half_point.max(0.0);
    let confidence = if n + half > 0.0 { n / (n + half) } else { 1.0 };
    if review_count < params.min_reviews_for_full_confidence {
        confidence.min(params.low_review_confidence_cap)
    } else {
        confidence
    }
}

fn blend_toward_neutral(score: f64, weight: f64) -> f64 {
    score * weight + NEUTRAL_SCORE * (1.0 - weight)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::{PlanId, RateStructure, SupplierId};

    fn plan(contract_months: u32, etf: Decimal) -> Plan {
        Plan {
            id: PlanId::new("p"),
            name: "p".to_string(),
            supplier_id: SupplierId::new("s"),
            rate: RateStructure::Fixed {
                rate_per_kwh: dec!(0.1),
            },
            contract_months,
            early_termination_fee: etf,
            renewable_pct: 35.0,
            monthly_fee: Decimal::ZERO,
            connection_fee: Decimal::ZERO,
            regions: BTreeSet::new(),
            is_active: true,
        }
    }

    fn supplier(rating: Option<f64>, reviews: u32) -> Supplier {
        Supplier {
            id: SupplierId::new("s"),
            name: "s".to_string(),
            average_rating: rating,
            review_count: reviews,
            is_active: true,
        }
    }

    #[test]
    fn cheapest_gets_full_marks_and_priciest_zero() {
        let params = ScoringParams::default();
        let range = CostRange::from_costs([dec!(900), dec!(1200), dec!(1050)]).unwrap();
        assert_eq!(cost_score(dec!(900), range, 1.0, &params), 100.0);
        assert_eq!(cost_score(dec!(1200), range, 1.0, &params), 0.0);
        assert!((cost_score(dec!(1050), range, 1.0, &params) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn equal_costs_all_score_full() {
        let params = ScoringParams::default();
        let range = CostRange::from_costs([dec!(1000), dec!(1000)]).unwrap();
        assert_eq!(cost_score(dec!(1000), range, 1.0, &params), 100.0);
    }

    #[test]
    fn cost_score_is_monotonic_in_cost() {
        let params = ScoringParams::default();
        let costs = [dec!(800), dec!(950), dec!(1010), dec!(1400)];
        let range = CostRange::from_costs(costs).unwrap();
        for confidence in [1.0, 0.7, 0.2] {
            let scores: Vec<f64> = costs
                .iter()
                .map(|c| cost_score(*c, range, confidence, &params))
                .collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn low_confidence_pulls_cost_score_toward_neutral_until_floor() {
        let params = ScoringParams::default();
        let range = CostRange::from_costs([dec!(900), dec!(1200)]).unwrap();
        let at_075 = cost_score(dec!(900), range, 0.75, &params);
        assert!((at_075 - 87.5).abs() < 1e-9);
        let at_floor = cost_score(dec!(900), range, 0.5, &params);
        let below_floor = cost_score(dec!(900), range, 0.1, &params);
        assert!((at_floor - 75.0).abs() < 1e-9);
        assert_eq!(at_floor, below_floor);
    }

    #[test]
    fn flexibility_blends_contract_and_fee_terms() {
        let params = ScoringParams::default();
        assert!((flexibility_score(&plan(0, Decimal::ZERO), &params) - 100.0).abs() < 1e-9);
        assert!((flexibility_score(&plan(36, dec!(400)), &params)).abs() < 1e-9);
        // contract 18/36 => 50, ETF 200/400 => 50
        assert!((flexibility_score(&plan(18, dec!(200)), &params) - 50.0).abs() < 1e-9);
        // ETF beyond the cap floors at zero
        assert!((flexibility_score(&plan(0, dec!(900)), &params) - 60.0).abs() < 1e-9);
        assert!((flexibility_score(&plan(48, Decimal::ZERO), &params) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn renewable_is_identity() {
        assert_eq!(renewable_score(&plan(12, Decimal::ZERO)), 35.0);
    }

    #[test]
    fn missing_rating_is_neutral() {
        let params = ScoringParams::default();
        assert_eq!(rating_score(&supplier(None, 500), &params), 50.0);
        assert_eq!(rating_score(&supplier(Some(5.0), 0), &params), 50.0);
    }

    #[test]
    fn more_reviews_move_rating_away_from_neutral() {
        let params = ScoringParams::default();
        let few = rating_score(&supplier(Some(5.0), 10), &params);
        let many = rating_score(&supplier(Some(5.0), 1_000), &params);
        assert!(few > 50.0);
        assert!(many > few);
        assert!(many < 100.0);

        assert!((review_confidence(10, &params) - 0.6).abs() < 1e-9);
        assert!((review_confidence(20, &params) - 0.8).abs() < 1e-9);
    }
}
