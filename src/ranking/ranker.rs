use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogSnapshot, Plan, PlanDefect, Supplier};
use crate::cost::{compute_cost_with, CostBreakdown};
use crate::error::AdvisorError;
use crate::ranking::filter::is_eligible;
use crate::ranking::{
    ExcludedPlan, RankedPlan, RankingParams, RankingRequest, RankingResult, RankingStatus,
};
use crate::scoring::factors::{
    cost_score, flexibility_score, rating_score, renewable_score, CostRange,
};
use crate::scoring::{FactorScores, PlanScores};

struct Candidate<'a> {
    plan: &'a Plan,
    supplier: &'a Supplier,
    cost: CostBreakdown,
}

struct Scored<'a> {
    candidate: Candidate<'a>,
    scores: PlanScores,
}

/// Filters, scores and orders the catalog for one household.
///
/// Only precondition violations on the request are errors. Plans with bad
/// data are listed in [`RankingResult::excluded`] and the rest are still ranked.
pub fn rank_plans(
    catalog: &CatalogSnapshot,
    request: &RankingRequest,
    params: &RankingParams,
) -> Result<RankingResult, AdvisorError> {
    request.usage.validate()?;

    let mut excluded: Vec<ExcludedPlan> = catalog
        .rejected
        .iter()
        .map(|entry| ExcludedPlan {
            plan_id: entry.plan_id.clone(),
            reason: PlanDefect::Undecodable(entry.reason.clone()).to_string(),
        })
        .collect();
    let mut filtered_out_count = 0usize;
    let mut candidates = Vec::new();

    for plan in &catalog.plans {
        let Some(supplier) = catalog.supplier(&plan.supplier_id) else {
            exclude(
                &mut excluded,
                plan,
                PlanDefect::UnknownSupplier(plan.supplier_id.clone()),
            );
            continue;
        };
        if !is_eligible(plan, supplier, &request.region, &request.filters) {
            filtered_out_count += 1;
            continue;
        }
        if let Err(defect) = plan.check_terms() {
            exclude(&mut excluded, plan, defect);
            continue;
        }
        match compute_cost_with(plan, &request.usage, &params.cost) {
            Ok(cost) => candidates.push(Candidate {
                plan,
                supplier,
                cost,
            }),
            Err(_) => exclude(&mut excluded, plan, PlanDefect::CostOverflow),
        }
    }

    let eligible_count = candidates.len();
    let Some(range) = CostRange::from_costs(candidates.iter().map(|c| c.cost.total_annual_cost))
    else {
        info!(
            region = %request.region,
            filtered_out = filtered_out_count,
            excluded = excluded.len(),
            "no eligible plans"
        );
        return Ok(RankingResult {
            status: RankingStatus::NoEligiblePlans,
            ranked_plans: Vec::new(),
            eligible_count,
            filtered_out_count,
            excluded,
            generated_at: request.generated_at,
        });
    };

    let mut scored: Vec<Scored<'_>> = candidates
        .into_iter()
        .map(|candidate| {
            let factors = FactorScores {
                cost: cost_score(
                    candidate.cost.total_annual_cost,
                    range,
                    request.usage.confidence,
                    &params.scoring,
                ),
                flexibility: flexibility_score(candidate.plan, &params.scoring),
                renewable: renewable_score(candidate.plan),
                rating: rating_score(candidate.supplier, &params.scoring),
            };
            let scores = PlanScores::new(factors, &request.preferences);
            debug!(plan = %candidate.plan.id, composite = scores.composite, "scored plan");
            Scored { candidate, scores }
        })
        .collect();

    scored.sort_by(compare_ranked);

    let annual_kwh = request.usage.annual_kwh;
    let current_cost = request
        .current_plan
        .as_ref()
        .and_then(|current| current.annual_cost(annual_kwh));

    let ranked_plans: Vec<RankedPlan> = scored
        .into_iter()
        .take(request.top_n)
        .enumerate()
        .map(|(idx, entry)| {
            let projected_annual_cost = entry.candidate.cost.total_annual_cost;
            RankedPlan {
                rank: idx + 1,
                plan: entry.candidate.plan.clone(),
                supplier_name: entry.candidate.supplier.name.clone(),
                scores: entry.scores,
                projected_annual_cost,
                projected_annual_savings: current_cost
                    .and_then(|c| c.checked_sub(projected_annual_cost)),
                cost: entry.candidate.cost,
            }
        })
        .collect();

    info!(
        region = %request.region,
        eligible = eligible_count,
        returned = ranked_plans.len(),
        excluded = excluded.len(),
        "ranked plans"
    );

    Ok(RankingResult {
        status: RankingStatus::Ranked,
        ranked_plans,
        eligible_count,
        filtered_out_count,
        excluded,
        generated_at: request.generated_at,
    })
}

/// Composite descending, then renewable share descending, then annual cost
/// ascending, then plan id ascending.
fn compare_ranked(a: &Scored<'_>, b: &Scored<'_>) -> Ordering {
    b.scores
        .composite
        .total_cmp(&a.scores.composite)
        .then_with(|| {
            b.candidate
                .plan
                .renewable_pct
                .total_cmp(&a.candidate.plan.renewable_pct)
        })
        .then_with(|| {
            a.candidate
                .cost
                .total_annual_cost
                .cmp(&b.candidate.cost.total_annual_cost)
        })
        .then_with(|| a.candidate.plan.id.cmp(&b.candidate.plan.id))
}

fn exclude(excluded: &mut Vec<ExcludedPlan>, plan: &Plan, defect: PlanDefect) {
    warn!(plan = %plan.id, "excluding plan: {defect}");
    excluded.push(ExcludedPlan {
        plan_id: plan.id.clone(),
        reason: defect.to_string(),
    });
}
