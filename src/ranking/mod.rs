pub mod filter;
pub mod ranker;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Plan, PlanId};
use crate::cost::{CostBreakdown, CostParams};
use crate::scoring::{PlanScores, ScoringParams, UserPreferences};
use crate::switching::CurrentPlan;
use crate::usage::UsageProjection;

pub use filter::PlanFilters;
pub use ranker::rank_plans;

pub const DEFAULT_TOP_N: usize = 3;

/// Everything one household brings to a ranking pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingRequest {
    pub region: String,
    pub usage: UsageProjection,
    pub preferences: UserPreferences,
    #[serde(default)]
    pub filters: PlanFilters,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Used to report savings per ranked plan; does not affect ordering.
    #[serde(default)]
    pub current_plan: Option<CurrentPlan>,
    /// Stamped onto the result as-is so repeated runs stay identical.
    pub generated_at: DateTime<Utc>,
}

impl RankingRequest {
    pub fn new(
        region: impl Into<String>,
        usage: UsageProjection,
        preferences: UserPreferences,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            region: region.into(),
            usage,
            preferences,
            filters: PlanFilters::default(),
            top_n: DEFAULT_TOP_N,
            current_plan: None,
            generated_at,
        }
    }

    pub fn with_filters(mut self, filters: PlanFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_current_plan(mut self, current_plan: CurrentPlan) -> Self {
        self.current_plan = Some(current_plan);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RankingParams {
    #[serde(default)]
    pub cost: CostParams,
    #[serde(default)]
    pub scoring: ScoringParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedPlan {
    pub rank: usize,
    pub plan: Plan,
    pub supplier_name: String,
    pub scores: PlanScores,
    pub cost: CostBreakdown,
    pub projected_annual_cost: Decimal,
    pub projected_annual_savings: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExcludedPlan {
    pub plan_id: PlanId,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankingStatus {
    Ranked,
    NoEligiblePlans,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingResult {
    pub status: RankingStatus,
    pub ranked_plans: Vec<RankedPlan>,
    /// Plans that passed filtering and were scored.
    pub eligible_count: usize,
    /// Plans removed by the region, activity, or caller filters.
    pub filtered_out_count: usize,
    /// Plans dropped for data-quality problems.
    pub excluded: Vec<ExcludedPlan>,
    pub generated_at: DateTime<Utc>,
}

impl RankingResult {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn top(&self) -> Option<&RankedPlan> {
        self.ranked_plans.first()
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}
