pub mod composite;
pub mod factors;
pub mod preferences;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub use composite::compose;
pub use preferences::UserPreferences;

/// Score assigned when a factor carries no information.
pub const NEUTRAL_SCORE: f64 = 50.0;
pub const MAX_SCORE: f64 = 100.0;

/// The four factor scores for one plan, each within [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FactorScores {
    pub cost: f64,
    pub flexibility: f64,
    pub renewable: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlanScores {
    #[serde(flatten)]
    pub factors: FactorScores,
    pub composite: f64,
}

impl PlanScores {
    pub fn new(factors: FactorScores, preferences: &UserPreferences) -> Self {
        Self {
            factors,
            composite: compose(&factors, preferences),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringParams {
    /// ETF at or above which the fee term of the flexibility score is zero.
    #[serde(default = "default_etf_cap")]
    pub etf_cap: Decimal,
    /// Contract length at or above which the contract term is zero.
    #[serde(default = "default_max_contract_months")]
    pub max_contract_months: u32,
    #[serde(default = "default_contract_weight")]
    pub contract_weight: f64,
    #[serde(default = "default_etf_weight")]
    pub etf_weight: f64,
    /// Lowest usage confidence the cost penalty will act on.
    #[serde(default = "default_cost_confidence_floor")]
    pub cost_confidence_floor: f64,
    /// Review count at which rating confidence reaches one half.
    #[serde(default = "default_review_half_point")]
    pub review_half_point: f64,
    #[serde(default = "default_min_reviews")]
    pub min_reviews_for_full_confidence: u32,
    #[serde(default = "default_low_review_cap")]
    pub low_review_confidence_cap: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            etf_cap: default_etf_cap(),
            max_contract_months: default_max_contract_months(),
            contract_weight: default_contract_weight(),
            etf_weight: default_etf_weight(),
            cost_confidence_floor: default_cost_confidence_floor(),
            review_half_point: default_review_half_point(),
            min_reviews_for_full_confidence: default_min_reviews(),
            low_review_confidence_cap: default_low_review_cap(),
        }
    }
}

fn default_etf_cap() -> Decimal {
    dec!(400)
}

fn default_max_contract_months() -> u32 {
    36
}

fn default_contract_weight() -> f64 {
    0.6
}

fn default_etf_weight() -> f64 {
    0.4
}

fn default_cost_confidence_floor() -> f64 {
    0.5
}

fn default_review_half_point() -> f64 {
    5.0
}

fn default_min_reviews() -> u32 {
    20
}

fn default_low_review_cap() -> f64 {
    0.6
}
