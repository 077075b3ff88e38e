pub mod analyzer;

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::PlanId;

pub use analyzer::{analyze_switching, analyze_switching_with};

/// The plan the household is on today.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentPlan {
    #[serde(default)]
    pub name: String,
    pub rate_per_kwh: Decimal,
    #[serde(default)]
    pub monthly_fee: Decimal,
    #[serde(default)]
    pub early_termination_fee: Decimal,
    /// `None` for month-to-month service.
    #[serde(default)]
    pub contract_end_date: Option<NaiveDate>,
}

impl CurrentPlan {
    /// `None` if the total does not fit in a `Decimal`.
    pub fn annual_cost(&self, annual_kwh: Decimal) -> Option<Decimal> {
        self.rate_per_kwh
            .checked_mul(annual_kwh)?
            .checked_add(self.monthly_fee.checked_mul(Decimal::from(12))?)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwitchAction {
    SwitchNow,
    Wait,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwitchReason {
    ContractEndingSoon,
    NoTerminationFee,
    BreakEvenTooDistant,
    SavingsExceedPenalty,
    MarginalBenefit,
}

impl SwitchReason {
    pub fn action(self) -> SwitchAction {
        match self {
            Self::NoTerminationFee | Self::SavingsExceedPenalty => SwitchAction::SwitchNow,
            Self::ContractEndingSoon | Self::BreakEvenTooDistant | Self::MarginalBenefit => {
                SwitchAction::Wait
            }
        }
    }
}

impl Display for SwitchReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::ContractEndingSoon => "contract ending soon",
            Self::NoTerminationFee => "no termination penalty",
            Self::BreakEvenTooDistant => "break-even too distant",
            Self::SavingsExceedPenalty => "savings substantially exceed penalty",
            Self::MarginalBenefit => "marginal benefit; wait for contract end",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchingAnalysis {
    pub candidate_plan_id: PlanId,
    pub days_until_contract_end: Option<i64>,
    /// Fee payable if switching today; zero once the contract has lapsed.
    pub early_termination_fee: Decimal,
    pub current_annual_cost: Decimal,
    pub candidate_annual_cost: Decimal,
    pub monthly_savings: Decimal,
    pub annual_savings: Decimal,
    /// `None` when the candidate saves nothing.
    pub break_even_months: Option<u32>,
    pub should_wait: bool,
    pub action: SwitchAction,
    pub reason: SwitchReason,
    pub optimal_switch_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchingParams {
    #[serde(default = "default_contract_end_window_days")]
    pub contract_end_window_days: i64,
    #[serde(default = "default_max_break_even_months")]
    pub max_break_even_months: u32,
    #[serde(default = "default_savings_to_etf_multiple")]
    pub savings_to_etf_multiple: Decimal,
}

impl Default for SwitchingParams {
    fn default() -> Self {
        Self {
            contract_end_window_days: default_contract_end_window_days(),
            max_break_even_months: default_max_break_even_months(),
            savings_to_etf_multiple: default_savings_to_etf_multiple(),
        }
    }
}

fn default_contract_end_window_days() -> i64 {
    30
}

fn default_max_break_even_months() -> u32 {
    18
}

fn default_savings_to_etf_multiple() -> Decimal {
    dec!(2)
}
