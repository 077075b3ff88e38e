use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RateError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlanId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SupplierId(pub String);

impl SupplierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for SupplierId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Fixed,
    Tiered,
    TimeOfUse,
    Variable,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [
        PlanType::Fixed,
        PlanType::Tiered,
        PlanType::TimeOfUse,
        PlanType::Variable,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Tiered => "tiered",
            Self::TimeOfUse => "time_of_use",
            Self::Variable => "variable",
        }
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Fixed => "Fixed",
            Self::Tiered => "Tiered",
            Self::TimeOfUse => "Time of use",
            Self::Variable => "Variable",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown plan type: {0}")]
pub struct PlanTypeParseError(pub String);

impl FromStr for PlanType {
    type Err = PlanTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "fixed" | "flat" => Ok(Self::Fixed),
            "tiered" | "tier" => Ok(Self::Tiered),
            "time_of_use" | "tou" => Ok(Self::TimeOfUse),
            "variable" | "indexed" => Ok(Self::Variable),
            _ => Err(PlanTypeParseError(s.to_string())),
        }
    }
}

/// One usage band of a tiered tariff. `up_to_kwh` is the cumulative ceiling;
/// `None` marks the unbounded final tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tier {
    pub up_to_kwh: Option<Decimal>,
    pub rate_per_kwh: Decimal,
}

impl Tier {
    pub fn bounded(up_to_kwh: Decimal, rate_per_kwh: Decimal) -> Self {
        Self {
            up_to_kwh: Some(up_to_kwh),
            rate_per_kwh,
        }
    }

    pub fn unbounded(rate_per_kwh: Decimal) -> Self {
        Self {
            up_to_kwh: None,
            rate_per_kwh,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateStructure {
    Fixed {
        rate_per_kwh: Decimal,
    },
    Tiered {
        tiers: Vec<Tier>,
    },
    TimeOfUse {
        peak_rate: Decimal,
        off_peak_rate: Decimal,
        #[serde(default)]
        peak_fraction: Option<Decimal>,
    },
    Variable {
        base_rate: Decimal,
        #[serde(default)]
        historical_average_rate: Option<Decimal>,
    },
}

impl RateStructure {
    pub fn plan_type(&self) -> PlanType {
        match self {
            Self::Fixed { .. } => PlanType::Fixed,
            Self::Tiered { .. } => PlanType::Tiered,
            Self::TimeOfUse { .. } => PlanType::TimeOfUse,
            Self::Variable { .. } => PlanType::Variable,
        }
    }

    pub fn validate(&self) -> Result<(), RateError> {
        match self {
            Self::Fixed { rate_per_kwh } => non_negative(*rate_per_kwh),
            Self::Tiered { tiers } => validate_tiers(tiers),
            Self::TimeOfUse {
                peak_rate,
                off_peak_rate,
                peak_fraction,
            } => {
                non_negative(*peak_rate)?;
                non_negative(*off_peak_rate)?;
                if let Some(fraction) = peak_fraction {
                    if *fraction < Decimal::ZERO || *fraction > Decimal::ONE {
                        return Err(RateError::PeakFractionOutOfRange);
                    }
                }
                Ok(())
            }
            Self::Variable {
                base_rate,
                historical_average_rate,
            } => {
                non_negative(*base_rate)?;
                if let Some(rate) = historical_average_rate {
                    non_negative(*rate)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for RateStructure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed { rate_per_kwh } => write!(f, "fixed {rate_per_kwh}/kWh"),
            Self::Tiered { tiers } => write!(f, "tiered ({} tiers)", tiers.len()),
            Self::TimeOfUse {
                peak_rate,
                off_peak_rate,
                ..
            } => write!(f, "peak {peak_rate} / off-peak {off_peak_rate}"),
            Self::Variable {
                base_rate,
                historical_average_rate,
            } => match historical_average_rate {
                Some(avg) => write!(f, "variable (avg {avg}/kWh)"),
                None => write!(f, "variable (base {base_rate}/kWh)"),
            },
        }
    }
}

fn non_negative(rate: Decimal) -> Result<(), RateError> {
    if rate < Decimal::ZERO {
        Err(RateError::NegativeRate)
    } else {
        Ok(())
    }
}

fn validate_tiers(tiers: &[Tier]) -> Result<(), RateError> {
    let Some((last, bounded)) = tiers.split_last() else {
        return Err(RateError::NoTiers);
    };
    let mut previous = Decimal::ZERO;
    for tier in bounded {
        non_negative(tier.rate_per_kwh)?;
        let Some(ceiling) = tier.up_to_kwh else {
            return Err(RateError::UnboundedTierNotLast);
        };
        if ceiling <= previous {
            return Err(RateError::NonIncreasingTiers);
        }
        previous = ceiling;
    }
    non_negative(last.rate_per_kwh)?;
    if last.up_to_kwh.is_some() {
        return Err(RateError::BoundedFinalTier);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub supplier_id: SupplierId,
    pub rate: RateStructure,
    /// Contract term in months; 0 is month-to-month.
    #[serde(default)]
    pub contract_months: u32,
    #[serde(default)]
    pub early_termination_fee: Decimal,
    #[serde(default)]
    pub renewable_pct: f64,
    #[serde(default)]
    pub monthly_fee: Decimal,
    #[serde(default)]
    pub connection_fee: Decimal,
    #[serde(default)]
    pub regions: BTreeSet<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Plan {
    pub fn plan_type(&self) -> PlanType {
        self.rate.plan_type()
    }

    pub fn serves_region(&self, region: &str) -> bool {
        self.regions
            .iter()
            .any(|r| r.eq_ignore_ascii_case(region.trim()))
    }

    /// Checks everything the scorers rely on beyond the rate structure itself.
    pub fn check_terms(&self) -> Result<(), PlanDefect> {
        self.rate.validate().map_err(PlanDefect::Rate)?;
        if self.early_termination_fee < Decimal::ZERO {
            return Err(PlanDefect::NegativeFee("early termination fee"));
        }
        if self.monthly_fee < Decimal::ZERO {
            return Err(PlanDefect::NegativeFee("monthly fee"));
        }
        if self.connection_fee < Decimal::ZERO {
            return Err(PlanDefect::NegativeFee("connection fee"));
        }
        if !(0.0..=100.0).contains(&self.renewable_pct) {
            return Err(PlanDefect::RenewableOutOfRange(self.renewable_pct));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanDefect {
    #[error("{0}")]
    Rate(RateError),
    #[error("{0} must not be negative")]
    NegativeFee(&'static str),
    #[error("renewable percentage {0} outside [0, 100]")]
    RenewableOutOfRange(f64),
    #[error("supplier {0} not found in catalog")]
    UnknownSupplier(SupplierId),
    #[error("undecodable catalog entry: {0}")]
    Undecodable(String),
    #[error("annual cost exceeds the representable range")]
    CostOverflow,
}

fn default_true() -> bool {
    true
}
