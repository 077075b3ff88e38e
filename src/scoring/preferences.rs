use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

pub const WEIGHT_TOTAL: u32 = 100;

/// Household weighting of the four scoring factors. The weights always sum to
/// exactly 100; there is no way to build a value that does not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "PreferenceWeights", into = "PreferenceWeights")]
pub struct UserPreferences {
    cost: u32,
    flexibility: u32,
    renewable: u32,
    rating: u32,
}

/// Unvalidated weights as they arrive from config files or callers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceWeights {
    pub cost: u32,
    pub flexibility: u32,
    pub renewable: u32,
    pub rating: u32,
}

impl UserPreferences {
    pub fn new(
        cost: u32,
        flexibility: u32,
        renewable: u32,
        rating: u32,
    ) -> Result<Self, AdvisorError> {
        let total = cost
            .saturating_add(flexibility)
            .saturating_add(renewable)
            .saturating_add(rating);
        if total != WEIGHT_TOTAL {
            return Err(AdvisorError::InvalidPreferences { total });
        }
        Ok(Self {
            cost,
            flexibility,
            renewable,
            rating,
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn flexibility(&self) -> u32 {
        self.flexibility
    }

    pub fn renewable(&self) -> u32 {
        self.renewable
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            cost: 40,
            flexibility: 20,
            renewable: 20,
            rating: 20,
        }
    }
}

impl TryFrom<PreferenceWeights> for UserPreferences {
    type Error = AdvisorError;

    fn try_from(value: PreferenceWeights) -> Result<Self, Self::Error> {
        Self::new(value.cost, value.flexibility, value.renewable, value.rating)
    }
}

impl From<UserPreferences> for PreferenceWeights {
    fn from(value: UserPreferences) -> Self {
        Self {
            cost: value.cost,
            flexibility: value.flexibility,
            renewable: value.renewable,
            rating: value.rating,
        }
    }
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        UserPreferences::default().into()
    }
}
