use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cost::CostParams;
use crate::error::AdvisorError;
use crate::ranking::{RankingParams, DEFAULT_TOP_N};
use crate::scoring::preferences::PreferenceWeights;
use crate::scoring::{ScoringParams, UserPreferences};
use crate::switching::{CurrentPlan, SwitchingParams};
use crate::usage::SeasonalProfile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub household: HouseholdConfig,
    #[serde(default)]
    pub preferences: PreferenceWeights,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub cost: CostParams,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub switching: SwitchingParams,
    #[serde(default)]
    pub current_plan: Option<CurrentPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_annual_kwh")]
    pub annual_kwh: Decimal,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub profile: SeasonalProfile,
    #[serde(default)]
    pub catalog_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub region: Option<String>,
    pub annual_kwh: Option<Decimal>,
    pub confidence: Option<f64>,
    pub catalog_path: Option<String>,
    pub preferences: Option<PreferenceWeights>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/plan-advisor/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(region) = overrides.region {
            self.household.region = region;
        }
        if let Some(annual_kwh) = overrides.annual_kwh {
            self.household.annual_kwh = annual_kwh;
        }
        if let Some(confidence) = overrides.confidence {
            self.household.confidence = confidence;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.household.catalog_path = catalog_path;
        }
        if let Some(preferences) = overrides.preferences {
            self.preferences = preferences;
        }
    }

    /// Validated preference weights.
    pub fn user_preferences(&self) -> Result<UserPreferences, AdvisorError> {
        UserPreferences::try_from(self.preferences)
    }

    pub fn ranking_params(&self) -> RankingParams {
        RankingParams {
            cost: self.cost.clone(),
            scoring: self.scoring.clone(),
        }
    }

    pub fn resolved_catalog_path(&self) -> Option<PathBuf> {
        if self.household.catalog_path.trim().is_empty() {
            None
        } else {
            Some(expand_tilde(&self.household.catalog_path))
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[household]
region = "north"
annual_kwh = 10500
confidence = 0.8
profile = "seasonal"
catalog_path = ""

[preferences]
cost = 40
flexibility = 20
renewable = 20
rating = 20

[ranking]
top_n = 3

[cost]
variable_buffer_min = 0.05
variable_buffer_max = 0.15
default_peak_fraction = 0.5

[scoring]
etf_cap = 400
max_contract_months = 36
contract_weight = 0.6
etf_weight = 0.4
cost_confidence_floor = 0.5
review_half_point = 5.0
min_reviews_for_full_confidence = 20
low_review_confidence_cap = 0.6

[switching]
contract_end_window_days = 30
max_break_even_months = 18
savings_to_etf_multiple = 2

# [current_plan]
# name = "Incumbent Fixed"
# rate_per_kwh = 0.128
# monthly_fee = 5.0
# early_termination_fee = 150
# contract_end_date = "2027-01-31"
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            annual_kwh: default_annual_kwh(),
            confidence: default_confidence(),
            profile: SeasonalProfile::default(),
            catalog_path: String::new(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_region() -> String {
    "north".to_string()
}

fn default_annual_kwh() -> Decimal {
    dec!(10500)
}

fn default_confidence() -> f64 {
    0.8
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_to_defaults() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template parses");
        let defaults = Config::default();
        assert_eq!(parsed.household.region, defaults.household.region);
        assert_eq!(parsed.household.annual_kwh, defaults.household.annual_kwh);
        assert_eq!(parsed.preferences, defaults.preferences);
        assert_eq!(parsed.scoring, defaults.scoring);
        assert_eq!(parsed.switching, defaults.switching);
        assert_eq!(parsed.cost, defaults.cost);
        assert!(parsed.current_plan.is_none());
        assert!(parsed.resolved_catalog_path().is_none());
    }

    #[test]
    fn invalid_weights_surface_when_requested() {
        let parsed: Config = toml::from_str(
            "[preferences]\ncost = 50\nflexibility = 20\nrenewable = 20\nrating = 20\n",
        )
        .expect("weights parse unvalidated");
        assert_eq!(
            parsed.user_preferences(),
            Err(AdvisorError::InvalidPreferences { total: 110 })
        );
    }

    #[test]
    fn overrides_replace_household_fields() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            region: Some("south".to_string()),
            annual_kwh: Some(dec!(8000)),
            confidence: None,
            catalog_path: Some("catalog.json".to_string()),
            preferences: None,
        });
        assert_eq!(config.household.region, "south");
        assert_eq!(config.household.annual_kwh, dec!(8000));
        assert_eq!(config.household.confidence, 0.8);
        assert_eq!(
            config.resolved_catalog_path(),
            Some(PathBuf::from("catalog.json"))
        );
    }

    #[test]
    fn reads_current_plan_section() {
        let parsed: Config = toml::from_str(
            "[current_plan]\nrate_per_kwh = 0.128\nearly_termination_fee = 150\ncontract_end_date = \"2027-01-31\"\n",
        )
        .expect("current plan parses");
        let current = parsed.current_plan.expect("present");
        assert_eq!(current.rate_per_kwh, dec!(0.128));
        assert_eq!(current.early_termination_fee, dec!(150));
        assert!(current.contract_end_date.is_some());
    }
}
