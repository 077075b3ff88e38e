pub mod profile;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
pub use profile::SeasonalProfile;

pub const MONTHS: usize = 12;

/// Largest gap tolerated between the stated annual total and the monthly sum.
const ANNUAL_TOLERANCE_KWH: Decimal = Decimal::ONE;

/// Twelve-month consumption forecast supplied by the usage-analysis component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageProjection {
    pub monthly_kwh: Vec<Decimal>,
    pub annual_kwh: Decimal,
    pub confidence: f64,
}

impl UsageProjection {
    pub fn new(monthly_kwh: Vec<Decimal>, confidence: f64) -> Result<Self, AdvisorError> {
        let annual_kwh = monthly_kwh.iter().copied().sum();
        let projection = Self {
            monthly_kwh,
            annual_kwh,
            confidence,
        };
        projection.validate()?;
        Ok(projection)
    }

    /// Spreads an annual total over the year using `profile`. December absorbs
    /// the rounding residual so the months always sum to `annual_kwh`. A month
    /// never takes more than what is left, so the residual cannot go negative.
    pub fn from_annual(
        annual_kwh: Decimal,
        confidence: f64,
        profile: SeasonalProfile,
    ) -> Result<Self, AdvisorError> {
        if annual_kwh < Decimal::ZERO {
            return Err(AdvisorError::NegativeUsage {
                month: 0,
                kwh: annual_kwh,
            });
        }
        let weights = profile.weights();
        let mut monthly_kwh = Vec::with_capacity(MONTHS);
        let mut allocated = Decimal::ZERO;
        for weight in &weights[..MONTHS - 1] {
            let kwh = (annual_kwh * *weight)
                .round_dp(2)
                .min(annual_kwh - allocated);
            allocated += kwh;
            monthly_kwh.push(kwh);
        }
        monthly_kwh.push(annual_kwh - allocated);
        let projection = Self {
            monthly_kwh,
            annual_kwh,
            confidence,
        };
        projection.validate()?;
        Ok(projection)
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.monthly_kwh.len() != MONTHS {
            return Err(AdvisorError::InvalidProjection(format!(
                "expected {MONTHS} monthly values, got {}",
                self.monthly_kwh.len()
            )));
        }
        for (idx, kwh) in self.monthly_kwh.iter().enumerate() {
            if *kwh < Decimal::ZERO {
                return Err(AdvisorError::NegativeUsage {
                    month: idx + 1,
                    kwh: *kwh,
                });
            }
        }
        if self.annual_kwh < Decimal::ZERO {
            return Err(AdvisorError::NegativeUsage {
                month: 0,
                kwh: self.annual_kwh,
            });
        }
        let monthly_total: Decimal = self.monthly_kwh.iter().copied().sum();
        if (monthly_total - self.annual_kwh).abs() > ANNUAL_TOLERANCE_KWH {
            return Err(AdvisorError::InvalidProjection(format!(
                "annual total {} does not match monthly sum {monthly_total}",
                self.annual_kwh
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(AdvisorError::InvalidProjection(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn average_monthly_kwh(&self) -> Decimal {
        self.annual_kwh / Decimal::from(MONTHS)
    }

    pub fn peak_month(&self) -> Option<usize> {
        self.monthly_kwh
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map(|(idx, _)| idx + 1)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn seasonal_months_sum_to_annual_total() {
        let projection =
            UsageProjection::from_annual(dec!(10537), 0.8, SeasonalProfile::Seasonal)
                .expect("valid projection");
        let total: Decimal = projection.monthly_kwh.iter().copied().sum();
        assert_eq!(total, dec!(10537));
        assert_eq!(projection.peak_month(), Some(1));
    }

    #[test]
    fn flat_profile_splits_evenly() {
        let projection = UsageProjection::from_annual(dec!(12000), 1.0, SeasonalProfile::Flat)
            .expect("valid projection");
        assert!(projection.monthly_kwh.iter().all(|m| *m == dec!(1000)));
        assert_eq!(projection.average_monthly_kwh(), dec!(1000));
    }

    #[test]
    fn rejects_negative_month() {
        let mut months = vec![dec!(100); 12];
        months[4] = dec!(-5);
        let err = UsageProjection::new(months, 0.5).unwrap_err();
        assert_eq!(
            err,
            AdvisorError::NegativeUsage {
                month: 5,
                kwh: dec!(-5)
            }
        );
    }

    #[test]
    fn rejects_wrong_month_count_and_confidence() {
        assert!(UsageProjection::new(vec![dec!(100); 11], 0.5).is_err());
        assert!(UsageProjection::new(vec![dec!(100); 12], 1.2).is_err());
    }

    #[test]
    fn rejects_annual_mismatch() {
        let projection = UsageProjection {
            monthly_kwh: vec![dec!(100); 12],
            annual_kwh: dec!(5000),
            confidence: 0.9,
        };
        assert!(matches!(
            projection.validate(),
            Err(AdvisorError::InvalidProjection(_))
        ));
    }

    #[test]
    fn tiny_annual_totals_never_produce_negative_months() {
        for profile in [SeasonalProfile::Flat, SeasonalProfile::Seasonal] {
            for annual in [dec!(0.1), dec!(0.05), dec!(0.01), dec!(0.5), dec!(0.99)] {
                let projection = UsageProjection::from_annual(annual, 0.9, profile)
                    .expect("small totals are valid");
                assert!(projection.monthly_kwh.iter().all(|m| *m >= Decimal::ZERO));
                let total: Decimal = projection.monthly_kwh.iter().copied().sum();
                assert_eq!(total, annual);
            }
        }
    }
}
