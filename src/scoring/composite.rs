use crate::scoring::preferences::WEIGHT_TOTAL;
use crate::scoring::{FactorScores, UserPreferences, MAX_SCORE};

/// Weighted average of the factor scores. Terms are always summed in the order
/// cost, flexibility, renewable, rating so identical inputs give identical bits.
pub fn compose(factors: &FactorScores, preferences: &UserPreferences) -> f64 {
    let mut weighted = 0.0;
    weighted += factors.cost * f64::from(preferences.cost());
    weighted += factors.flexibility * f64::from(preferences.flexibility());
    weighted += factors.renewable * f64::from(preferences.renewable());
    weighted += factors.rating * f64::from(preferences.rating());
    (weighted / f64::from(WEIGHT_TOTAL)).clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> FactorScores {
        FactorScores {
            cost: 80.0,
            flexibility: 40.0,
            renewable: 100.0,
            rating: 60.0,
        }
    }

    #[test]
    fn weights_factors_by_preference() {
        let prefs = UserPreferences::new(40, 20, 20, 20).expect("valid");
        let composite = compose(&factors(), &prefs);
        assert!((composite - 72.0).abs() < 1e-9);
    }

    #[test]
    fn single_factor_preference_returns_that_factor() {
        let prefs = UserPreferences::new(0, 0, 100, 0).expect("valid");
        assert_eq!(compose(&factors(), &prefs), 100.0);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let prefs = UserPreferences::new(33, 33, 17, 17).expect("valid");
        let first = compose(&factors(), &prefs).to_bits();
        for _ in 0..100 {
            assert_eq!(compose(&factors(), &prefs).to_bits(), first);
        }
    }
}
