use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::usage::MONTHS;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalProfile {
    Flat,
    /// Winter heating and summer cooling peaks.
    #[default]
    Seasonal,
}

impl SeasonalProfile {
    /// Monthly shares, January first. Each profile sums to exactly 1.
    pub fn weights(self) -> [Decimal; MONTHS] {
        match self {
            Self::Flat => [Decimal::ONE / Decimal::from(MONTHS); MONTHS],
            Self::Seasonal => [
                dec!(0.105),
                dec!(0.095),
                dec!(0.085),
                dec!(0.070),
                dec!(0.065),
                dec!(0.080),
                dec!(0.100),
                dec!(0.100),
                dec!(0.075),
                dec!(0.065),
                dec!(0.075),
                dec!(0.085),
            ],
        }
    }
}
