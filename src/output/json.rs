use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Single-line form for piping into other tools.
pub fn render_json_line<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::switching::CurrentPlan;

    #[test]
    fn money_serializes_as_exact_strings() {
        let current = CurrentPlan {
            name: "Incumbent".to_string(),
            rate_per_kwh: dec!(0.128),
            monthly_fee: dec!(5),
            early_termination_fee: dec!(150.00),
            contract_end_date: None,
        };
        let line = render_json_line(&current).unwrap();
        assert!(line.contains(r#""rate_per_kwh":"0.128""#));
        assert!(line.contains(r#""early_termination_fee":"150.00""#));
        assert!(render_json(&current).unwrap().contains('\n'));
    }
}
