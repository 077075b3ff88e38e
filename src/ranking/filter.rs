use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Plan, PlanType, Supplier};

/// Optional caller-supplied narrowing of the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanFilters {
    #[serde(default)]
    pub max_contract_months: Option<u32>,
    #[serde(default)]
    pub min_renewable_pct: Option<f64>,
    /// Empty means every plan type is allowed.
    #[serde(default)]
    pub plan_types: BTreeSet<PlanType>,
}

impl PlanFilters {
    pub fn matches(&self, plan: &Plan) -> bool {
        if let Some(max) = self.max_contract_months {
            if plan.contract_months > max {
                return false;
            }
        }
        if let Some(min) = self.min_renewable_pct {
            if plan.renewable_pct < min {
                return false;
            }
        }
        self.plan_types.is_empty() || self.plan_types.contains(&plan.plan_type())
    }
}

/// Active plan from an active supplier, offered in `region`, passing `filters`.
pub fn is_eligible(plan: &Plan, supplier: &Supplier, region: &str, filters: &PlanFilters) -> bool {
    plan.is_active && supplier.is_active && plan.serves_region(region) && filters.matches(plan)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::catalog::{PlanId, RateStructure, SupplierId};

    fn plan() -> Plan {
        Plan {
            id: PlanId::new("p"),
            name: "p".to_string(),
            supplier_id: SupplierId::new("s"),
            rate: RateStructure::Variable {
                base_rate: dec!(0.1),
                historical_average_rate: None,
            },
            contract_months: 12,
            early_termination_fee: Decimal::ZERO,
            renewable_pct: 40.0,
            monthly_fee: Decimal::ZERO,
            connection_fee: Decimal::ZERO,
            regions: ["North".to_string()].into_iter().collect(),
            is_active: true,
        }
    }

    fn supplier() -> Supplier {
        Supplier {
            id: SupplierId::new("s"),
            name: "s".to_string(),
            average_rating: None,
            review_count: 0,
            is_active: true,
        }
    }

    #[test]
    fn region_match_ignores_case() {
        let filters = PlanFilters::default();
        assert!(is_eligible(&plan(), &supplier(), "north", &filters));
        assert!(!is_eligible(&plan(), &supplier(), "south", &filters));
    }

    #[test]
    fn inactive_plan_or_supplier_is_ineligible() {
        let filters = PlanFilters::default();
        let mut inactive = plan();
        inactive.is_active = false;
        assert!(!is_eligible(&inactive, &supplier(), "north", &filters));
        let mut closed = supplier();
        closed.is_active = false;
        assert!(!is_eligible(&plan(), &closed, "north", &filters));
    }

    #[test]
    fn caller_filters_narrow_the_catalog() {
        let p = plan();
        let short = PlanFilters {
            max_contract_months: Some(6),
            ..PlanFilters::default()
        };
        assert!(!short.matches(&p));

        let green = PlanFilters {
            min_renewable_pct: Some(50.0),
            ..PlanFilters::default()
        };
        assert!(!green.matches(&p));

        let fixed_only = PlanFilters {
            plan_types: [PlanType::Fixed].into_iter().collect(),
            ..PlanFilters::default()
        };
        assert!(!fixed_only.matches(&p));

        let variable_ok = PlanFilters {
            plan_types: [PlanType::Variable, PlanType::Fixed].into_iter().collect(),
            max_contract_months: Some(12),
            min_renewable_pct: Some(40.0),
        };
        assert!(variable_ok.matches(&p));
    }
}
