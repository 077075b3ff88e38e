use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::catalog::schema::{Plan, PlanId, RateStructure, Supplier, SupplierId, Tier};
use crate::catalog::store::CatalogSnapshot;

/// Demo catalog used when no catalog file is supplied.
pub fn sample_catalog() -> CatalogSnapshot {
    let suppliers = vec![
        supplier("brightgrid", "BrightGrid Energy", Some(4.4), 1_250),
        supplier("greenleaf", "GreenLeaf Power", Some(4.7), 86),
        supplier("metro", "Metro Utilities", Some(3.6), 4_020),
        supplier("sunspark", "SunSpark", None, 0),
    ];

    let plans = vec![
        plan(
            "bg-fixed-12",
            "BrightGrid Fixed 12",
            "brightgrid",
            RateStructure::Fixed {
                rate_per_kwh: dec!(0.112),
            },
            12,
            dec!(150),
            25.0,
            dec!(4.95),
        ),
        plan(
            "bg-saver-24",
            "BrightGrid Saver 24",
            "brightgrid",
            RateStructure::Fixed {
                rate_per_kwh: dec!(0.099),
            },
            24,
            dec!(295),
            10.0,
            dec!(4.95),
        ),
        plan(
            "gl-renew-12",
            "GreenLeaf 100% Renewable",
            "greenleaf",
            RateStructure::Fixed {
                rate_per_kwh: dec!(0.124),
            },
            12,
            dec!(100),
            100.0,
            Decimal::ZERO,
        ),
        plan(
            "gl-flex",
            "GreenLeaf Flex",
            "greenleaf",
            RateStructure::Variable {
                base_rate: dec!(0.118),
                historical_average_rate: Some(dec!(0.121)),
            },
            0,
            Decimal::ZERO,
            60.0,
            Decimal::ZERO,
        ),
        plan(
            "metro-tiered",
            "Metro Step Rate",
            "metro",
            RateStructure::Tiered {
                tiers: vec![
                    Tier::bounded(dec!(6000), dec!(0.095)),
                    Tier::bounded(dec!(12000), dec!(0.118)),
                    Tier::unbounded(dec!(0.142)),
                ],
            },
            12,
            dec!(200),
            15.0,
            dec!(9.99),
        ),
        plan(
            "metro-tou",
            "Metro Night Owl",
            "metro",
            RateStructure::TimeOfUse {
                peak_rate: dec!(0.182),
                off_peak_rate: dec!(0.074),
                peak_fraction: Some(dec!(0.4)),
            },
            6,
            dec!(75),
            20.0,
            dec!(9.99),
        ),
        plan(
            "ss-solar-36",
            "SunSpark Solar Lock 36",
            "sunspark",
            RateStructure::Fixed {
                rate_per_kwh: dec!(0.105),
            },
            36,
            dec!(450),
            100.0,
            Decimal::ZERO,
        ),
    ];

    CatalogSnapshot::new(suppliers, plans)
}

fn supplier(id: &str, name: &str, rating: Option<f64>, reviews: u32) -> Supplier {
    Supplier {
        id: SupplierId::new(id),
        name: name.to_string(),
        average_rating: rating,
        review_count: reviews,
        is_active: true,
    }
}

#[allow(clippy::too_many_arguments)]
fn plan(
    id: &str,
    name: &str,
    supplier_id: &str,
    rate: RateStructure,
    contract_months: u32,
    etf: Decimal,
    renewable_pct: f64,
    monthly_fee: Decimal,
) -> Plan {
    Plan {
        id: PlanId::new(id),
        name: name.to_string(),
        supplier_id: SupplierId::new(supplier_id),
        rate,
        contract_months,
        early_termination_fee: etf,
        renewable_pct,
        monthly_fee,
        connection_fee: Decimal::ZERO,
        regions: ["north", "south"].iter().map(|r| r.to_string()).collect::<BTreeSet<_>>(),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_well_formed() {
        let catalog = sample_catalog();
        assert!(!catalog.plans.is_empty());
        for plan in &catalog.plans {
            assert!(plan.check_terms().is_ok(), "{} should be valid", plan.id);
            assert!(catalog.supplier(&plan.supplier_id).is_some());
        }
    }
}
