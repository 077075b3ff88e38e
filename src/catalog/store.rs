use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::schema::{Plan, PlanId, Supplier, SupplierId};

/// A read-only view of the plan catalog for one recommendation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub suppliers: BTreeMap<SupplierId, Supplier>,
    pub plans: Vec<Plan>,
    /// Entries present in the source file that could not be decoded.
    #[serde(default)]
    pub rejected: Vec<RejectedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectedEntry {
    pub plan_id: PlanId,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    suppliers: Vec<Supplier>,
    #[serde(default)]
    plans: Vec<serde_json::Value>,
}

impl CatalogSnapshot {
    pub fn new(suppliers: Vec<Supplier>, plans: Vec<Plan>) -> Self {
        Self {
            suppliers: suppliers.into_iter().map(|s| (s.id.clone(), s)).collect(),
            plans,
            rejected: Vec::new(),
        }
    }

    pub fn supplier(&self, id: &SupplierId) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    pub fn plan(&self, id: &PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| &p.id == id)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading catalog: {}", path.display()))?;
        let snapshot = Self::from_json(&data)
            .with_context(|| format!("failed parsing catalog: {}", path.display()))?;
        debug!(
            plans = snapshot.plans.len(),
            suppliers = snapshot.suppliers.len(),
            rejected = snapshot.rejected.len(),
            "loaded catalog snapshot"
        );
        Ok(snapshot)
    }

    /// Decodes each plan entry on its own so one bad entry cannot sink the catalog.
    pub fn from_json(data: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(data)?;
        let mut snapshot = Self::new(raw.suppliers, Vec::new());
        for (idx, entry) in raw.plans.into_iter().enumerate() {
            let plan_id = entry
                .get("id")
                .and_then(|v| v.as_str())
                .map(PlanId::new)
                .unwrap_or_else(|| PlanId::new(format!("#{idx}")));
            match serde_json::from_value::<Plan>(entry) {
                Ok(plan) => snapshot.plans.push(plan),
                Err(err) => {
                    warn!(plan = %plan_id, "rejecting catalog entry: {err}");
                    snapshot.rejected.push(RejectedEntry {
                        plan_id,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_good_entries_when_one_rate_is_undecodable() {
        let data = r#"{
            "suppliers": [
                {"id": "volt", "name": "Volt Co", "average_rating": 4.2, "review_count": 80}
            ],
            "plans": [
                {
                    "id": "volt-fixed-12",
                    "name": "Volt Fixed 12",
                    "supplier_id": "volt",
                    "rate": {"type": "fixed", "rate_per_kwh": "0.11"},
                    "contract_months": 12,
                    "regions": ["north"]
                },
                {
                    "id": "volt-mystery",
                    "name": "Volt Mystery",
                    "supplier_id": "volt",
                    "rate": {"type": "block_and_index", "rate": "0.1"}
                }
            ]
        }"#;
        let snapshot = CatalogSnapshot::from_json(data).expect("catalog parses");
        assert_eq!(snapshot.plans.len(), 1);
        assert_eq!(snapshot.rejected.len(), 1);
        assert_eq!(snapshot.rejected[0].plan_id, PlanId::new("volt-mystery"));
        assert!(snapshot.supplier(&SupplierId::new("volt")).is_some());
        assert!(snapshot.plans[0].is_active);
    }

    #[test]
    fn entries_without_id_get_positional_name() {
        let data = r#"{"plans": [{"name": "nameless"}]}"#;
        let snapshot = CatalogSnapshot::from_json(data).expect("catalog parses");
        assert!(snapshot.plans.is_empty());
        assert_eq!(snapshot.rejected[0].plan_id, PlanId::new("#0"));
    }
}
