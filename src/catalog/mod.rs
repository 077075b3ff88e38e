pub mod sample;
pub mod schema;
pub mod store;

pub use schema::{
    Plan, PlanDefect, PlanId, PlanType, PlanTypeParseError, RateStructure, Supplier, SupplierId,
    Tier,
};
pub use store::{CatalogSnapshot, RejectedEntry};
