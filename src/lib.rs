//! Energy plan recommendation engine: costs each plan in a catalog against a
//! household's projected usage, scores and ranks the plans by the household's
//! preferences, and judges whether switching from the current plan pays off.

pub mod catalog;
pub mod config;
pub mod cost;
pub mod error;
pub mod output;
pub mod ranking;
pub mod scoring;
pub mod switching;
pub mod usage;

pub use cost::compute_cost;
pub use error::AdvisorError;
pub use ranking::rank_plans;
pub use switching::analyze_switching;
