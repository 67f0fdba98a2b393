//! Aggregation engine.
//!
//! Pure reducers over an immutable slice of process records: role
//! filtering, nested-row explosion, counting and ranking, and the
//! per-jurisdiction table.

pub mod aggregator;
pub mod dashboard;
pub mod explode;
pub mod geo;
pub mod roles;

pub use dashboard::{AggregationSettings, Dashboard};
pub use roles::TargetId;
