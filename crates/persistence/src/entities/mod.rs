//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod usage_interval;

pub use usage_interval::UsageIntervalEntity;
