//! Repository implementations for database operations.

pub mod usage_interval;

pub use usage_interval::PgUsageRecordStore;
