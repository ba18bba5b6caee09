//! Domain layer for the smart home analytics backend.
//!
//! This crate contains:
//! - Domain models (UsageInterval, AnalyticsReport, MaintenanceVerdict)
//! - The usage-to-analytics pipeline (recorder, aggregator, carbon, maintenance)
//! - Ports for storage and device lookup, with in-memory adapters
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::AnalyticsError;
