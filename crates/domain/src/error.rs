//! Domain error types.

use thiserror::Error;

/// Errors raised by the usage analytics pipeline.
///
/// Every variant is a local, recoverable condition for the caller. An empty
/// report window is not an error; see `ReportOutcome::NoData`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A malformed interval reached the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A device transition could not be turned into a usage interval.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A query window starts after it ends.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// No maintenance thresholds are configured for the category.
    #[error("No maintenance thresholds defined for category: {0}")]
    UnknownCategory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store failed; callers may retry.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}
