//! Domain models for the smart home analytics backend.

pub mod device;
pub mod maintenance;
pub mod report;
pub mod usage;

pub use device::DeviceInfo;
pub use maintenance::{
    DeviceCategory, MaintenanceHeadroom, MaintenanceResponse, MaintenanceThreshold,
    MaintenanceThresholds, MaintenanceVerdict, IMMEDIATE_MAINTENANCE,
};
pub use report::{
    AnalyticsReport, AnalyticsStatus, DateRangeQuery, EnvFootprint, FootprintResponse,
    HourlyConsumption, ReportOutcome, ReportResponse, HOURS_PER_DAY,
};
pub use usage::{
    DeleteUsageResponse, PowerTransition, RecordUsageRequest, RecordUsageResponse,
    UsageInterval, UsageListEntry, UsageListQuery, UsageListResponse,
};
