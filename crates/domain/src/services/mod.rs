//! Domain services for the smart home analytics backend.
//!
//! Services contain the usage-to-analytics pipeline and the ports it talks
//! to. All read paths are stateless and safe to run concurrently.

pub mod carbon;
pub mod device_directory;
pub mod maintenance;
pub mod recorder;
pub mod report;
pub mod store;

pub use carbon::{carbon_kg, suggest_reductions, ReductionTier, CARBON_INTENSITY_FACTOR};
pub use device_directory::{DeviceDirectory, StaticDeviceDirectory};
pub use maintenance::MaintenancePredictor;
pub use recorder::{record_transition, UsageRecorder, UsageSink};
pub use report::{summarize, ReportAggregator};
pub use store::{InMemoryUsageStore, UsageRecordStore};
