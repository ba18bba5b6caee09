//! External service integrations.

pub mod device_registry;

pub use device_registry::HttpDeviceDirectory;
