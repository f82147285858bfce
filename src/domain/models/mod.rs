//! Domain models for the emissions measurement pipeline.

pub mod changeset;
pub mod config;
pub mod emissions;

pub use changeset::{is_measurement_target, ChangeSet};
pub use config::{
    Config, EmissionsLogConfig, LoggingConfig, MeasurementConfig, QueueConfig, RepoConfig,
    ServerConfig,
};
pub use emissions::{round_grams, EmissionValue, EmissionsResult, LogEntry};
