//! Carbonwatch - commit emissions measurement service
//!
//! Carbonwatch receives source-control push notifications, measures the
//! carbon-emission cost of running the tests affected by a commit, and
//! appends the results to a durable JSON log.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, and the ports to external
//!   collaborators (measurement instrument, test executor, downstream
//!   optimization workflow)
//! - **Services Layer** (`services`): the measurement pipeline - probe, job,
//!   job queue, and the append-only emissions log
//! - **Adapters Layer** (`adapters`): process-backed executor, external
//!   sampler instrument, git source updater, and the webhook HTTP server
//! - **Infrastructure Layer** (`infrastructure`): configuration loading

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{MeasurementError, MeasurementResult};
pub use domain::models::{
    is_measurement_target, ChangeSet, Config, EmissionValue, EmissionsResult, LogEntry,
};
pub use domain::ports::{
    ExecutionReport, LoggingWorkflow, MeasurementInstrument, NullWorkflow,
    OptimizationWorkflow, StaticInstrument, TestExecutor,
};
pub use infrastructure::config::ConfigLoader;
pub use services::{CommitEmissionsJob, EmissionsLog, EmissionsProbe, JobQueue, JobRequest};
