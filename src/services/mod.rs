//! Services: the emissions measurement pipeline.

pub mod emissions_log;
pub mod job;
pub mod job_queue;
pub mod probe;

pub use emissions_log::EmissionsLog;
pub use job::CommitEmissionsJob;
pub use job_queue::{JobQueue, JobRequest, SubmitError};
pub use probe::EmissionsProbe;
