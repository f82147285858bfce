//! Domain errors for the carbonwatch measurement pipeline.

use thiserror::Error;

/// Errors that can occur while measuring the emissions of a single target.
///
/// These are recorded per-target inside an emissions result; one failing
/// target never aborts the rest of the batch.
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("measurement instrument produced no data")]
    NoData,

    #[error("measurement instrument error: {0}")]
    Instrument(String),

    #[error("failed to launch test process: {0}")]
    Launch(String),

    #[error("test execution exceeded {timeout_secs}s deadline")]
    Timeout { timeout_secs: u64 },
}

pub type MeasurementResult<T> = Result<T, MeasurementError>;
