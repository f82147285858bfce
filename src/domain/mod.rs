//! Domain layer: models, errors, and ports for the measurement pipeline.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{MeasurementError, MeasurementResult};
