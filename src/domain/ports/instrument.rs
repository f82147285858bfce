//! Measurement instrument port - interface for energy accounting backends.

use async_trait::async_trait;

use crate::domain::errors::MeasurementResult;

/// Trait for energy accounting instruments.
///
/// An instrument exposes start/stop semantics: `start` begins energy
/// accounting for the current host scope, and `stop` yields the energy
/// consumed over the interval in kilograms of CO2-equivalent, or `None`
/// when the instrument produced nothing.
///
/// How energy is physically sampled (RAPL counters, GPU counters, a
/// power meter) is the instrument's concern, not the pipeline's.
#[async_trait]
pub trait MeasurementInstrument: Send + Sync {
    /// Begin energy accounting.
    async fn start(&self) -> MeasurementResult<()>;

    /// End energy accounting, yielding kilograms of CO2-equivalent for the
    /// interval since `start`, or `None` if no data was produced.
    async fn stop(&self) -> MeasurementResult<Option<f64>>;
}
