//! Fixed-reading instrument for tests and dry runs.

use async_trait::async_trait;

use crate::domain::errors::MeasurementResult;
use crate::domain::ports::MeasurementInstrument;

/// Instrument that always yields the same reading.
///
/// Useful in tests and when exercising the pipeline without real energy
/// accounting hardware.
#[derive(Debug, Clone, Default)]
pub struct StaticInstrument {
    reading_kg: Option<f64>,
}

impl StaticInstrument {
    pub fn new(reading_kg: Option<f64>) -> Self {
        Self { reading_kg }
    }
}

#[async_trait]
impl MeasurementInstrument for StaticInstrument {
    async fn start(&self) -> MeasurementResult<()> {
        Ok(())
    }

    async fn stop(&self) -> MeasurementResult<Option<f64>> {
        Ok(self.reading_kg)
    }
}
