//! Emissions probe: one measurement around one isolated test run.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::{MeasurementError, MeasurementResult};
use crate::domain::ports::{MeasurementInstrument, TestExecutor};

/// Composes the measurement instrument and the test executor to produce a
/// single emissions measurement, in grams of CO2-equivalent, for one file.
pub struct EmissionsProbe {
    instrument: Arc<dyn MeasurementInstrument>,
    executor: Arc<dyn TestExecutor>,
    // The instrument accounts energy host-wide; overlapping sessions from
    // concurrent jobs would attribute the same joules twice.
    session: Mutex<()>,
}

impl EmissionsProbe {
    pub fn new(
        instrument: Arc<dyn MeasurementInstrument>,
        executor: Arc<dyn TestExecutor>,
    ) -> Self {
        Self {
            instrument,
            executor,
            session: Mutex::new(()),
        }
    }

    /// Measure the emissions of executing one test file.
    ///
    /// The executor's pass/fail outcome does not decide measurement success;
    /// a failing test still consumed energy worth recording. `stop` is called
    /// exactly once no matter how execution went, so the instrument is never
    /// left accounting.
    pub async fn measure(&self, target: &Path) -> MeasurementResult<f64> {
        let _session = self.session.lock().await;

        if let Err(e) = self.instrument.start().await {
            // A failed start may still have engaged the instrument; release
            // it before surfacing the error.
            let _ = self.instrument.stop().await;
            return Err(e);
        }

        let run = self.executor.execute(target).await;
        let reading = self.instrument.stop().await;

        match &run {
            Ok(report) if report.success => {
                debug!(target = %target.display(), "test executed successfully");
            }
            Ok(report) => {
                warn!(
                    target = %target.display(),
                    exit_code = ?report.exit_code,
                    stderr = %report.stderr.trim(),
                    "test failed, recording its emissions anyway"
                );
            }
            Err(_) => {}
        }

        // Executor launch failures surface only after stop has run.
        run?;

        let kilograms = reading?.ok_or(MeasurementError::NoData)?;
        Ok(kilograms * 1000.0)
    }
}
