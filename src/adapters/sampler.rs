//! Command-backed measurement instrument.
//!
//! Drives an external energy sampler process: `start` spawns it, `stop`
//! interrupts it and parses the final reading from its stdout.

use std::process::Stdio;

use async_trait::async_trait;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::{MeasurementError, MeasurementResult};
use crate::domain::models::MeasurementConfig;
use crate::domain::ports::MeasurementInstrument;

/// Instrument backed by an external sampler command.
///
/// The sampler runs for the duration of the accounting interval and is
/// expected to print its final kilogram-CO2-equivalent reading as the last
/// non-empty line of stdout after receiving SIGINT. A sampler that prints
/// nothing parseable yields `None`, which the probe reports as missing data.
pub struct CommandInstrument {
    program: String,
    args: Vec<String>,
    // One accounting session at a time; start while running is an error.
    child: Mutex<Option<Child>>,
}

impl CommandInstrument {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: Mutex::new(None),
        }
    }

    pub fn from_config(config: &MeasurementConfig) -> Self {
        Self::new(config.sampler_command.clone(), config.sampler_args.clone())
    }
}

#[async_trait]
impl MeasurementInstrument for CommandInstrument {
    async fn start(&self) -> MeasurementResult<()> {
        let mut guard = self.child.lock().await;
        if guard.is_some() {
            return Err(MeasurementError::Instrument(
                "sampler already running".to_string(),
            ));
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                MeasurementError::Instrument(format!(
                    "failed to spawn sampler {}: {e}",
                    self.program
                ))
            })?;

        debug!(program = %self.program, pid = ?child.id(), "sampler started");
        *guard = Some(child);
        Ok(())
    }

    async fn stop(&self) -> MeasurementResult<Option<f64>> {
        let child = self.child.lock().await.take().ok_or_else(|| {
            MeasurementError::Instrument("sampler not running".to_string())
        })?;

        // SIGINT lets the sampler flush its final reading before exiting.
        if let Some(pid) = child.id() {
            if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGINT) {
                warn!(pid, error = %e, "failed to interrupt sampler");
            }
        }

        let output = child.wait_with_output().await.map_err(|e| {
            MeasurementError::Instrument(format!("failed to collect sampler output: {e}"))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reading = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| line.parse::<f64>().ok());

        debug!(?reading, "sampler stopped");
        Ok(reading)
    }
}
