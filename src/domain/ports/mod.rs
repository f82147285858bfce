//! Ports - trait seams between the pipeline and its external collaborators.

pub mod executor;
pub mod instrument;
pub mod static_instrument;
pub mod workflow;

pub use executor::{ExecutionReport, TestExecutor};
pub use instrument::MeasurementInstrument;
pub use static_instrument::StaticInstrument;
pub use workflow::{LoggingWorkflow, NullWorkflow, OptimizationWorkflow};
