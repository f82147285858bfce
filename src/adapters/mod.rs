//! Adapters: process, git, sampler, and HTTP integrations.

pub mod git;
pub mod process_executor;
pub mod sampler;
pub mod webhook;

pub use git::SourceUpdater;
pub use process_executor::ProcessTestExecutor;
pub use sampler::CommandInstrument;
