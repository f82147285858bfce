use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for carbonwatch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Watched repository configuration
    #[serde(default)]
    pub repo: RepoConfig,

    /// Measurement instrument and test executor configuration
    #[serde(default)]
    pub measurement: MeasurementConfig,

    /// Job queue configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Emissions log configuration
    #[serde(default)]
    pub emissions_log: EmissionsLogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Watched repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RepoConfig {
    /// Local checkout of the repository receiving pushes
    #[serde(default = "default_repo_folder")]
    pub folder: PathBuf,

    /// Whether to run `git pull` before scheduling a job
    #[serde(default = "default_pull_on_push")]
    pub pull_on_push: bool,
}

fn default_repo_folder() -> PathBuf {
    PathBuf::from(".")
}

const fn default_pull_on_push() -> bool {
    true
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            folder: default_repo_folder(),
            pull_on_push: default_pull_on_push(),
        }
    }
}

/// Measurement instrument and test executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MeasurementConfig {
    /// External energy sampler command
    #[serde(default = "default_sampler_command")]
    pub sampler_command: String,

    /// Arguments passed to the sampler command
    #[serde(default = "default_sampler_args")]
    pub sampler_args: Vec<String>,

    /// Command used to run a single test file
    #[serde(default = "default_test_command")]
    pub test_command: String,

    /// Arguments placed before the test file path
    #[serde(default = "default_test_args")]
    pub test_args: Vec<String>,

    /// Deadline for one test execution, in seconds
    #[serde(default = "default_test_timeout_secs")]
    pub test_timeout_secs: u64,
}

fn default_sampler_command() -> String {
    "codecarbon".to_string()
}

fn default_sampler_args() -> Vec<String> {
    vec!["monitor".to_string()]
}

fn default_test_command() -> String {
    "python".to_string()
}

fn default_test_args() -> Vec<String> {
    vec!["-m".to_string(), "unittest".to_string()]
}

const fn default_test_timeout_secs() -> u64 {
    300
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            sampler_command: default_sampler_command(),
            sampler_args: default_sampler_args(),
            test_command: default_test_command(),
            test_args: default_test_args(),
            test_timeout_secs: default_test_timeout_secs(),
        }
    }
}

/// Job queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueConfig {
    /// Number of worker tasks draining the queue
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bounded queue capacity; further submissions are rejected
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

const fn default_workers() -> usize {
    1
}

const fn default_capacity() -> usize {
    64
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            capacity: default_capacity(),
        }
    }
}

/// Emissions log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmissionsLogConfig {
    /// Path to the JSON emissions log file
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

fn default_log_path() -> PathBuf {
    PathBuf::from("emissions_log.json")
}

impl Default for EmissionsLogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
