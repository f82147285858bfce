//! Emissions measurement results and durable log entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of measuring one target: grams of CO2-equivalent, or a string
/// describing why measurement failed for that target.
///
/// Serialized untagged so grams appear as JSON numbers and failures as
/// plain strings, matching the on-disk log format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmissionValue {
    Grams(f64),
    Error(String),
}

/// Per-target emissions for one job run, keyed by the original relative
/// path from the change-set. Built incrementally, immutable once the job
/// completes.
pub type EmissionsResult = BTreeMap<String, EmissionValue>;

/// One durable, immutable record of a job's result for one repository at
/// one point in time. Entries are append-only and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub repo_name: String,
    pub timestamp: DateTime<Utc>,
    pub emissions: EmissionsResult,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(repo_name: impl Into<String>, emissions: EmissionsResult) -> Self {
        Self {
            repo_name: repo_name.into(),
            timestamp: Utc::now(),
            emissions,
        }
    }
}

/// Round a gram value to 6 decimal digits, the precision recorded in the log.
pub fn round_grams(grams: f64) -> f64 {
    (grams * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilograms_to_grams_round_trip() {
        // 0.0000015 kg is 1.5 g; 6-decimal rounding is a no-op here.
        let grams = 0.000_001_5 * 1000.0;
        assert!((round_grams(grams) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_is_a_valid_measurement() {
        assert_eq!(round_grams(0.0), 0.0);
    }

    #[test]
    fn rounds_to_six_decimals() {
        assert!((round_grams(1.234_567_89) - 1.234_568).abs() < 1e-9);
        assert!((round_grams(0.000_000_4) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn emission_values_serialize_untagged() {
        let mut emissions = EmissionsResult::new();
        emissions.insert("tests/test_a.py".to_string(), EmissionValue::Grams(1.5));
        emissions.insert(
            "tests/test_b.py".to_string(),
            EmissionValue::Error("boom".to_string()),
        );

        let json = serde_json::to_value(&emissions).unwrap();
        assert_eq!(json["tests/test_a.py"], serde_json::json!(1.5));
        assert_eq!(json["tests/test_b.py"], serde_json::json!("boom"));
    }

    #[test]
    fn log_entry_round_trips_through_json() {
        let mut emissions = EmissionsResult::new();
        emissions.insert("tests/test_a.py".to_string(), EmissionValue::Grams(0.25));
        let entry = LogEntry::new("emission_monitor", emissions);

        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.repo_name, "emission_monitor");
        assert_eq!(
            back.emissions["tests/test_a.py"],
            EmissionValue::Grams(0.25)
        );
    }
}
