//! Plausibility Policy for Sensor Values

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use storage::Measurement;

/// Plausibility configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlausibilityConfig {
    /// Whether checks run at all (default: off, every value accepted)
    pub enabled: bool,
    /// Temperature valid range (°C)
    pub temperature_range: (f64, f64),
    /// Humidity valid range (%)
    pub humidity_range: (f64, f64),
    /// Also refuse implausible records at ingestion, not only when charting
    pub reject_on_ingest: bool,
}

impl Default for PlausibilityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            temperature_range: (-60.0, 70.0),
            humidity_range: (0.0, 100.0),
            reject_on_ingest: false,
        }
    }
}

/// Range checks for measurement values.
///
/// The default policy accepts everything, including non-finite values.
#[derive(Debug, Clone, Default)]
pub struct PlausibilityPolicy {
    config: PlausibilityConfig,
}

impl PlausibilityPolicy {
    pub fn new(config: PlausibilityConfig) -> Self {
        Self { config }
    }

    /// Policy that accepts every record
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &PlausibilityConfig {
        &self.config
    }

    /// Whether ingestion should refuse records failing [`Self::check`]
    pub fn rejects_on_ingest(&self) -> bool {
        self.config.enabled && self.config.reject_on_ingest
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if (range.0..=range.1).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::Implausible {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        }
    }

    /// Check both values of a record
    pub fn check(&self, record: &Measurement) -> Result<(), ValidationError> {
        if !self.config.enabled {
            return Ok(());
        }
        self.validate_range(
            "temperature",
            f64::from(record.temperature),
            self.config.temperature_range,
        )?;
        self.validate_range(
            "humidity",
            f64::from(record.humidity),
            self.config.humidity_range,
        )
    }

    /// Predicate form of [`Self::check`]
    pub fn accepts(&self, record: &Measurement) -> bool {
        self.check(record).is_ok()
    }
}
