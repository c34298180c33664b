//! Measurement Record

use serde::{Deserialize, Serialize};
use std::fmt;

/// One environmental reading as sent by the sensor client.
///
/// Field names on the wire are `Temperature`, `Humidity` and `Date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
    /// Milliseconds since the Unix epoch, supplied by the sensor
    pub date: i64,
}

impl Measurement {
    pub fn new(temperature: f32, humidity: f32, date: i64) -> Self {
        Self {
            temperature,
            humidity,
            date,
        }
    }
}

/// Storage-assigned surrogate identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeasurementId(pub i64);

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
