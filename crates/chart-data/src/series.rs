//! Chart Series Types

use serde::{Serialize, Serializer};

/// Y-axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Primary,
    Secondary,
}

impl Axis {
    pub fn index(self) -> u8 {
        match self {
            Axis::Primary => 1,
            Axis::Secondary => 2,
        }
    }
}

impl Serialize for Axis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

/// One plotted sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Milliseconds since epoch
    pub x: i64,
    pub y: f32,
}

/// A named line on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub color: String,
    #[serde(rename = "yAxis")]
    pub y_axis: Axis,
    /// nvd3 multiChart series kind
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub values: Vec<Point>,
}

impl Series {
    pub fn line(key: &str, color: &str, y_axis: Axis, values: Vec<Point>) -> Self {
        Self {
            key: key.to_string(),
            color: color.to_string(),
            y_axis,
            kind: "line",
            values,
        }
    }
}

/// Output of the transform, serialized as a bare array of series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChartData {
    pub series: Vec<Series>,
}

impl ChartData {
    /// JSON form embedded in the chart page
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key == key)
    }
}
