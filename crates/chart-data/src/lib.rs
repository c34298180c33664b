//! Chart Data Transform
//!
//! Turns a measurement sequence into the named, colored, axis-assigned
//! series consumed by the nvd3 chart page.

mod series;
mod transform;

pub use series::{Axis, ChartData, Point, Series};
pub use transform::{ChartTransform, HUMIDITY_COLOR, HUMIDITY_KEY, TEMPERATURE_COLOR, TEMPERATURE_KEY};
