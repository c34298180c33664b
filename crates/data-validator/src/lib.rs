//! Data Validation
//!
//! Decodes sensor payloads into measurements and applies the optional
//! plausibility policy. Values are accepted verbatim unless a policy is
//! enabled.

mod decode;
mod error;
mod plausibility;

pub use decode::decode_measurement;
pub use error::ValidationError;
pub use plausibility::{PlausibilityConfig, PlausibilityPolicy};
