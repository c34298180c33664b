//! Payload Decoding

use crate::error::ValidationError;
use storage::Measurement;
use tracing::debug;

/// Decode a JSON payload into a [`Measurement`].
///
/// `Temperature`, `Humidity` and `Date` are all required and must be
/// numbers (`Date` an integer). Numbers that overflow `f32` are rejected
/// since they could not be written back out as JSON numbers. Unknown fields
/// are ignored. No range checking happens here.
pub fn decode_measurement(payload: &[u8]) -> Result<Measurement, ValidationError> {
    let record = serde_json::from_slice::<Measurement>(payload).map_err(|e| {
        debug!("Rejected measurement payload: {}", e);
        classify(e)
    })?;

    ensure_finite("Temperature", record.temperature)?;
    ensure_finite("Humidity", record.humidity)?;
    Ok(record)
}

fn ensure_finite(field: &str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        debug!("Rejected measurement payload: {} overflows f32", field);
        Err(ValidationError::InvalidFormat(format!(
            "{} is out of range for a 32-bit float",
            field
        )))
    }
}

fn classify(err: serde_json::Error) -> ValidationError {
    let message = err.to_string();
    match missing_field_name(&message) {
        Some(field) => ValidationError::MissingField(field.to_string()),
        None => ValidationError::InvalidFormat(message),
    }
}

/// serde reports missing fields as "missing field `Name` at line .."
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}
