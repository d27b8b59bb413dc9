use thiserror::Error;

use crate::source::EphemerisRecord;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("position has non-finite components")]
    NonFinitePosition,
    #[error("velocity has non-finite components")]
    NonFiniteVelocity,
    #[error("record has no name")]
    MissingName,
    #[error("orbiting body placed at the origin")]
    AtOrigin,
}

/// Sanity checks applied before a record reaches a caller.
pub fn validate_record(record: &EphemerisRecord) -> Result<(), ValidationError> {
    if record.name().trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let position = record.position();
    if !position.is_finite() {
        return Err(ValidationError::NonFinitePosition);
    }
    if record.velocity().is_some_and(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteVelocity);
    }
    // A zeroed vector for a planet means a parse defaulted somewhere.
    if !record.body_id().is_star() && position.length() == 0.0 {
        return Err(ValidationError::AtOrigin);
    }
    Ok(())
}
