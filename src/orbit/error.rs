use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OrbitError {
    #[error("eccentricity {0} outside [0, 1), only closed orbits are supported")]
    NotElliptical(f64),
    #[error("semi-major axis must be positive, got {0}")]
    InvalidSemiMajorAxis(f64),
    #[error("non-finite orbital element: {0}")]
    NonFinite(&'static str),
    #[error("an orbit path needs at least 3 segments, got {0}")]
    TooFewSegments(usize),
}
