//! Closed-form orbit geometry for rendering.

mod elements;
mod error;
mod opacity;
mod path;

pub use elements::OrbitalElements;
pub use error::OrbitError;
pub use opacity::{classify_opacity, OpacityRamp};
pub use path::{
    eccentric_anomaly, generate_orbit_path, position_at_mean_anomaly, position_at_true_anomaly,
};
