use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::orbit::OrbitError;

/// Classical elements describing a closed heliocentric orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrbitalElements {
    pub semi_major_axis_au: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    /// Longitude of the ascending node, Ω.
    pub ascending_node_deg: f64,
    /// Longitude of perihelion, ϖ = Ω + ω.
    pub perihelion_longitude_deg: f64,
}

impl OrbitalElements {
    pub fn new(
        semi_major_axis_au: f64,
        eccentricity: f64,
        inclination_deg: f64,
        ascending_node_deg: f64,
        perihelion_longitude_deg: f64,
    ) -> Result<Self, OrbitError> {
        let elements = Self {
            semi_major_axis_au,
            eccentricity,
            inclination_deg,
            ascending_node_deg,
            perihelion_longitude_deg,
        };
        elements.validate()?;
        Ok(elements)
    }

    pub fn validate(&self) -> Result<(), OrbitError> {
        let fields = [
            ("semi_major_axis_au", self.semi_major_axis_au),
            ("eccentricity", self.eccentricity),
            ("inclination_deg", self.inclination_deg),
            ("ascending_node_deg", self.ascending_node_deg),
            ("perihelion_longitude_deg", self.perihelion_longitude_deg),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OrbitError::NonFinite(name));
        }
        if self.semi_major_axis_au <= 0.0 {
            return Err(OrbitError::InvalidSemiMajorAxis(self.semi_major_axis_au));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitError::NotElliptical(self.eccentricity));
        }
        Ok(())
    }

    pub fn semi_minor_axis_au(&self) -> f64 {
        self.semi_major_axis_au * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Distance from the ellipse center to the focus holding the star.
    pub fn focal_offset_au(&self) -> f64 {
        self.semi_major_axis_au * self.eccentricity
    }

    pub fn perihelion_au(&self) -> f64 {
        self.semi_major_axis_au * (1.0 - self.eccentricity)
    }

    pub fn aphelion_au(&self) -> f64 {
        self.semi_major_axis_au * (1.0 + self.eccentricity)
    }

    /// Argument of perihelion, ω = ϖ − Ω.
    pub fn argument_of_perihelion_deg(&self) -> f64 {
        self.perihelion_longitude_deg - self.ascending_node_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_open_orbits() {
        assert_eq!(
            OrbitalElements::new(1.0, 1.0, 0.0, 0.0, 0.0),
            Err(OrbitError::NotElliptical(1.0))
        );
        assert!(OrbitalElements::new(1.0, -0.1, 0.0, 0.0, 0.0).is_err());
        assert!(OrbitalElements::new(0.0, 0.1, 0.0, 0.0, 0.0).is_err());
        assert_eq!(
            OrbitalElements::new(1.0, 0.1, f64::NAN, 0.0, 0.0),
            Err(OrbitError::NonFinite("inclination_deg"))
        );
    }

    #[test]
    fn test_derived_quantities() {
        let el = OrbitalElements::new(2.0, 0.5, 10.0, 30.0, 100.0).unwrap();
        assert!((el.semi_minor_axis_au() - 2.0 * 0.75f64.sqrt()).abs() < 1e-12);
        assert_eq!(el.focal_offset_au(), 1.0);
        assert_eq!(el.perihelion_au(), 1.0);
        assert_eq!(el.aphelion_au(), 3.0);
        assert_eq!(el.argument_of_perihelion_deg(), 70.0);
    }
}
