//! Conversions between physical units and scene units.
//!
//! Distances are linear in AU; body radii are exaggerated so planets stay
//! visible next to their orbits.

use serde::Deserialize;

use crate::math::{Point3, Vector3};

pub const KM_PER_AU: f64 = 149_597_870.7;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn au_to_km(au: f64) -> f64 {
    au * KM_PER_AU
}

pub fn km_to_au(km: f64) -> f64 {
    km / KM_PER_AU
}

/// AU/day to km/s.
pub fn au_per_day_to_km_per_s(v: f64) -> f64 {
    v * KM_PER_AU / SECONDS_PER_DAY
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneScale {
    pub units_per_au: f64,
    /// Multiplier applied to true body radii.
    pub radius_exaggeration: f64,
    /// Smallest radius a body is drawn with, in scene units.
    pub min_body_radius: f64,
}

impl Default for SceneScale {
    fn default() -> Self {
        Self {
            units_per_au: 10.0,
            radius_exaggeration: 500.0,
            min_body_radius: 0.05,
        }
    }
}

impl SceneScale {
    pub fn au_to_scene(&self, au: f64) -> f64 {
        au * self.units_per_au
    }

    pub fn scene_to_au(&self, units: f64) -> f64 {
        units / self.units_per_au
    }

    pub fn km_to_scene(&self, km: f64) -> f64 {
        self.au_to_scene(km_to_au(km))
    }

    pub fn scene_to_km(&self, units: f64) -> f64 {
        au_to_km(self.scene_to_au(units))
    }

    pub fn vector_km_to_scene(&self, v: &Vector3) -> Vector3 {
        v.scaled(self.units_per_au / KM_PER_AU)
    }

    pub fn point_au_to_scene(&self, p: &Point3) -> Point3 {
        p.scaled(self.units_per_au)
    }

    pub fn body_radius_to_scene(&self, radius_km: f64) -> f64 {
        (self.km_to_scene(radius_km) * self.radius_exaggeration).max(self.min_body_radius)
    }
}
