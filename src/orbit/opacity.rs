use serde::Deserialize;

/// Maps distance from the star to a line opacity: near orbits draw brighter.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpacityRamp {
    pub near_au: f64,
    pub far_au: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
}

impl Default for OpacityRamp {
    fn default() -> Self {
        Self {
            near_au: 0.4,
            far_au: 40.0,
            min_opacity: 0.15,
            max_opacity: 0.6,
        }
    }
}

impl OpacityRamp {
    pub fn classify(&self, distance_au: f64) -> f64 {
        let near = self.near_au.max(f64::MIN_POSITIVE);
        let far = self.far_au.max(near);
        let t = if distance_au <= near || far == near {
            0.0
        } else {
            ((distance_au.ln() - near.ln()) / (far.ln() - near.ln())).clamp(0.0, 1.0)
        };
        self.max_opacity + (self.min_opacity - self.max_opacity) * t
    }
}

/// Opacity for an orbit at `distance_au` using the default ramp.
pub fn classify_opacity(distance_au: f64) -> f64 {
    OpacityRamp::default().classify(distance_au)
}
