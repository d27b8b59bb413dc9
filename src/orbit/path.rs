use std::f64::consts::{PI, TAU};

use crate::math::Point3;
use crate::orbit::{OrbitError, OrbitalElements};

const KEPLER_MAX_ITERATIONS: usize = 50;
const KEPLER_TOLERANCE: f64 = 1e-12;

/// Sample a closed orbit as `segment_count` points, in AU, star at the origin.
///
/// The first point is the perihelion and the last point connects back to it;
/// the loop is not closed with a duplicate vertex.
pub fn generate_orbit_path(
    elements: &OrbitalElements,
    segment_count: usize,
) -> Result<Vec<Point3>, OrbitError> {
    elements.validate()?;
    if segment_count < 3 {
        return Err(OrbitError::TooFewSegments(segment_count));
    }

    let a = elements.semi_major_axis_au;
    let b = elements.semi_minor_axis_au();
    let c = elements.focal_offset_au();

    let points = (0..segment_count)
        .map(|k| {
            let t = TAU * k as f64 / segment_count as f64;
            // Shift by -c so the focus, not the center, sits at the origin.
            let flat = Point3::new(a * t.cos() - c, 0.0, b * t.sin());
            orient(flat, elements)
        })
        .collect();

    Ok(points)
}

/// Point on the oriented orbit at true anomaly `nu_rad`.
pub fn position_at_true_anomaly(
    elements: &OrbitalElements,
    nu_rad: f64,
) -> Result<Point3, OrbitError> {
    elements.validate()?;
    let e = elements.eccentricity;
    let r = elements.semi_major_axis_au * (1.0 - e * e) / (1.0 + e * nu_rad.cos());
    Ok(orient(
        Point3::new(r * nu_rad.cos(), 0.0, r * nu_rad.sin()),
        elements,
    ))
}

/// Point on the oriented orbit at mean anomaly `mean_anomaly_rad`.
pub fn position_at_mean_anomaly(
    elements: &OrbitalElements,
    mean_anomaly_rad: f64,
) -> Result<Point3, OrbitError> {
    elements.validate()?;
    let ea = eccentric_anomaly(mean_anomaly_rad, elements.eccentricity);
    let flat = Point3::new(
        elements.semi_major_axis_au * (ea.cos() - elements.eccentricity),
        0.0,
        elements.semi_minor_axis_au() * ea.sin(),
    );
    Ok(orient(flat, elements))
}

/// Solve Kepler's equation M = E - e sin E with Newton-Raphson.
pub fn eccentric_anomaly(mean_anomaly_rad: f64, eccentricity: f64) -> f64 {
    let m = mean_anomaly_rad.rem_euclid(TAU);
    let mut ea = if eccentricity < 0.8 { m } else { PI };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ea - eccentricity * ea.sin() - m) / (1.0 - eccentricity * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }

    ea
}

/// Rotate a point from the orbital plane into the scene.
///
/// Order matters: node longitude about up, then inclination about the line of
/// nodes, then argument of perihelion about up again. The flat point gets the
/// innermost rotation (ω) first. Angles are negated because the scene frame
/// swaps the ecliptic y and z axes, which flips handedness.
fn orient(flat: Point3, elements: &OrbitalElements) -> Point3 {
    let node = elements.ascending_node_deg.to_radians();
    let inclination = elements.inclination_deg.to_radians();
    let argument = elements.argument_of_perihelion_deg().to_radians();

    flat.rotate_y(-argument)
        .rotate_x(-inclination)
        .rotate_y(-node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const EPS: f64 = 1e-9;

    fn elements(a: f64, e: f64, i: f64, node: f64, peri: f64) -> OrbitalElements {
        OrbitalElements::new(a, e, i, node, peri).unwrap()
    }

    #[test]
    fn test_distances_stay_between_perihelion_and_aphelion() {
        for id in Catalog::builtin().orbiting() {
            let el = id.entry().elements.unwrap();
            let path = generate_orbit_path(&el, 720).unwrap();
            assert_eq!(path.len(), 720);

            let distances: Vec<f64> = path.iter().map(|p| p.length()).collect();
            let min = distances.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = distances.iter().cloned().fold(0.0, f64::max);

            assert!(min >= el.perihelion_au() - EPS, "{} min {}", id, min);
            assert!(max <= el.aphelion_au() + EPS, "{} max {}", id, max);
            // Sample 0 is perihelion, sample n/2 is aphelion.
            assert!((distances[0] - el.perihelion_au()).abs() < EPS);
            assert!((distances[360] - el.aphelion_au()).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_eccentricity_is_a_circle() {
        let el = elements(3.0, 0.0, 12.0, 40.0, 75.0);
        let path = generate_orbit_path(&el, 64).unwrap();
        for p in &path {
            assert!((p.length() - 3.0).abs() < EPS);
        }
        // Not collapsed onto a line: two samples a quarter turn apart are orthogonal.
        let dot = path[0].x * path[16].x + path[0].y * path[16].y + path[0].z * path[16].z;
        assert!(dot.abs() < 1e-6);
    }

    #[test]
    fn test_flat_orbit_perihelion_direction() {
        let el = elements(1.0, 0.2, 0.0, 0.0, 90.0);
        let path = generate_orbit_path(&el, 8).unwrap();
        let q = el.perihelion_au();
        // Ecliptic (0, q, 0) maps to scene (0, 0, q).
        assert!(path[0].x.abs() < EPS);
        assert!(path[0].y.abs() < EPS);
        assert!((path[0].z - q).abs() < EPS);
    }

    #[test]
    fn test_inclination_lifts_out_of_plane() {
        // Polar orbit with perihelion at the node's quarter turn: peaks straight up.
        let el = elements(1.0, 0.0, 90.0, 0.0, 90.0);
        let path = generate_orbit_path(&el, 4).unwrap();
        assert!((path[0].y - 1.0).abs() < EPS);
        assert!(path[0].x.abs() < EPS && path[0].z.abs() < EPS);
    }

    #[test]
    fn test_rotation_order_is_not_commutative() {
        let el = elements(1.0, 0.3, 30.0, 60.0, 150.0);
        let path = generate_orbit_path(&el, 12).unwrap();
        let swapped = Point3::new(el.perihelion_au(), 0.0, 0.0)
            .rotate_y(-el.ascending_node_deg.to_radians())
            .rotate_x(-el.inclination_deg.to_radians())
            .rotate_y(-el.argument_of_perihelion_deg().to_radians());
        let d = Point3::new(
            path[0].x - swapped.x,
            path[0].y - swapped.y,
            path[0].z - swapped.z,
        );
        assert!(d.length() > 1e-3);
    }

    #[test]
    fn test_too_few_segments() {
        let el = elements(1.0, 0.1, 0.0, 0.0, 0.0);
        assert_eq!(
            generate_orbit_path(&el, 2),
            Err(OrbitError::TooFewSegments(2))
        );
    }

    #[test]
    fn test_invalid_elements_rejected() {
        let el = OrbitalElements {
            semi_major_axis_au: 1.0,
            eccentricity: 1.2,
            inclination_deg: 0.0,
            ascending_node_deg: 0.0,
            perihelion_longitude_deg: 0.0,
        };
        assert!(matches!(
            generate_orbit_path(&el, 32),
            Err(OrbitError::NotElliptical(_))
        ));
    }

    #[test]
    fn test_anomaly_positions_lie_on_path() {
        let el = elements(5.2, 0.048, 1.3, 100.5, 14.7);
        let path = generate_orbit_path(&el, 4).unwrap();

        let at_peri = position_at_true_anomaly(&el, 0.0).unwrap();
        let mean_peri = position_at_mean_anomaly(&el, 0.0).unwrap();
        for p in [at_peri, mean_peri] {
            assert!((p.x - path[0].x).abs() < EPS);
            assert!((p.y - path[0].y).abs() < EPS);
            assert!((p.z - path[0].z).abs() < EPS);
        }

        let at_apo = position_at_true_anomaly(&el, PI).unwrap();
        assert!((at_apo.length() - el.aphelion_au()).abs() < EPS);
        assert!((at_apo.x - path[2].x).abs() < EPS);
    }

    #[test]
    fn test_kepler_solution_satisfies_equation() {
        for &e in &[0.0, 0.2, 0.6, 0.95] {
            for k in 0..12 {
                let m = k as f64 * 0.5;
                let ea = eccentric_anomaly(m, e);
                let residual = ea - e * ea.sin() - m.rem_euclid(TAU);
                assert!(residual.abs() < 1e-9, "e={} m={} residual={}", e, m, residual);
            }
        }
    }
}
