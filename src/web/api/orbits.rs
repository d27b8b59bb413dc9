use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use utoipa::ToSchema;

use crate::catalog::Catalog;
use crate::math::Point3;
use crate::orbit::{generate_orbit_path, position_at_true_anomaly, OpacityRamp, OrbitalElements};
use crate::scale::SceneScale;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

pub const DEFAULT_SEGMENTS: usize = 256;
pub const MAX_SEGMENTS: usize = 4096;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrbitQuery {
    pub segments: Option<usize>,
    /// Return scene units instead of AU.
    #[serde(default)]
    pub scene: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrbitResponse {
    pub id: String,
    /// `au` or `scene`.
    pub units: &'static str,
    pub opacity: f64,
    pub perihelion_au: f64,
    pub aphelion_au: f64,
    pub perihelion: Point3,
    pub aphelion: Point3,
    /// Closed loop; the last point connects back to the first.
    pub points: Vec<Point3>,
}

#[utoipa::path(
    get,
    path = "/api/orbits/{id}",
    tag = "catalog",
    params(
        ("id" = String, Path, description = "Body id"),
        ("segments" = Option<usize>, Query, description = "Number of path points (3..=4096)"),
        ("scene" = Option<bool>, Query, description = "Return scene units instead of AU")
    ),
    responses(
        (status = 200, description = "Orbit path", body = OrbitResponse),
        (
            status = 400,
            description = "Unknown body, body without an orbit, or bad segment count",
            body = ErrorResponse
        )
    )
)]
pub async fn get_orbit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OrbitQuery>,
) -> ApiResult<Json<OrbitResponse>> {
    let segments = query.segments.unwrap_or(DEFAULT_SEGMENTS);
    let scale = query.scene.then_some(state.config.scale);
    Ok(Json(orbit_for(&id, segments, scale, &state.config.opacity)?))
}

/// Orbit of catalog body `id`, in AU or, given a scale, in scene units.
pub fn orbit_for(
    id: &str,
    segments: usize,
    scale: Option<SceneScale>,
    ramp: &OpacityRamp,
) -> ApiResult<OrbitResponse> {
    let body = Catalog::builtin().lookup(id)?;
    let elements = body
        .entry()
        .elements
        .ok_or_else(|| ApiError::Validation(format!("{} has no orbit", body)))?;
    orbit_from_elements(body.as_str(), &elements, segments, scale, ramp)
}

pub fn orbit_from_elements(
    id: &str,
    elements: &OrbitalElements,
    segments: usize,
    scale: Option<SceneScale>,
    ramp: &OpacityRamp,
) -> ApiResult<OrbitResponse> {
    if segments > MAX_SEGMENTS {
        return Err(ApiError::Validation(format!(
            "at most {} segments, got {}",
            MAX_SEGMENTS, segments
        )));
    }

    let points = generate_orbit_path(elements, segments)?;
    let perihelion = position_at_true_anomaly(elements, 0.0)?;
    let aphelion = position_at_true_anomaly(elements, PI)?;
    let to_units = |p: Point3| match scale {
        Some(s) => s.point_au_to_scene(&p),
        None => p,
    };

    Ok(OrbitResponse {
        id: id.to_string(),
        units: if scale.is_some() { "scene" } else { "au" },
        opacity: ramp.classify(elements.semi_major_axis_au),
        perihelion_au: elements.perihelion_au(),
        aphelion_au: elements.aphelion_au(),
        perihelion: to_units(perihelion),
        aphelion: to_units(aphelion),
        points: points.into_iter().map(to_units).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> OpacityRamp {
        OpacityRamp::default()
    }

    #[test]
    fn test_au_path_for_earth() {
        let orbit = orbit_for("earth", 64, None, &ramp()).ok().unwrap();
        assert_eq!(orbit.units, "au");
        assert_eq!(orbit.points.len(), 64);
        assert!((orbit.perihelion.length() - orbit.perihelion_au).abs() < 1e-9);
        assert!((orbit.perihelion.length() - 0.983).abs() < 0.01);
        assert!((orbit.aphelion.length() - 1.017).abs() < 0.01);
        assert!(orbit.opacity > 0.15 && orbit.opacity < 0.6);
    }

    #[test]
    fn test_scene_units_are_scaled() {
        let scale = SceneScale::default();
        let au = orbit_for("mars", 16, None, &ramp()).ok().unwrap();
        let scene = orbit_for("mars", 16, Some(scale), &ramp()).ok().unwrap();
        assert_eq!(scene.units, "scene");
        let ratio = scene.points[3].length() / au.points[3].length();
        assert!((ratio - scale.units_per_au).abs() < 1e-9);
    }

    #[test]
    fn test_farther_orbits_are_fainter() {
        let jupiter = orbit_for("jupiter", 8, None, &ramp()).ok().unwrap();
        let neptune = orbit_for("neptune", 8, None, &ramp()).ok().unwrap();
        assert!(neptune.opacity < jupiter.opacity);
    }

    #[test]
    fn test_custom_elements() {
        let elements = OrbitalElements::new(2.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let orbit = orbit_from_elements("ring", &elements, 12, None, &ramp()).ok().unwrap();
        assert_eq!(orbit.id, "ring");
        for p in &orbit.points {
            assert!((p.length() - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(orbit_for("sun", 64, None, &ramp()), Err(ApiError::Validation(_))));
        assert!(matches!(orbit_for("earth", 2, None, &ramp()), Err(ApiError::Validation(_))));
        assert!(matches!(
            orbit_for("earth", MAX_SEGMENTS + 1, None, &ramp()),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(orbit_for("vulcan", 64, None, &ramp()), Err(ApiError::UnknownBody(_))));
    }
}
