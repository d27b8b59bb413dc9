use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{BodyKind, Catalog, SpeedTier};
use crate::orbit::OrbitalElements;
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BodySummary {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: BodyKind,
    pub tier: SpeedTier,
    pub radius_km: f64,
    /// Drawn radius after exaggeration, in scene units.
    pub scene_radius: f64,
    pub elements: Option<OrbitalElements>,
}

#[utoipa::path(
    get,
    path = "/api/bodies",
    tag = "catalog",
    responses(
        (status = 200, description = "Every body in the catalog", body = Vec<BodySummary>)
    )
)]
pub async fn list_bodies(State(state): State<AppState>) -> Json<Vec<BodySummary>> {
    let scale = state.config.scale;
    let bodies = Catalog::builtin()
        .ids()
        .into_iter()
        .map(|id| {
            let entry = id.entry();
            BodySummary {
                id: entry.id,
                name: entry.name,
                kind: entry.kind,
                tier: entry.tier,
                radius_km: entry.radius_km,
                scene_radius: scale.body_radius_to_scene(entry.radius_km),
                elements: entry.elements,
            }
        })
        .collect();
    Json(bodies)
}
