use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// `available` or `disabled`.
    pub cache: &'static str,
    pub fallback_version: &'static str,
    pub fallback_epoch: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let fallback = state.resolver.fallback();
    Json(HealthResponse {
        status: "ok",
        cache: if state.resolver.cache().is_available() {
            "available"
        } else {
            "disabled"
        },
        fallback_version: fallback.version(),
        fallback_epoch: fallback.epoch(),
    })
}
