use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::catalog::{BodyId, Catalog};
use crate::resolver::{BodyFailure, DataSource, RecordOrigin, Resolution};
use crate::source::EphemerisRecord;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EphemerisQuery {
    /// `YYYY-MM-DD`, defaults to today (UTC).
    pub date: Option<String>,
    /// Comma separated body ids, defaults to the whole catalog.
    pub ids: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EphemerisMeta {
    pub source: DataSource,
    pub timestamp: DateTime<Utc>,
    pub requested_date: NaiveDate,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Origin of each returned body's record.
    pub sources: BTreeMap<String, RecordOrigin>,
    pub failures: Vec<BodyFailure>,
    #[schema(value_type = String)]
    pub request_id: uuid::Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EphemerisResponse {
    pub data: Vec<EphemerisRecord>,
    pub meta: EphemerisMeta,
}

impl From<Resolution> for EphemerisResponse {
    fn from(resolution: Resolution) -> Self {
        EphemerisResponse {
            data: resolution.data,
            meta: EphemerisMeta {
                source: resolution.source,
                timestamp: Utc::now(),
                requested_date: resolution.date,
                cache_hits: resolution.cache_hits,
                cache_misses: resolution.cache_misses,
                sources: resolution.origins,
                failures: resolution.failures,
                request_id: resolution.request_id,
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ephemeris",
    tag = "ephemeris",
    params(
        ("date" = Option<String>, Query, description = "Date (YYYY-MM-DD), defaults to today"),
        ("ids" = Option<String>, Query, description = "Comma separated body ids, defaults to all"),
        ("force" = Option<bool>, Query, description = "Bypass the cache read")
    ),
    responses(
        (status = 200, description = "Body positions for the date", body = EphemerisResponse),
        (status = 400, description = "Bad date or unknown body id", body = ErrorResponse)
    )
)]
pub async fn get_ephemeris(
    State(state): State<AppState>,
    Query(query): Query<EphemerisQuery>,
) -> ApiResult<Json<EphemerisResponse>> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let bodies = select_bodies(query.ids.as_deref())?;

    let resolution = state.resolver.resolve(&bodies, date, query.force).await;
    Ok(Json(resolution.into()))
}

pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::Validation(format!("invalid date '{}': {}", raw, e)))
}

/// `None` selects the whole catalog.
pub fn select_bodies(ids: Option<&str>) -> ApiResult<Vec<BodyId>> {
    let catalog = Catalog::builtin();
    match ids {
        Some(csv) => Ok(catalog.parse_ids(csv)?),
        None => Ok(catalog.ids()),
    }
}
