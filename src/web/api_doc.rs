use utoipa::OpenApi;

use super::api::bodies::BodySummary;
use super::api::ephemeris::{EphemerisMeta, EphemerisQuery, EphemerisResponse};
use super::api::error::ErrorResponse;
use super::api::health::HealthResponse;
use super::api::orbits::{OrbitQuery, OrbitResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::ephemeris::get_ephemeris,
        super::api::bodies::list_bodies,
        super::api::orbits::get_orbit,
        super::api::health::health,
    ),
    components(
        schemas(
            EphemerisResponse,
            EphemerisMeta,
            EphemerisQuery,
            BodySummary,
            OrbitResponse,
            OrbitQuery,
            HealthResponse,
            ErrorResponse,
            crate::source::EphemerisRecord,
            crate::math::Vector3,
            crate::resolver::DataSource,
            crate::resolver::RecordOrigin,
            crate::resolver::BodyFailure,
            crate::catalog::BodyKind,
            crate::catalog::SpeedTier,
            crate::orbit::OrbitalElements,
        )
    ),
    info(
        title = "Orrery Ephemeris API",
        description = "Body positions with cache and fallback, plus orbit geometry",
        version = "0.1.0"
    ),
    tags(
        (name = "ephemeris", description = "Resolved body positions"),
        (name = "catalog", description = "Bodies and their orbits"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
