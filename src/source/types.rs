use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::BodyId;
use crate::math::Vector3;

/// Position (km) and optional velocity (km/s) of one body at one instant,
/// in the scene frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EphemerisRecord {
    #[schema(value_type = String, example = "earth")]
    body_id: BodyId,
    name: String,
    position: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    velocity: Option<Vector3>,
    timestamp: DateTime<Utc>,
}

impl EphemerisRecord {
    pub fn new(
        body_id: BodyId,
        position: Vector3,
        velocity: Option<Vector3>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            body_id,
            name: body_id.entry().name.to_string(),
            position,
            velocity,
            timestamp,
        }
    }

    pub fn body_id(&self) -> BodyId {
        self.body_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &Vector3 {
        &self.position
    }

    pub fn velocity(&self) -> Option<&Vector3> {
        self.velocity.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Midnight UTC of `date`, the instant a one-day Horizons window starts at.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
