use chrono::NaiveDate;
use std::collections::HashMap;

use crate::catalog::{BodyId, Catalog};
use crate::math::Vector3;
use crate::source::{ecliptic_au_to_scene_km, start_of_day, EphemerisRecord};

/// Bumped whenever the bundled fallback positions change.
pub const FALLBACK_VERSION: &str = "2024.1";

/// Approximate records served when neither cache nor upstream can answer.
///
/// Built once from the catalog's fallback positions, so every orbiting body
/// is covered.
#[derive(Debug)]
pub struct FallbackCatalog {
    epoch: NaiveDate,
    records: HashMap<BodyId, EphemerisRecord>,
}

impl FallbackCatalog {
    pub fn new(catalog: &Catalog) -> Self {
        let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        let records = catalog
            .orbiting()
            .into_iter()
            .map(|body| {
                let au = Vector3::from(body.entry().fallback_ecliptic_au);
                let record = EphemerisRecord::new(
                    body,
                    ecliptic_au_to_scene_km(au),
                    None,
                    start_of_day(epoch),
                );
                (body, record)
            })
            .collect();
        Self { epoch, records }
    }

    pub fn version(&self) -> &'static str {
        FALLBACK_VERSION
    }

    /// Instant the bundled positions describe.
    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// `None` only for the star, which is synthesized instead.
    pub fn record(&self, body: BodyId) -> Option<EphemerisRecord> {
        self.records.get(&body).cloned()
    }
}

/// The star sits at the origin of the heliocentric frame at every date.
pub fn star_record(body: BodyId, date: NaiveDate) -> EphemerisRecord {
    EphemerisRecord::new(body, Vector3::ZERO, Some(Vector3::ZERO), start_of_day(date))
}
