//! Acquisition of body state vectors from the upstream ephemeris service.

mod error;
mod horizons;
mod parsing;
mod rate_limit;
mod types;

pub use error::SourceError;
pub use horizons::{HorizonsClient, DEFAULT_BASE_URL};
pub use parsing::ecliptic_au_to_scene_km;
pub use rate_limit::RateLimiter;
pub use types::{start_of_day, EphemerisRecord};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::catalog::BodyId;

#[async_trait]
pub trait EphemerisSource: Send + Sync {
    /// Fetch one body. No retries happen here.
    async fn fetch_one(
        &self,
        body: BodyId,
        date: NaiveDate,
    ) -> Result<EphemerisRecord, SourceError>;

    /// Fetch bodies one after another. Failed bodies are left out.
    async fn fetch_many(&self, bodies: &[BodyId], date: NaiveDate) -> Vec<EphemerisRecord> {
        let mut records = Vec::with_capacity(bodies.len());
        for &body in bodies {
            if let Ok(record) = self.fetch_one(body, date).await {
                records.push(record);
            }
        }
        records
    }
}
