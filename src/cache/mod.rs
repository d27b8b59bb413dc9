//! Cache-aside storage of ephemeris records keyed by body and date.
//!
//! The cache never fails its caller: an unconfigured or unreachable store
//! turns reads into misses and writes into no-ops.

mod error;
mod store;
mod ttl;

pub use error::CacheError;
pub use store::{KvStore, MemoryKvStore, RestKvStore};
pub use ttl::TtlPolicy;

use chrono::NaiveDate;
use futures_util::future::join_all;
use std::sync::Arc;

use crate::catalog::BodyId;
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::source::EphemerisRecord;

#[derive(Debug, Default)]
pub struct CacheLookup {
    pub hits: Vec<EphemerisRecord>,
    pub misses: Vec<BodyId>,
}

pub struct EphemerisCache {
    /// `None` means caching is disabled.
    store: Option<Arc<dyn KvStore>>,
    ttl: TtlPolicy,
    diagnostics: Arc<dyn Diagnostics>,
}

pub fn cache_key(body: BodyId, date: NaiveDate) -> String {
    format!("ephemeris:{}:{}", body, date.format("%Y-%m-%d"))
}

impl EphemerisCache {
    pub fn new(
        store: Option<Arc<dyn KvStore>>,
        ttl: TtlPolicy,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        if store.is_none() {
            diagnostics.emit(DiagnosticEvent::CacheDisabled);
        }
        Self {
            store,
            ttl,
            diagnostics,
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Look up every body concurrently. Failed lookups count as misses.
    pub async fn get_many(&self, bodies: &[BodyId], date: NaiveDate) -> CacheLookup {
        let Some(store) = &self.store else {
            return CacheLookup {
                hits: Vec::new(),
                misses: bodies.to_vec(),
            };
        };

        let results = join_all(
            bodies
                .iter()
                .map(|&body| self.get_one(store.as_ref(), body, date)),
        )
        .await;

        let mut lookup = CacheLookup::default();
        for (&body, result) in bodies.iter().zip(results) {
            match result {
                Some(record) => {
                    self.diagnostics
                        .emit(DiagnosticEvent::CacheHit { body, date });
                    lookup.hits.push(record);
                }
                None => {
                    self.diagnostics
                        .emit(DiagnosticEvent::CacheMiss { body, date });
                    lookup.misses.push(body);
                }
            }
        }
        lookup
    }

    async fn get_one(
        &self,
        store: &dyn KvStore,
        body: BodyId,
        date: NaiveDate,
    ) -> Option<EphemerisRecord> {
        let key = cache_key(body, date);
        let decoded = match store.get(&key).await {
            Ok(Some(raw)) => {
                serde_json::from_str::<EphemerisRecord>(&raw).map_err(CacheError::from)
            }
            Ok(None) => return None,
            Err(e) => Err(e),
        };

        match decoded {
            Ok(record) if record.body_id() == body => Some(record),
            Ok(record) => {
                self.report(&key, format!("entry holds {}", record.body_id()));
                None
            }
            Err(e) => {
                self.report(&key, e.to_string());
                None
            }
        }
    }

    /// Write records for `date`, each with its body's tier TTL. Errors are
    /// reported and swallowed.
    pub async fn set_many(&self, date: NaiveDate, records: &[EphemerisRecord]) {
        let Some(store) = &self.store else {
            return;
        };

        let writes = records
            .iter()
            .filter(|r| !r.body_id().is_star())
            .map(|record| async move {
                let body = record.body_id();
                let key = cache_key(body, date);
                let ttl = self.ttl.for_tier(body.entry().tier);
                let result = match serde_json::to_string(record) {
                    Ok(value) => store.set_ex(&key, &value, ttl).await,
                    Err(e) => Err(CacheError::from(e)),
                };
                match result {
                    Ok(()) => self
                        .diagnostics
                        .emit(DiagnosticEvent::CacheWrite { body, ttl }),
                    Err(e) => self.report(&key, e.to_string()),
                }
            });

        join_all(writes).await;
    }

    fn report(&self, key: &str, error: String) {
        self.diagnostics.emit(DiagnosticEvent::CacheError {
            key: key.to_string(),
            error,
        });
    }
}
