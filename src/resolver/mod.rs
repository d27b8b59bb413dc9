//! Cache-aside orchestration with per-body retry and fallback.
//!
//! [`Resolver::resolve`] always produces a full answer. Failures are reported
//! through the diagnostics sink and in [`Resolution::failures`], never as an
//! error to the caller.

mod fallback;
mod retry;
pub mod validation;

pub use fallback::{star_record, FallbackCatalog};
pub use retry::RetryPolicy;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cache::{CacheLookup, EphemerisCache};
use crate::catalog::BodyId;
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::source::{EphemerisRecord, EphemerisSource, SourceError};
use validation::validate_record;

/// Aggregate provenance of a response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Live,
    CacheHit,
    Fallback,
}

/// Where one body's record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Live,
    Cache,
    Fallback,
    /// Synthesized, never fetched or cached.
    Constant,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BodyFailure {
    #[schema(value_type = String)]
    pub body: BodyId,
    /// `upstream_unavailable`, `upstream_malformed`, `request_timeout` or
    /// `validation_failed`.
    pub kind: String,
    pub message: String,
}

impl BodyFailure {
    fn from_source(body: BodyId, error: &SourceError) -> Self {
        Self {
            body,
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub request_id: Uuid,
    pub date: NaiveDate,
    /// In request order. Bodies whose only record failed validation are absent.
    pub data: Vec<EphemerisRecord>,
    pub source: DataSource,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub origins: BTreeMap<String, RecordOrigin>,
    pub failures: Vec<BodyFailure>,
}

impl Resolution {
    fn assemble(
        request_id: Uuid,
        date: NaiveDate,
        bodies: &[BodyId],
        mut resolved: HashMap<BodyId, (EphemerisRecord, RecordOrigin)>,
        lookup_counts: (usize, usize),
        failures: Vec<BodyFailure>,
    ) -> Self {
        let mut data = Vec::with_capacity(bodies.len());
        let mut origins = BTreeMap::new();
        for body in bodies {
            if let Some((record, origin)) = resolved.remove(body) {
                origins.insert(body.as_str().to_string(), origin);
                data.push(record);
            }
        }

        let any = |wanted: RecordOrigin| origins.values().any(|o| *o == wanted);
        let source = if any(RecordOrigin::Live) {
            DataSource::Live
        } else if any(RecordOrigin::Fallback) {
            DataSource::Fallback
        } else {
            DataSource::CacheHit
        };

        Self {
            request_id,
            date,
            data,
            source,
            cache_hits: lookup_counts.0,
            cache_misses: lookup_counts.1,
            origins,
            failures,
        }
    }
}

pub struct Resolver {
    cache: Arc<EphemerisCache>,
    source: Arc<dyn EphemerisSource>,
    fallback: Arc<FallbackCatalog>,
    retry: RetryPolicy,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Resolver {
    pub fn new(
        cache: Arc<EphemerisCache>,
        source: Arc<dyn EphemerisSource>,
        fallback: Arc<FallbackCatalog>,
        retry: RetryPolicy,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            cache,
            source,
            fallback,
            retry,
            diagnostics,
        }
    }

    pub fn cache(&self) -> &EphemerisCache {
        &self.cache
    }

    pub fn fallback(&self) -> &FallbackCatalog {
        &self.fallback
    }

    /// Resolve `bodies` for `date`. Never fails.
    ///
    /// The request deadline bounds the cache read and the upstream fetches.
    /// Records already in hand when it passes are kept; only the bodies
    /// still unresolved are served from the fallback catalog.
    pub async fn resolve(
        &self,
        bodies: &[BodyId],
        date: NaiveDate,
        force_refresh: bool,
    ) -> Resolution {
        let request_id = Uuid::new_v4();
        let deadline = Instant::now() + self.retry.request_deadline;
        let resolution = self
            .try_resolve(request_id, bodies, date, force_refresh, deadline)
            .await;

        self.diagnostics.emit(DiagnosticEvent::Resolved {
            request_id,
            source: resolution.source,
            records: resolution.data.len(),
        });
        resolution
    }

    async fn try_resolve(
        &self,
        request_id: Uuid,
        bodies: &[BodyId],
        date: NaiveDate,
        force_refresh: bool,
        deadline: Instant,
    ) -> Resolution {
        let mut resolved = HashMap::with_capacity(bodies.len());
        let mut failures = Vec::new();

        let (stars, orbiting): (Vec<BodyId>, Vec<BodyId>) =
            bodies.iter().copied().partition(|b| b.is_star());
        for star in stars {
            resolved.insert(star, (star_record(star, date), RecordOrigin::Constant));
        }

        let lookup = if force_refresh {
            CacheLookup {
                hits: Vec::new(),
                misses: orbiting,
            }
        } else {
            match tokio::time::timeout_at(deadline, self.cache.get_many(&orbiting, date)).await {
                Ok(lookup) => lookup,
                Err(_) => {
                    self.expire(&orbiting, &mut resolved, &mut failures);
                    return Resolution::assemble(
                        request_id,
                        date,
                        bodies,
                        resolved,
                        (0, 0),
                        failures,
                    );
                }
            }
        };

        // A cached record that no longer validates is refetched.
        let mut misses = lookup.misses;
        let mut hits = 0;
        for record in lookup.hits {
            if self.check(&record).is_ok() {
                hits += 1;
                resolved.insert(record.body_id(), (record, RecordOrigin::Cache));
            } else {
                misses.push(record.body_id());
            }
        }
        let lookup_counts = if force_refresh {
            (0, 0)
        } else {
            (hits, misses.len())
        };

        // Sequential: the upstream rate limit is process-wide.
        let mut fresh = Vec::new();
        let mut pending = misses.into_iter();
        while let Some(body) = pending.next() {
            let fetch = self
                .retry
                .fetch(self.source.as_ref(), body, date, self.diagnostics.as_ref());
            match tokio::time::timeout_at(deadline, fetch).await {
                Ok(Ok(record)) => {
                    if self.accept(&record, &mut failures) {
                        fresh.push(record);
                    }
                }
                Ok(Err(e)) => {
                    failures.push(BodyFailure::from_source(body, &e));
                    if let Some(record) = self.fallback_for(body, &mut failures) {
                        resolved.insert(body, (record, RecordOrigin::Fallback));
                    }
                }
                Err(_) => {
                    let unresolved: Vec<BodyId> = std::iter::once(body).chain(pending).collect();
                    self.expire(&unresolved, &mut resolved, &mut failures);
                    break;
                }
            }
        }

        if !fresh.is_empty() {
            self.cache.set_many(date, &fresh).await;
        }
        for record in fresh {
            resolved.insert(record.body_id(), (record, RecordOrigin::Live));
        }

        Resolution::assemble(request_id, date, bodies, resolved, lookup_counts, failures)
    }

    /// The request deadline passed with `unresolved` still outstanding.
    fn expire(
        &self,
        unresolved: &[BodyId],
        resolved: &mut HashMap<BodyId, (EphemerisRecord, RecordOrigin)>,
        failures: &mut Vec<BodyFailure>,
    ) {
        let error = SourceError::Timeout(self.retry.request_deadline);
        self.diagnostics.emit(DiagnosticEvent::PipelineFailed {
            error: error.to_string(),
        });
        for &body in unresolved {
            failures.push(BodyFailure::from_source(body, &error));
            if let Some(record) = self.fallback_for(body, failures) {
                resolved.insert(body, (record, RecordOrigin::Fallback));
            }
        }
    }

    fn fallback_for(
        &self,
        body: BodyId,
        failures: &mut Vec<BodyFailure>,
    ) -> Option<EphemerisRecord> {
        let record = self.fallback.record(body)?;
        if !self.accept(&record, failures) {
            return None;
        }
        self.diagnostics.emit(DiagnosticEvent::FallbackUsed { body });
        Some(record)
    }

    fn check(&self, record: &EphemerisRecord) -> Result<(), String> {
        validate_record(record).map_err(|e| {
            self.diagnostics.emit(DiagnosticEvent::RecordRejected {
                body: record.body_id(),
                reason: e.to_string(),
            });
            e.to_string()
        })
    }

    /// Validate, reporting and recording the rejection if the record is bad.
    fn accept(&self, record: &EphemerisRecord, failures: &mut Vec<BodyFailure>) -> bool {
        match self.check(record) {
            Ok(()) => true,
            Err(message) => {
                failures.push(BodyFailure {
                    body: record.body_id(),
                    kind: "validation_failed".to_string(),
                    message,
                });
                false
            }
        }
    }
}
