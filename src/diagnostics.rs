//! Structured diagnostic events emitted by the pipeline components.
//!
//! Every component receives an `Arc<dyn Diagnostics>`; production wiring uses
//! [`LogDiagnostics`], tests use [`RecordingDiagnostics`] and assert on events.

use chrono::NaiveDate;
#[cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::BodyId;
use crate::resolver::DataSource;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    RateLimited {
        waited: Duration,
    },
    UpstreamRequest {
        body: BodyId,
        date: NaiveDate,
    },
    UpstreamFailed {
        body: BodyId,
        error: String,
    },
    CacheDisabled,
    CacheHit {
        body: BodyId,
        date: NaiveDate,
    },
    CacheMiss {
        body: BodyId,
        date: NaiveDate,
    },
    CacheError {
        key: String,
        error: String,
    },
    CacheWrite {
        body: BodyId,
        ttl: Duration,
    },
    RetryScheduled {
        body: BodyId,
        attempt: u32,
        delay: Duration,
    },
    FallbackUsed {
        body: BodyId,
    },
    RecordRejected {
        body: BodyId,
        reason: String,
    },
    PipelineFailed {
        error: String,
    },
    Resolved {
        request_id: uuid::Uuid,
        source: DataSource,
        records: usize,
    },
}

pub trait Diagnostics: Send + Sync {
    fn emit(&self, event: DiagnosticEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn emit(&self, event: DiagnosticEvent) {
        use DiagnosticEvent::*;
        match event {
            RateLimited { waited } => log::debug!("Rate limiter delayed request by {:?}", waited),
            UpstreamRequest { body, date } => {
                log::info!("Fetching {} for {} from Horizons", body, date)
            }
            UpstreamFailed { body, error } => {
                log::warn!("Horizons fetch failed for {}: {}", body, error)
            }
            CacheDisabled => log::info!("Ephemeris cache not configured, caching disabled"),
            CacheHit { body, date } => log::debug!("Cache hit for {} on {}", body, date),
            CacheMiss { body, date } => log::debug!("Cache miss for {} on {}", body, date),
            CacheError { key, error } => log::warn!("Cache error on {}: {}", key, error),
            CacheWrite { body, ttl } => log::debug!("Cached {} for {:?}", body, ttl),
            RetryScheduled {
                body,
                attempt,
                delay,
            } => log::info!(
                "Retrying {} (attempt {}) after {:?}",
                body,
                attempt,
                delay
            ),
            FallbackUsed { body } => log::warn!("Serving fallback position for {}", body),
            RecordRejected { body, reason } => {
                log::warn!("Dropping invalid record for {}: {}", body, reason)
            }
            PipelineFailed { error } => {
                log::error!("Ephemeris pipeline failed, serving fallback: {}", error)
            }
            Resolved {
                request_id,
                source,
                records,
            } => log::info!(
                "Request {} resolved {} records ({})",
                request_id,
                records,
                source
            ),
        }
    }
}

/// Keeps every event in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

#[cfg(test)]
impl RecordingDiagnostics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&DiagnosticEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

#[cfg(test)]
impl Diagnostics for RecordingDiagnostics {
    fn emit(&self, event: DiagnosticEvent) {
        self.events.lock().unwrap().push(event);
    }
}
