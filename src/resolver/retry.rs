use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use crate::catalog::BodyId;
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::source::{EphemerisRecord, EphemerisSource, SourceError};
use crate::web::config::{deserialize_duration, deserialize_durations};

/// How hard the resolver tries an upstream fetch before falling back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts per body, first one included.
    pub max_attempts: u32,
    /// Delay before attempt n+2. The last entry repeats.
    #[serde(deserialize_with = "deserialize_durations")]
    pub backoff: Vec<Duration>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub attempt_timeout: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: vec![Duration::from_millis(500), Duration::from_secs(1)],
            attempt_timeout: Duration::from_secs(10),
            request_deadline: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Same timeouts, single attempt.
    pub fn without_retries(self) -> Self {
        Self {
            max_attempts: 1,
            ..self
        }
    }

    /// Backoff before the given 1-based attempt. Zero for the first attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let index = (attempt - 2) as usize;
        self.backoff
            .get(index)
            .or(self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    pub(super) async fn fetch(
        &self,
        source: &dyn EphemerisSource,
        body: BodyId,
        date: NaiveDate,
        diagnostics: &dyn Diagnostics,
    ) -> Result<EphemerisRecord, SourceError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let attempt_result =
                tokio::time::timeout(self.attempt_timeout, source.fetch_one(body, date)).await;
            let result = match attempt_result {
                Ok(result) => result,
                Err(_) => Err(SourceError::Timeout(self.attempt_timeout)),
            };

            match result {
                Ok(record) => return Ok(record),
                Err(e) if !e.is_retryable() || attempt >= attempts => return Err(e),
                Err(_) => {
                    attempt += 1;
                    let delay = self.delay_before(attempt);
                    diagnostics.emit(DiagnosticEvent::RetryScheduled {
                        body,
                        attempt,
                        delay,
                    });
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
