use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::Arc;

use crate::catalog::BodyId;
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::source::parsing::parse_vectors;
use crate::source::rate_limit::RateLimiter;
use crate::source::types::start_of_day;
use crate::source::{EphemerisRecord, EphemerisSource, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// Client for the JPL Horizons vector ephemeris API.
pub struct HorizonsClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl HorizonsClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        limiter: Arc<RateLimiter>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            limiter,
            diagnostics,
        }
    }

    async fn request(
        &self,
        body: BodyId,
        date: NaiveDate,
    ) -> Result<EphemerisRecord, SourceError> {
        let waited = self.limiter.acquire().await;
        if !waited.is_zero() {
            self.diagnostics
                .emit(DiagnosticEvent::RateLimited { waited });
        }
        self.diagnostics
            .emit(DiagnosticEvent::UpstreamRequest { body, date });

        let response = self
            .http
            .get(&self.base_url)
            .query(&query_params(body, date)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "Horizons returned HTTP {}",
                status
            )));
        }

        let text = response.text().await?;
        let state = parse_vectors(&text)?;

        Ok(EphemerisRecord::new(
            body,
            state.position_km,
            state.velocity_km_s,
            start_of_day(date),
        ))
    }
}

#[async_trait]
impl EphemerisSource for HorizonsClient {
    async fn fetch_one(
        &self,
        body: BodyId,
        date: NaiveDate,
    ) -> Result<EphemerisRecord, SourceError> {
        let result = self.request(body, date).await;
        if let Err(ref e) = result {
            self.diagnostics.emit(DiagnosticEvent::UpstreamFailed {
                body,
                error: e.to_string(),
            });
        }
        result
    }
}

/// One-day, one-step heliocentric vector table in AU and days.
fn query_params(
    body: BodyId,
    date: NaiveDate,
) -> Result<Vec<(&'static str, String)>, SourceError> {
    let stop = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| SourceError::Unavailable(format!("date out of range: {}", date)))?;
    let quoted = |s: &str| format!("'{}'", s);

    Ok(vec![
        ("format", "text".to_string()),
        ("COMMAND", quoted(body.entry().horizons_command)),
        ("OBJ_DATA", quoted("NO")),
        ("MAKE_EPHEM", quoted("YES")),
        ("EPHEM_TYPE", quoted("VECTORS")),
        ("CENTER", quoted("500@10")),
        ("START_TIME", quoted(&date.format("%Y-%m-%d").to_string())),
        ("STOP_TIME", quoted(&stop.format("%Y-%m-%d").to_string())),
        ("STEP_SIZE", quoted("1 d")),
        ("REF_PLANE", quoted("ECLIPTIC")),
        ("REF_SYSTEM", quoted("J2000")),
        ("OUT_UNITS", quoted("AU-D")),
        ("VEC_TABLE", quoted("2")),
        ("CSV_FORMAT", quoted("NO")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::diagnostics::RecordingDiagnostics;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;

    const VECTORS: &str = "\
Target body name: Earth (399)
$$SOE
2460310.500000000 = A.D. 2024-Jan-01 00:00:00.0000 TDB
 X =-1.685246489174995E-01 Y = 9.687833048228511E-01 Z =-5.245182505144673E-05
 VX=-1.723394583068879E-02 VY=-3.007660259271771E-03 VZ= 2.797084306856309E-07
$$EOE
";

    /// Local stand-in for Horizons. Returns the base URL for each route.
    async fn upstream() -> String {
        let app = Router::new()
            .route("/ok/horizons.api", get(|| async { VECTORS }))
            .route(
                "/down/horizons.api",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
            )
            .route(
                "/error/horizons.api",
                get(|| async { "API ERROR: no matches found for COMMAND" }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    fn client(
        base_url: String,
        min_interval: Duration,
    ) -> (HorizonsClient, Arc<RecordingDiagnostics>) {
        let sink = RecordingDiagnostics::new();
        let client = HorizonsClient::new(
            reqwest::Client::builder().no_proxy().build().unwrap(),
            base_url,
            Arc::new(RateLimiter::new(min_interval)),
            sink.clone(),
        );
        (client, sink)
    }

    fn earth() -> BodyId {
        Catalog::builtin().lookup("earth").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_vector_table() {
        let base = upstream().await;
        let (client, sink) = client(format!("{}/ok/horizons.api", base), Duration::ZERO);

        let record = client.fetch_one(earth(), date()).await.unwrap();

        let expected = parse_vectors(VECTORS).unwrap();
        assert_eq!(*record.position(), expected.position_km);
        assert_eq!(record.velocity(), expected.velocity_km_s.as_ref());
        assert_eq!(record.timestamp(), start_of_day(date()));
        assert_eq!(
            sink.count(|e| matches!(e, DiagnosticEvent::UpstreamRequest { .. })),
            1
        );
        assert_eq!(
            sink.count(|e| matches!(e, DiagnosticEvent::UpstreamFailed { .. })),
            0
        );
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let base = upstream().await;
        let (client, sink) = client(format!("{}/down/horizons.api", base), Duration::ZERO);

        let result = client.fetch_one(earth(), date()).await;

        match result {
            Err(SourceError::Unavailable(message)) => assert!(message.contains("503")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
        assert_eq!(
            sink.count(|e| matches!(e, DiagnosticEvent::UpstreamFailed { .. })),
            1
        );
    }

    #[tokio::test]
    async fn test_error_text_with_ok_status_is_malformed() {
        let base = upstream().await;
        let (client, sink) = client(format!("{}/error/horizons.api", base), Duration::ZERO);

        let result = client.fetch_one(earth(), date()).await;

        assert!(matches!(result, Err(SourceError::Malformed(_))));
        assert!(sink.events().iter().any(|e| matches!(
            e,
            DiagnosticEvent::UpstreamFailed { error, .. } if error.contains("$$SOE")
        )));
    }

    #[tokio::test]
    async fn test_back_to_back_calls_go_through_the_limiter() {
        let base = upstream().await;
        let (client, sink) = client(
            format!("{}/ok/horizons.api", base),
            Duration::from_millis(500),
        );

        client.fetch_one(earth(), date()).await.unwrap();
        client.fetch_one(earth(), date()).await.unwrap();

        let waits: Vec<Duration> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                DiagnosticEvent::RateLimited { waited } => Some(waited),
                _ => None,
            })
            .collect();
        assert_eq!(waits.len(), 1);
        assert!(waits[0] > Duration::ZERO);
        // The wait comes before the second outbound request.
        let events = sink.events();
        let limited = events
            .iter()
            .position(|e| matches!(e, DiagnosticEvent::RateLimited { .. }))
            .unwrap();
        let requests: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, DiagnosticEvent::UpstreamRequest { .. }))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(requests.len(), 2);
        assert!(requests[0] < limited && limited < requests[1]);
    }

    #[test]
    fn test_query_covers_one_day_window() {
        let mars = Catalog::builtin().lookup("mars").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let params = query_params(mars, date).unwrap();
        let get = |k: &str| {
            params
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("COMMAND"), "'499'");
        assert_eq!(get("START_TIME"), "'2024-02-28'");
        assert_eq!(get("STOP_TIME"), "'2024-02-29'");
        assert_eq!(get("STEP_SIZE"), "'1 d'");
        assert_eq!(get("REF_PLANE"), "'ECLIPTIC'");
        assert_eq!(get("OUT_UNITS"), "'AU-D'");
        assert_eq!(get("VEC_TABLE"), "'2'");
    }
}
