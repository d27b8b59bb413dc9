use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cache::{EphemerisCache, KvStore, MemoryKvStore, RestKvStore};
use crate::catalog::Catalog;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::resolver::{FallbackCatalog, Resolver};
use crate::source::{HorizonsClient, RateLimiter};

use super::api::bodies as body_handlers;
use super::api::ephemeris as ephemeris_handlers;
use super::api::health as health_handlers;
use super::api::orbits as orbit_handlers;
use super::api_doc::ApiDoc;
use super::config::{CacheBackend, Config};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<Resolver>,
}

pub fn http_client() -> std::io::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("orrery/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(std::io::Error::other)
}

pub fn build_source(
    config: &Config,
    http: reqwest::Client,
    diagnostics: Arc<dyn Diagnostics>,
) -> HorizonsClient {
    HorizonsClient::new(
        http,
        config.horizons.base_url.clone(),
        Arc::new(RateLimiter::new(config.horizons.min_interval)),
        diagnostics,
    )
}

/// Wire the pipeline from configuration. The only place a store handle is
/// created.
pub fn build_resolver(config: &Config) -> std::io::Result<Resolver> {
    let diagnostics: Arc<dyn Diagnostics> = Arc::new(LogDiagnostics);
    let http = http_client()?;

    let cache = EphemerisCache::new(
        cache_store(config, &http),
        config.ttl(),
        diagnostics.clone(),
    );
    let source = build_source(config, http, diagnostics.clone());

    Ok(Resolver::new(
        Arc::new(cache),
        Arc::new(source),
        Arc::new(FallbackCatalog::new(Catalog::builtin())),
        config.resilience.clone(),
        diagnostics,
    ))
}

fn cache_store(config: &Config, http: &reqwest::Client) -> Option<Arc<dyn KvStore>> {
    let cache = config.cache.as_ref()?;
    match cache.backend {
        CacheBackend::Memory => Some(Arc::new(MemoryKvStore::new())),
        CacheBackend::Rest => match cache.credentials() {
            Some((url, token)) => Some(Arc::new(RestKvStore::new(http.clone(), url, token))),
            None => {
                log::warn!("Cache url or token missing, caching disabled");
                None
            }
        },
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handlers::health))
        .route("/api/ephemeris", get(ephemeris_handlers::get_ephemeris))
        .route("/api/bodies", get(body_handlers::list_bodies))
        .route("/api/orbits/{id}", get(orbit_handlers::get_orbit))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let resolver = build_resolver(&config)?;

    let state = AppState {
        config: Arc::new(config),
        resolver: Arc::new(resolver),
    };
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
