mod cache;
mod catalog;
mod diagnostics;
mod math;
mod orbit;
mod resolver;
mod scale;
mod source;
mod web;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use crate::diagnostics::LogDiagnostics;
use crate::orbit::{classify_opacity, position_at_mean_anomaly, OrbitalElements};
use crate::source::EphemerisSource;
use crate::web::api::ephemeris::{parse_date, select_bodies, EphemerisResponse};
use crate::web::api::orbits::{orbit_from_elements, DEFAULT_SEGMENTS};
use crate::web::server::{build_resolver, build_source, http_client};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "orrery")]
#[command(about = "Solar system ephemeris service with cache and offline fallback")]
struct Cli {
    /// YAML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Resolve positions once through cache, upstream and fallback
    Fetch {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Comma separated body ids, defaults to the whole catalog
        #[arg(short, long)]
        ids: Option<String>,
        /// Skip the cache read
        #[arg(long)]
        force: bool,
        /// Single upstream attempt per body
        #[arg(long)]
        no_retry: bool,
        /// Print scene-unit positions instead of the JSON response
        #[arg(long)]
        scene: bool,
    },
    /// Query the upstream service directly, without cache or fallback
    Probe {
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        ids: Option<String>,
    },
    /// Print the sampled orbit of a body
    Orbit(OrbitArgs),
    /// Validate a configuration file
    CheckConfig { path: String },
}

#[derive(Args)]
struct OrbitArgs {
    /// Catalog body id, or a label when --elements is given
    id: String,
    #[arg(short, long, default_value_t = DEFAULT_SEGMENTS)]
    segments: usize,
    /// Scene units instead of AU
    #[arg(long)]
    scene: bool,
    /// Also print the position at this mean anomaly (degrees)
    #[arg(long)]
    mean_anomaly: Option<f64>,
    /// Custom orbit: a (AU), e, i, node, perihelion longitude (degrees)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    elements: Option<Vec<f64>>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Commands::CheckConfig { path } = &cli.command {
        return check_config(path);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Fetch {
            date,
            ids,
            force,
            no_retry,
            scene,
        } => fetch(config, date, ids, FetchFlags { force, no_retry, scene }).await,
        Commands::Probe { date, ids } => probe(config, date, ids).await,
        Commands::Orbit(args) => orbit(&config, args),
        Commands::CheckConfig { .. } => ExitCode::SUCCESS,
    }
}

fn load_config(path: Option<&str>) -> Result<Config, ExitCode> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    Config::from_file(path).map_err(|e| {
        eprintln!("Error loading config {}: {}", path, e);
        ExitCode::FAILURE
    })
}

fn check_config(path: &str) -> ExitCode {
    match Config::from_file(path) {
        Ok(config) => {
            println!("Config is valid");
            println!("  bind:      {}", config.web.bind);
            println!(
                "  horizons:  {} (min interval {})",
                config.horizons.base_url,
                humantime::format_duration(config.horizons.min_interval)
            );
            let cache = match config.cache.as_ref() {
                None => "disabled".to_string(),
                Some(c) if c.backend == web::config::CacheBackend::Memory => "memory".to_string(),
                Some(c) => match c.credentials() {
                    Some((url, _)) => format!("rest ({})", url),
                    None => "disabled (missing url or token)".to_string(),
                },
            };
            println!("  cache:     {}", cache);
            println!(
                "  retries:   {} attempts, deadline {}",
                config.resilience.max_attempts,
                humantime::format_duration(config.resilience.request_deadline)
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn selection(
    date: Option<String>,
    ids: Option<String>,
) -> Result<(NaiveDate, Vec<catalog::BodyId>), ExitCode> {
    let date = match date.as_deref() {
        Some(raw) => parse_date(raw),
        None => Ok(Utc::now().date_naive()),
    };
    let bodies = select_bodies(ids.as_deref());
    match (date, bodies) {
        (Ok(date), Ok(bodies)) => Ok((date, bodies)),
        (Err(_), _) => {
            eprintln!("Invalid date, expected YYYY-MM-DD");
            Err(ExitCode::FAILURE)
        }
        (_, Err(_)) => {
            eprintln!("Invalid body list: {:?}", ids.unwrap_or_default());
            Err(ExitCode::FAILURE)
        }
    }
}

struct FetchFlags {
    force: bool,
    no_retry: bool,
    scene: bool,
}

async fn fetch(
    mut config: Config,
    date: Option<String>,
    ids: Option<String>,
    flags: FetchFlags,
) -> ExitCode {
    let (date, bodies) = match selection(date, ids) {
        Ok(s) => s,
        Err(code) => return code,
    };
    if flags.no_retry {
        config.resilience = config.resilience.without_retries();
    }
    let resolver = match build_resolver(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let resolution = resolver.resolve(&bodies, date, flags.force).await;
    if !flags.scene {
        return print_json(&EphemerisResponse::from(resolution));
    }

    println!("{} on {} ({})", resolution.request_id, resolution.date, resolution.source);
    for record in &resolution.data {
        let p = config.scale.vector_km_to_scene(record.position());
        println!(
            "{:<8} {:>12.4} {:>12.4} {:>12.4}  {}",
            record.body_id(),
            p.x,
            p.y,
            p.z,
            record.timestamp().format("%Y-%m-%d %H:%M")
        );
    }
    for failure in &resolution.failures {
        eprintln!("{}: {} ({})", failure.body, failure.message, failure.kind);
    }
    ExitCode::SUCCESS
}

async fn probe(config: Config, date: Option<String>, ids: Option<String>) -> ExitCode {
    let (date, bodies) = match selection(date, ids) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let http = match http_client() {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let bodies: Vec<_> = bodies.into_iter().filter(|b| !b.is_star()).collect();
    let source = build_source(&config, http, Arc::new(LogDiagnostics));

    let records = source.fetch_many(&bodies, date).await;
    println!("{}/{} bodies answered", records.len(), bodies.len());
    let code = print_json(&records);
    if records.len() == bodies.len() {
        code
    } else {
        ExitCode::FAILURE
    }
}

fn orbit(config: &Config, args: OrbitArgs) -> ExitCode {
    let elements = match args.elements.as_deref() {
        Some(&[a, e, i, node, peri]) => {
            OrbitalElements::new(a, e, i, node, peri).map_err(|err| err.to_string())
        }
        Some(v) => Err(format!("expected 5 comma separated elements, got {}", v.len())),
        None => catalog::Catalog::builtin()
            .lookup(&args.id)
            .map_err(|e| e.to_string())
            .and_then(|b| b.entry().elements.ok_or_else(|| format!("{} has no orbit", b))),
    };
    let elements = match elements {
        Ok(el) => el,
        Err(e) => {
            eprintln!("Cannot build an orbit for '{}': {}", args.id, e);
            return ExitCode::FAILURE;
        }
    };

    let scale = args.scene.then_some(config.scale);
    let sampled = orbit_from_elements(
        &args.id,
        &elements,
        args.segments,
        scale,
        &config.opacity,
    );
    let orbit = match sampled {
        Ok(o) => o,
        Err(_) => {
            eprintln!("Cannot sample '{}' with {} segments", args.id, args.segments);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{}: {} points in {}, q = {:.4} AU, Q = {:.4} AU, opacity {:.2}",
        orbit.id,
        orbit.points.len(),
        orbit.units,
        orbit.perihelion_au,
        orbit.aphelion_au,
        orbit.opacity
    );
    if let Some(s) = scale {
        println!("1 scene unit = {:.0} km", s.scene_to_km(1.0));
    }
    for p in &orbit.points {
        println!("{:>14.6} {:>14.6} {:>14.6}", p.x, p.y, p.z);
    }

    if let Some(degrees) = args.mean_anomaly {
        match position_at_mean_anomaly(&elements, degrees.to_radians()) {
            Ok(p) => {
                let distance_au = p.length();
                let p = scale.map_or(p, |s| s.point_au_to_scene(&p));
                println!(
                    "M = {}°: {:.6} {:.6} {:.6} (r = {:.4} AU, opacity {:.2})",
                    degrees,
                    p.x,
                    p.y,
                    p.z,
                    distance_au,
                    classify_opacity(distance_au)
                );
            }
            Err(e) => {
                eprintln!("No position for mean anomaly {}: {}", degrees, e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to encode output: {}", e);
            ExitCode::FAILURE
        }
    }
}
