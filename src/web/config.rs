use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::cache::TtlPolicy;
use crate::orbit::OpacityRamp;
use crate::resolver::RetryPolicy;
use crate::scale::SceneScale;
use crate::source::DEFAULT_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub horizons: HorizonsConfig,
    /// Absent means caching is disabled.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub resilience: RetryPolicy,
    #[serde(default)]
    pub scale: SceneScale,
    #[serde(default)]
    pub opacity: OpacityRamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HorizonsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(
        default = "default_min_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub min_interval: Duration,
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_interval: default_min_interval(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_min_interval() -> Duration {
    Duration::from_secs(1)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Rest,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    pub url: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub ttl: TtlPolicy,
}

impl CacheConfig {
    /// URL and token of the REST store, if both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let token = self.token.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((url, token))
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn ttl(&self) -> TtlPolicy {
        self.cache.as_ref().map(|c| c.ttl).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        };

        if !(self.scale.units_per_au > 0.0 && self.scale.units_per_au.is_finite()) {
            return Err(invalid("scale.units_per_au", "must be a positive number"));
        }
        if self.scale.radius_exaggeration <= 0.0 {
            return Err(invalid("scale.radius_exaggeration", "must be positive"));
        }
        if self.resilience.max_attempts == 0 {
            return Err(invalid("resilience.max_attempts", "must be at least 1"));
        }
        if self.resilience.attempt_timeout.is_zero() || self.resilience.request_deadline.is_zero() {
            return Err(invalid("resilience", "timeouts must be non-zero"));
        }
        let ramp = &self.opacity;
        if !(ramp.near_au > 0.0 && ramp.near_au < ramp.far_au) {
            return Err(invalid("opacity", "need 0 < near_au < far_au"));
        }
        if !(0.0..=1.0).contains(&ramp.min_opacity) || !(0.0..=1.0).contains(&ramp.max_opacity) {
            return Err(invalid("opacity", "opacities must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Humantime string such as `"500ms"` or `"6h"`.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_durations<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|s| humantime::parse_duration(s).map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
web:
  bind: "127.0.0.1:9000"
horizons:
  base_url: "http://localhost:4000/horizons"
  min_interval: 250ms
cache:
  url: "https://kv.example.io"
  token: "secret"
  ttl:
    fast: 1h
resilience:
  max_attempts: 4
  backoff: ["100ms", "200ms"]
  attempt_timeout: 5s
  request_deadline: 30s
scale:
  units_per_au: 25.0
"#;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.horizons.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.horizons.min_interval, Duration::from_secs(1));
        assert!(config.cache.is_none());
        assert_eq!(config.resilience, RetryPolicy::default());
        assert_eq!(config.scale.units_per_au, 10.0);
        assert_eq!(config.ttl(), TtlPolicy::default());
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_yaml(FULL).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.horizons.min_interval, Duration::from_millis(250));
        let cache = config.cache.as_ref().unwrap();
        assert_eq!(cache.backend, CacheBackend::Rest);
        assert_eq!(cache.credentials(), Some(("https://kv.example.io", "secret")));
        assert_eq!(config.ttl().fast, Duration::from_secs(3600));
        assert_eq!(config.ttl().slow, TtlPolicy::default().slow);
        assert_eq!(config.resilience.max_attempts, 4);
        assert_eq!(config.resilience.request_deadline, Duration::from_secs(30));
        assert_eq!(config.scale.units_per_au, 25.0);
    }

    #[test]
    fn test_missing_token_means_no_credentials() {
        let config =
            Config::from_yaml("cache:\n  url: https://kv.example.io\n  token: \"  \"\n")
                .unwrap();
        assert_eq!(config.cache.unwrap().credentials(), None);
    }

    #[test]
    fn test_memory_backend() {
        let config = Config::from_yaml("cache:\n  backend: memory\n").unwrap();
        assert_eq!(config.cache.unwrap().backend, CacheBackend::Memory);
    }

    #[test]
    fn test_rejects_bad_values() {
        for yaml in [
            "scale:\n  units_per_au: 0\n",
            "resilience:\n  max_attempts: 0\n",
            "opacity:\n  near_au: 50\n  far_au: 10\n",
            "horizons:\n  min_interval: soon\n",
        ] {
            assert!(Config::from_yaml(yaml).is_err(), "{}", yaml);
        }
    }
}
