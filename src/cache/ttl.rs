use serde::Deserialize;
use std::time::Duration;

use crate::catalog::SpeedTier;
use crate::web::config::deserialize_duration;

const HOUR: u64 = 60 * 60;

/// Cache lifetime per orbital speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TtlPolicy {
    #[serde(deserialize_with = "deserialize_duration")]
    pub fast: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub default: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub slow: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            fast: Duration::from_secs(6 * HOUR),
            default: Duration::from_secs(12 * HOUR),
            slow: Duration::from_secs(24 * HOUR),
        }
    }
}

impl TtlPolicy {
    pub fn for_tier(&self, tier: SpeedTier) -> Duration {
        match tier {
            SpeedTier::Fast => self.fast,
            SpeedTier::Default => self.default,
            SpeedTier::Slow => self.slow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_outer_bodies_live_longer() {
        let policy = TtlPolicy::default();
        let catalog = Catalog::builtin();
        let ttl = |id: &str| policy.for_tier(catalog.lookup(id).unwrap().entry().tier);

        assert_eq!(ttl("mercury"), Duration::from_secs(6 * HOUR));
        assert_eq!(ttl("jupiter"), Duration::from_secs(12 * HOUR));
        assert_eq!(ttl("neptune"), Duration::from_secs(24 * HOUR));
        assert!(ttl("earth") < ttl("saturn"));
        assert!(ttl("saturn") < ttl("pluto"));
    }

    #[test]
    fn test_deserializes_humantime_strings() {
        let policy: TtlPolicy = serde_yaml::from_str("fast: 30m\nslow: 2days\n").unwrap();
        assert_eq!(policy.fast, Duration::from_secs(30 * 60));
        assert_eq!(policy.default, Duration::from_secs(12 * HOUR));
        assert_eq!(policy.slow, Duration::from_secs(48 * HOUR));
    }
}
