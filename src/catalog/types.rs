use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;

use crate::catalog::Catalog;
use crate::orbit::OrbitalElements;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Star,
    Planet,
    DwarfPlanet,
}

/// Orbital speed class used to pick a cache TTL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpeedTier {
    /// Inner planets, positions drift noticeably within a day.
    Fast,
    Default,
    /// Outer bodies, day-old positions are indistinguishable on screen.
    Slow,
}

/// One row of the canonical body table.
#[derive(Debug)]
pub struct BodyEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: BodyKind,
    /// COMMAND parameter understood by the Horizons API.
    pub horizons_command: &'static str,
    pub radius_km: f64,
    pub tier: SpeedTier,
    /// `None` for the central star.
    pub elements: Option<OrbitalElements>,
    /// Approximate heliocentric ecliptic position (AU) at the fallback epoch.
    pub fallback_ecliptic_au: [f64; 3],
}

/// Identifier of a catalog body.
///
/// Only obtainable from the [`Catalog`], so every id refers to an existing
/// entry.
#[derive(Clone, Copy)]
pub struct BodyId(pub(super) &'static BodyEntry);

impl BodyId {
    pub fn as_str(&self) -> &'static str {
        self.0.id
    }

    pub fn entry(&self) -> &'static BodyEntry {
        self.0
    }

    pub fn is_star(&self) -> bool {
        self.0.kind == BodyKind::Star
    }
}

impl PartialEq for BodyId {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for BodyId {}

impl Hash for BodyId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0.id)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.id)
    }
}

impl Serialize for BodyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.id)
    }
}

impl<'de> Deserialize<'de> for BodyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Catalog::builtin()
            .lookup(&s)
            .map_err(serde::de::Error::custom)
    }
}
