//! Canonical per-body table.
//!
//! Orbital elements, cache tiers, upstream command ids and fallback positions
//! all live on one [`BodyEntry`] so the derived views cannot drift apart.

mod bodies;
mod error;
mod types;

pub use error::CatalogError;
pub use types::{BodyEntry, BodyId, BodyKind, SpeedTier};

use bodies::BODIES;

#[derive(Debug)]
pub struct Catalog {
    bodies: &'static [BodyEntry],
}

static BUILTIN: Catalog = Catalog { bodies: &BODIES };

impl Catalog {
    /// The process-wide bundled catalog.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn lookup(&self, id: &str) -> Result<BodyId, CatalogError> {
        let needle = id.trim();
        self.bodies
            .iter()
            .find(|b| b.id.eq_ignore_ascii_case(needle))
            .map(BodyId)
            .ok_or_else(|| CatalogError::UnknownBody(needle.to_string()))
    }

    /// All bodies in catalog order, star first.
    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.iter().map(BodyId).collect()
    }

    /// Bodies that orbit the star.
    pub fn orbiting(&self) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|b| b.elements.is_some())
            .map(BodyId)
            .collect()
    }

    /// Parse a comma separated id list, keeping order and dropping duplicates.
    pub fn parse_ids(&self, csv: &str) -> Result<Vec<BodyId>, CatalogError> {
        let mut ids: Vec<BodyId> = Vec::new();
        for part in csv.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = self.lookup(part)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Err(CatalogError::EmptySelection);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup("Earth").unwrap().as_str(), "earth");
        assert!(matches!(
            catalog.lookup("vulcan"),
            Err(CatalogError::UnknownBody(_))
        ));
    }

    #[test]
    fn test_single_star_without_elements() {
        let stars: Vec<_> = Catalog::builtin()
            .ids()
            .into_iter()
            .filter(|id| id.is_star())
            .collect();
        assert_eq!(stars.len(), 1);
        assert!(stars[0].entry().elements.is_none());
    }

    #[test]
    fn test_every_orbiting_body_has_valid_elements_and_fallback() {
        for id in Catalog::builtin().orbiting() {
            let entry = id.entry();
            let elements = entry.elements.as_ref().unwrap();
            assert!(elements.validate().is_ok(), "{} elements", id);
            let [x, y, z] = entry.fallback_ecliptic_au;
            let r = (x * x + y * y + z * z).sqrt();
            let a = elements.semi_major_axis_au;
            let e = elements.eccentricity;
            assert!(
                r >= a * (1.0 - e) * 0.95 && r <= a * (1.0 + e) * 1.05,
                "{} fallback distance {} outside orbit",
                id,
                r
            );
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let ids = Catalog::builtin().ids();
        for (i, a) in ids.iter().enumerate() {
            assert!(ids[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn test_parse_ids_dedups_and_rejects_unknown() {
        let catalog = Catalog::builtin();
        let ids = catalog.parse_ids("mars, earth,mars,").unwrap();
        let names: Vec<_> = ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(names, vec!["mars", "earth"]);
        assert!(catalog.parse_ids("mars,krypton").is_err());
        assert!(matches!(
            catalog.parse_ids(" , "),
            Err(CatalogError::EmptySelection)
        ));
    }

    #[test]
    fn test_body_id_serde_roundtrip_through_catalog() {
        let id = Catalog::builtin().lookup("saturn").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"saturn\"");
        let back: BodyId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<BodyId>("\"nibiru\"").is_err());
    }
}
