//=========================================================================
// Galaxy Catalog
//=========================================================================
//
// Static, read-only list of galaxies loaded once at startup.
//
// Lookups by id never fail loudly: an unknown id yields `None`. Arrow-key
// navigation cycles through the catalog in declaration order, wrapping
// at both ends.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::config::ConfigError;

//=== GalaxyKind ==========================================================

/// Visual archetype used by the galaxy renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalaxyKind {
    Spiral,
    Barred,
    Elliptical,
    Ring,
    Irregular,
}

//=== Galaxy ==============================================================

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Galaxy {
    pub id: String,
    pub name: String,
    pub kind: GalaxyKind,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    pub star_count: u32,
    pub density: f32,
    /// Decorative parameters passed through to the renderer untouched.
    #[serde(default)]
    pub style: serde_json::Value,
}

impl Galaxy {
    fn builtin(
        id: &str,
        name: &str,
        kind: GalaxyKind,
        position: [f32; 3],
        star_count: u32,
        density: f32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            position,
            rotation: None,
            star_count,
            density,
            style: serde_json::Value::Null,
        }
    }
}

//=== GalaxyCatalog =======================================================

/// Ordered, immutable set of galaxies with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyCatalog {
    galaxies: Vec<Galaxy>,
}

impl GalaxyCatalog {
    //--- Construction -----------------------------------------------------

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        use GalaxyKind::*;
        Self {
            galaxies: vec![
                Galaxy::builtin("g-order", "WESTERN ORDER", Barred, [-120.0, 0.0, -40.0], 18_000, 0.85),
                Galaxy::builtin("g-chaos", "EASTERN CHAOS", Irregular, [130.0, 10.0, -25.0], 14_000, 0.6),
                Galaxy::builtin("g-origin", "ORIGIN CLUSTER", Elliptical, [0.0, -20.0, -150.0], 22_000, 0.95),
                Galaxy::builtin("g-nexus", "NEXUS", Spiral, [40.0, 35.0, 90.0], 16_000, 0.75),
                Galaxy::builtin("g-void", "SILENT VOID", Ring, [-60.0, -45.0, 140.0], 9_000, 0.35),
                Galaxy::builtin("g-aurora", "AURORA DRIFT", Spiral, [170.0, 60.0, 110.0], 12_000, 0.55),
            ],
        }
    }

    /// Builds a catalog, rejecting duplicate or empty ids.
    pub fn new(galaxies: Vec<Galaxy>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for galaxy in &galaxies {
            if galaxy.id.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "catalog.id",
                    reason: format!("galaxy `{}` has an empty id", galaxy.name),
                });
            }
            if !seen.insert(galaxy.id.as_str()) {
                return Err(ConfigError::Invalid {
                    field: "catalog.id",
                    reason: format!("duplicate galaxy id `{}`", galaxy.id),
                });
            }
        }
        Ok(Self { galaxies })
    }

    /// Parses a JSON array of galaxies.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let galaxies: Vec<Galaxy> = serde_json::from_str(source)?;
        Self::new(galaxies)
    }

    //--- Lookup -----------------------------------------------------------

    pub fn find(&self, id: &str) -> Option<&Galaxy> {
        self.galaxies.iter().find(|g| g.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.galaxies.iter().position(|g| g.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Galaxy> {
        self.galaxies.iter()
    }

    pub fn len(&self) -> usize {
        self.galaxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galaxies.is_empty()
    }

    //--- Navigation -------------------------------------------------------

    /// Galaxy after `current`, wrapping. Unknown or absent `current` starts at the first.
    pub fn next_after(&self, current: Option<&str>) -> Option<&Galaxy> {
        let len = self.galaxies.len();
        if len == 0 {
            return None;
        }
        let index = match current.and_then(|id| self.position_of(id)) {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.galaxies.get(index)
    }

    /// Galaxy before `current`, wrapping. Unknown or absent `current` starts at the last.
    pub fn previous_before(&self, current: Option<&str>) -> Option<&Galaxy> {
        let len = self.galaxies.len();
        if len == 0 {
            return None;
        }
        let index = match current.and_then(|id| self.position_of(id)) {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.galaxies.get(index)
    }
}

impl Default for GalaxyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_western_order() {
        let catalog = GalaxyCatalog::builtin();
        let galaxy = catalog.find("g-order").expect("g-order in catalog");
        assert_eq!(galaxy.name, "WESTERN ORDER");
    }

    #[test]
    fn builtin_ids_are_unique() {
        let catalog = GalaxyCatalog::builtin();
        assert!(GalaxyCatalog::new(catalog.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn unknown_id_finds_nothing() {
        let catalog = GalaxyCatalog::builtin();
        assert!(catalog.find("nonexistent-id").is_none());
        assert!(!catalog.contains("nonexistent-id"));
    }

    #[test]
    fn next_wraps_to_first() {
        let catalog = GalaxyCatalog::builtin();
        let last = catalog.iter().last().map(|g| g.id.clone());
        let next = catalog.next_after(last.as_deref()).expect("non-empty");
        assert_eq!(next.id, "g-order");
    }

    #[test]
    fn previous_wraps_to_last() {
        let catalog = GalaxyCatalog::builtin();
        let previous = catalog.previous_before(Some("g-order")).expect("non-empty");
        assert_eq!(previous.id, "g-aurora");
    }

    #[test]
    fn navigation_without_current_starts_at_ends() {
        let catalog = GalaxyCatalog::builtin();
        assert_eq!(catalog.next_after(None).map(|g| g.id.as_str()), Some("g-order"));
        assert_eq!(catalog.previous_before(Some("ghost")).map(|g| g.id.as_str()), Some("g-aurora"));
    }

    #[test]
    fn empty_catalog_navigates_to_nothing() {
        let catalog = GalaxyCatalog::new(Vec::new()).expect("empty is valid");
        assert!(catalog.is_empty());
        assert!(catalog.next_after(None).is_none());
        assert!(catalog.previous_before(None).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = GalaxyCatalog::builtin();
        let mut galaxies: Vec<Galaxy> = catalog.iter().cloned().collect();
        galaxies.push(galaxies[0].clone());

        let err = GalaxyCatalog::new(galaxies).unwrap_err();
        assert!(err.to_string().contains("duplicate galaxy id `g-order`"));
    }

    #[test]
    fn parses_json_with_optional_fields() {
        let catalog = GalaxyCatalog::from_json_str(
            r#"[{
                "id": "g-test",
                "name": "TEST",
                "kind": "ring",
                "position": [1.0, 2.0, 3.0],
                "starCount": 100,
                "density": 0.5
            }]"#,
        )
        .expect("valid catalog");

        let galaxy = catalog.find("g-test").expect("parsed");
        assert_eq!(galaxy.kind, GalaxyKind::Ring);
        assert_eq!(galaxy.rotation, None);
        assert!(galaxy.style.is_null());
    }
}
