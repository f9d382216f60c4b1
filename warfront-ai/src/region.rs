//! Named territory groupings whose full ownership earns a bonus.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::territory::{FactionId, GraphError, TerritoryId, TerritoryMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub territories: Vec<TerritoryId>,
}

impl Region {
    #[must_use]
    pub fn new(name: &str, territories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            territories: territories.iter().map(|id| TerritoryId::new(id)).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: &TerritoryId) -> bool {
        self.territories.contains(id)
    }

    /// Members not held by `faction`, in region order.
    pub fn missing_for<'a>(
        &'a self,
        faction: &'a FactionId,
        map: &'a TerritoryMap,
    ) -> impl Iterator<Item = &'a TerritoryId> {
        self.territories.iter().filter(move |id| {
            !map.get(id)
                .is_some_and(|territory| territory.is_controlled_by(faction))
        })
    }

    #[must_use]
    pub fn is_controlled_by(&self, faction: &FactionId, map: &TerritoryMap) -> bool {
        self.missing_for(faction, map).next().is_none()
    }

    /// The single member `faction` still lacks, if exactly one is missing.
    #[must_use]
    pub fn sole_missing<'a>(
        &'a self,
        faction: &'a FactionId,
        map: &'a TerritoryMap,
    ) -> Option<&'a TerritoryId> {
        let mut missing = self.missing_for(faction, map);
        let first = missing.next()?;
        missing.next().is_none().then_some(first)
    }
}

/// Ordered, static region data for one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RegionCatalog(pub Vec<Region>);

impl RegionCatalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load regions from a JSON object keyed by region name.
    ///
    /// Regions come back ordered by name so the catalog order is stable
    /// regardless of how the document was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into region data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: BTreeMap<String, Vec<TerritoryId>> = serde_json::from_str(json)?;
        Ok(Self::from(map))
    }

    /// Check every region against a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] for empty or duplicate regions and for members
    /// the snapshot does not know.
    pub fn validate(&self, map: &TerritoryMap) -> Result<(), GraphError> {
        let mut names = BTreeSet::new();
        for region in &self.0 {
            if !names.insert(region.name.as_str()) {
                return Err(GraphError::DuplicateRegion {
                    region: region.name.clone(),
                });
            }
            if region.territories.is_empty() {
                return Err(GraphError::EmptyRegion {
                    region: region.name.clone(),
                });
            }
            if let Some(unknown) = region.territories.iter().find(|id| !map.contains(id)) {
                return Err(GraphError::UnknownRegionMember {
                    region: region.name.clone(),
                    territory: unknown.clone(),
                });
            }
        }
        Ok(())
    }

    /// Regions containing `id`, in catalog order.
    pub fn containing<'a>(&'a self, id: &'a TerritoryId) -> impl Iterator<Item = &'a Region> {
        self.0.iter().filter(move |region| region.contains(id))
    }

    /// Regions that capturing `target` would complete for `faction`.
    pub fn completed_by_capture<'a>(
        &'a self,
        faction: &'a FactionId,
        target: &'a TerritoryId,
        map: &'a TerritoryMap,
    ) -> impl Iterator<Item = &'a Region> {
        self.containing(target)
            .filter(move |region| region.sole_missing(faction, map) == Some(target))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<TerritoryId>>> for RegionCatalog {
    fn from(named: BTreeMap<String, Vec<TerritoryId>>) -> Self {
        Self(
            named
                .into_iter()
                .map(|(name, territories)| Region { name, territories })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a RegionCatalog {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::territory::Territory;

    fn map() -> TerritoryMap {
        TerritoryMap::new(vec![
            Territory::new("a").with_controller("red").with_neighbors(&["b"]),
            Territory::new("b")
                .with_controller("red")
                .with_neighbors(&["a", "c"]),
            Territory::new("c")
                .with_controller("blue")
                .with_neighbors(&["b"]),
        ])
        .unwrap()
    }

    #[test]
    fn from_json_orders_by_name() {
        let catalog = RegionCatalog::from_json(
            r#"{ "Western Hemisphere": ["a", "b"], "Eastern Bloc": ["c"] }"#,
        )
        .unwrap();
        let names: Vec<_> = catalog.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Eastern Bloc", "Western Hemisphere"]);
    }

    #[test]
    fn completion_queries_track_single_missing_member() {
        let map = map();
        let red = FactionId::new("red");
        let region = Region::new("Spine", &["a", "b", "c"]);
        assert!(!region.is_controlled_by(&red, &map));
        assert_eq!(region.sole_missing(&red, &map), Some(&TerritoryId::new("c")));

        let blue = FactionId::new("blue");
        assert_eq!(region.sole_missing(&blue, &map), None);

        let catalog = RegionCatalog(vec![region, Region::new("Pair", &["a", "b"])]);
        let target = TerritoryId::new("c");
        let completed: Vec<_> = catalog
            .completed_by_capture(&red, &target, &map)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(completed, vec!["Spine"]);
        assert!(catalog.0[1].is_controlled_by(&red, &map));
    }

    #[test]
    fn validate_rejects_bad_regions() {
        let map = map();
        let unknown = RegionCatalog(vec![Region::new("Lost", &["a", "zz"])]);
        assert!(matches!(
            unknown.validate(&map),
            Err(GraphError::UnknownRegionMember { .. })
        ));

        let empty = RegionCatalog(vec![Region::new("Void", &[])]);
        assert!(matches!(
            empty.validate(&map),
            Err(GraphError::EmptyRegion { .. })
        ));

        let dup = RegionCatalog(vec![Region::new("X", &["a"]), Region::new("X", &["b"])]);
        assert!(matches!(
            dup.validate(&map),
            Err(GraphError::DuplicateRegion { .. })
        ));

        assert!(RegionCatalog::empty().validate(&map).is_ok());
    }
}
