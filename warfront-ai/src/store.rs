//! In-memory territory store and its JSON map document.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::TerritoryStore;
use crate::region::RegionCatalog;
use crate::territory::{FactionId, GraphError, TerritoryId, TerritoryMap};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("map document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// On-disk shape of a map: territories plus regions keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub territories: TerritoryMap,
    #[serde(default)]
    pub regions: BTreeMap<String, Vec<TerritoryId>>,
}

/// Authoritative territory state held in memory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryStore {
    territories: TerritoryMap,
    regions: RegionCatalog,
}

impl MemoryStore {
    /// Pair a snapshot with its regions.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when a region names territory the map lacks.
    pub fn new(territories: TerritoryMap, regions: RegionCatalog) -> Result<Self, GraphError> {
        regions.validate(&territories)?;
        Ok(Self {
            territories,
            regions,
        })
    }

    /// Load a store from a [`MapDocument`] in JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] for malformed JSON or graph data rejected
    /// during deserialization, and [`StoreError::Graph`] for bad regions.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let doc: MapDocument = serde_json::from_str(json)?;
        Ok(Self::new(doc.territories, RegionCatalog::from(doc.regions))?)
    }

    /// Serialize back into the map document format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let doc = MapDocument {
            territories: self.territories.clone(),
            regions: self
                .regions
                .iter()
                .map(|region| (region.name.clone(), region.territories.clone()))
                .collect(),
        };
        serde_json::to_string_pretty(&doc)
    }

    /// Borrow the current state without cloning.
    #[must_use]
    pub const fn snapshot(&self) -> &TerritoryMap {
        &self.territories
    }

    #[must_use]
    pub const fn region_catalog(&self) -> &RegionCatalog {
        &self.regions
    }
}

impl TerritoryStore for MemoryStore {
    type Error = GraphError;

    fn territories(&self) -> Result<TerritoryMap, Self::Error> {
        Ok(self.territories.clone())
    }

    fn regions(&self) -> Result<RegionCatalog, Self::Error> {
        Ok(self.regions.clone())
    }

    fn apply_control_change(
        &mut self,
        id: &TerritoryId,
        controller: Option<FactionId>,
        garrison: u32,
    ) -> Result<(), Self::Error> {
        self.territories.set_control(id, controller, garrison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "territories": [
            {"id": "north", "controller": "red", "neighbors": ["south"], "garrison": 4},
            {"id": "south", "controller": "blue", "neighbors": ["north"], "garrison": 2,
             "strategic_value": 1.5}
        ],
        "regions": {"Peninsula": ["north", "south"]}
    }"#;

    #[test]
    fn loads_document_and_round_trips_control_changes() {
        let mut store = MemoryStore::from_json(DOC).unwrap();
        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(store.region_catalog().len(), 1);

        let south = TerritoryId::new("south");
        store
            .apply_control_change(&south, Some(FactionId::new("red")), 3)
            .unwrap();
        let map = store.territories().unwrap();
        let territory = map.get(&south).unwrap();
        assert!(territory.is_controlled_by(&FactionId::new("red")));
        assert_eq!(territory.garrison, 3);

        let reloaded = MemoryStore::from_json(&store.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn rejects_dangling_neighbors_and_unknown_region_members() {
        let dangling = r#"{"territories": [{"id": "a", "neighbors": ["ghost"]}]}"#;
        assert!(matches!(
            MemoryStore::from_json(dangling),
            Err(StoreError::Parse(_))
        ));

        let stray = r#"{"territories": [{"id": "a"}], "regions": {"Lost": ["b"]}}"#;
        assert!(matches!(
            MemoryStore::from_json(stray),
            Err(StoreError::Graph(GraphError::UnknownRegionMember { .. }))
        ));
    }

    #[test]
    fn control_change_on_unknown_territory_fails() {
        let mut store = MemoryStore::from_json(DOC).unwrap();
        let err = store
            .apply_control_change(&TerritoryId::new("atlantis"), None, 0)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownTerritory {
                id: TerritoryId::new("atlantis")
            }
        );
    }
}
