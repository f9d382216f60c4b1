//! Territory graph primitives and the validated snapshot the planners read.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::constants::GARRISON_RESERVE;
use crate::decision::{Decision, DecisionKind};

/// Identifier of a single territory node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryId(pub String);

impl TerritoryId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TerritoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of a faction that can control territories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub String);

impl FactionId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FactionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Adjacency list stored inline for typical map degrees.
pub type NeighborSet = SmallVec<[TerritoryId; 6]>;

/// A node in the conquest graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    /// Absent when no faction holds the territory.
    #[serde(default)]
    pub controller: Option<FactionId>,
    #[serde(default)]
    pub neighbors: NeighborSet,
    #[serde(default)]
    pub garrison: u32,
    #[serde(default)]
    pub strategic_value: f64,
    #[serde(default)]
    pub production_bonus: f64,
    /// Volatility of holding the territory; only matters for thin attacks.
    #[serde(default)]
    pub conflict_risk: f64,
    /// Factions with an active claim on this territory.
    #[serde(default)]
    pub contested_by: BTreeSet<FactionId>,
}

impl Territory {
    /// Uncontrolled, empty territory with no neighbors.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: TerritoryId::new(id),
            controller: None,
            neighbors: NeighborSet::new(),
            garrison: 0,
            strategic_value: 0.0,
            production_bonus: 0.0,
            conflict_risk: 0.0,
            contested_by: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_controller(mut self, faction: &str) -> Self {
        self.controller = Some(FactionId::new(faction));
        self
    }

    #[must_use]
    pub fn with_neighbors(mut self, neighbors: &[&str]) -> Self {
        self.neighbors = neighbors.iter().map(|id| TerritoryId::new(id)).collect();
        self
    }

    #[must_use]
    pub const fn with_garrison(mut self, garrison: u32) -> Self {
        self.garrison = garrison;
        self
    }

    #[must_use]
    pub const fn with_strategic_value(mut self, value: f64) -> Self {
        self.strategic_value = value;
        self
    }

    #[must_use]
    pub const fn with_production_bonus(mut self, value: f64) -> Self {
        self.production_bonus = value;
        self
    }

    #[must_use]
    pub const fn with_conflict_risk(mut self, value: f64) -> Self {
        self.conflict_risk = value;
        self
    }

    #[must_use]
    pub fn contested_by(mut self, faction: &str) -> Self {
        self.contested_by.insert(FactionId::new(faction));
        self
    }

    #[must_use]
    pub fn is_controlled_by(&self, faction: &FactionId) -> bool {
        self.controller.as_ref() == Some(faction)
    }

    /// Controlled by some faction other than `faction`.
    #[must_use]
    pub fn is_enemy_of(&self, faction: &FactionId) -> bool {
        matches!(&self.controller, Some(owner) if owner != faction)
    }

    #[must_use]
    pub const fn is_uncontrolled(&self) -> bool {
        self.controller.is_none()
    }

    /// Armies that may leave without breaching the reserve floor.
    #[must_use]
    pub const fn available_armies(&self) -> u32 {
        self.garrison.saturating_sub(GARRISON_RESERVE)
    }

    fn validate_weights(&self) -> Result<(), GraphError> {
        for (field, value) in [
            ("strategic_value", self.strategic_value),
            ("production_bonus", self.production_bonus),
            ("conflict_risk", self.conflict_risk),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::InvalidWeight {
                    territory: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Errors raised when territory or region data is malformed.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("territory id must not be empty")]
    EmptyTerritoryId,
    #[error("territory {id} is defined more than once")]
    DuplicateTerritory { id: TerritoryId },
    #[error("territory {territory} lists unknown neighbor {neighbor}")]
    DanglingNeighbor {
        territory: TerritoryId,
        neighbor: TerritoryId,
    },
    #[error("territory {territory} lists itself as a neighbor")]
    SelfAdjacent { territory: TerritoryId },
    #[error("territory {territory} has invalid {field} {value}")]
    InvalidWeight {
        territory: TerritoryId,
        field: &'static str,
        value: f64,
    },
    #[error("territory {territory} references an empty faction id")]
    EmptyFactionId { territory: TerritoryId },
    #[error("unknown territory {id}")]
    UnknownTerritory { id: TerritoryId },
    #[error("region {region} lists unknown territory {territory}")]
    UnknownRegionMember {
        region: String,
        territory: TerritoryId,
    },
    #[error("region {region} has no territories")]
    EmptyRegion { region: String },
    #[error("region {region} is defined more than once")]
    DuplicateRegion { region: String },
}

/// Validated, ordered snapshot of every territory.
///
/// Iteration is by ascending territory id, which doubles as the stable
/// default order for every planner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Territory>", into = "Vec<Territory>")]
pub struct TerritoryMap {
    territories: BTreeMap<TerritoryId, Territory>,
}

impl TerritoryMap {
    /// Build a snapshot, rejecting malformed graphs.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] for empty or duplicate ids, dangling or
    /// self-referencing neighbor entries, empty faction ids, and negative or
    /// non-finite weights.
    pub fn new<I>(territories: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Territory>,
    {
        let mut map = BTreeMap::new();
        for mut territory in territories {
            if territory.id.is_empty() {
                return Err(GraphError::EmptyTerritoryId);
            }
            territory.validate_weights()?;
            let empty_faction = territory
                .controller
                .iter()
                .chain(territory.contested_by.iter())
                .any(FactionId::is_empty);
            if empty_faction {
                return Err(GraphError::EmptyFactionId {
                    territory: territory.id.clone(),
                });
            }
            let mut seen = BTreeSet::new();
            territory.neighbors.retain(|id| seen.insert(id.clone()));
            if map.contains_key(&territory.id) {
                return Err(GraphError::DuplicateTerritory {
                    id: territory.id.clone(),
                });
            }
            map.insert(territory.id.clone(), territory);
        }

        for territory in map.values() {
            for neighbor in &territory.neighbors {
                if neighbor == &territory.id {
                    return Err(GraphError::SelfAdjacent {
                        territory: territory.id.clone(),
                    });
                }
                if !map.contains_key(neighbor) {
                    return Err(GraphError::DanglingNeighbor {
                        territory: territory.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }
        }

        Ok(Self { territories: map })
    }

    #[must_use]
    pub fn get(&self, id: &TerritoryId) -> Option<&Territory> {
        self.territories.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &TerritoryId) -> bool {
        self.territories.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Territories held by `faction`, ascending by id.
    pub fn owned_by<'a>(&'a self, faction: &'a FactionId) -> impl Iterator<Item = &'a Territory> {
        self.territories
            .values()
            .filter(move |territory| territory.is_controlled_by(faction))
    }

    #[must_use]
    pub fn owns_any(&self, faction: &FactionId) -> bool {
        self.owned_by(faction).next().is_some()
    }

    /// Resolved neighbors of `territory`, in adjacency-list order.
    pub fn neighbors_of<'a>(
        &'a self,
        territory: &'a Territory,
    ) -> impl Iterator<Item = &'a Territory> {
        territory
            .neighbors
            .iter()
            .filter_map(|id| self.territories.get(id))
    }

    /// Whether any neighbor is held by a faction other than `faction`.
    #[must_use]
    pub fn has_enemy_neighbor(&self, territory: &Territory, faction: &FactionId) -> bool {
        self.neighbors_of(territory)
            .any(|neighbor| neighbor.is_enemy_of(faction))
    }

    /// Every faction currently holding at least one territory.
    #[must_use]
    pub fn factions(&self) -> BTreeSet<FactionId> {
        self.territories
            .values()
            .filter_map(|territory| territory.controller.clone())
            .collect()
    }

    /// Overwrite controller and garrison of one territory.
    ///
    /// Intended for store implementations applying resolved outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTerritory`] when `id` is not in the map and
    /// [`GraphError::EmptyFactionId`] for an empty controller id.
    pub fn set_control(
        &mut self,
        id: &TerritoryId,
        controller: Option<FactionId>,
        garrison: u32,
    ) -> Result<(), GraphError> {
        if controller.as_ref().is_some_and(FactionId::is_empty) {
            return Err(GraphError::EmptyFactionId {
                territory: id.clone(),
            });
        }
        let territory = self
            .territories
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownTerritory { id: id.clone() })?;
        territory.controller = controller;
        territory.garrison = garrison;
        Ok(())
    }

    /// New snapshot reflecting the garrison shifts a decision implies.
    ///
    /// Attacks only withdraw the committed armies from the origin; the
    /// outcome of the fight is left to the resolver.
    #[must_use]
    pub fn with_decision(&self, decision: &Decision) -> Self {
        let mut next = self.clone();
        match decision.kind {
            DecisionKind::Reinforce => {
                next.add_armies(&decision.to, decision.armies);
            }
            DecisionKind::Attack => {
                if let Some(from) = &decision.from {
                    next.remove_armies(from, decision.armies);
                }
            }
            DecisionKind::Move => {
                if let Some(from) = &decision.from {
                    next.remove_armies(from, decision.armies);
                }
                next.add_armies(&decision.to, decision.armies);
            }
        }
        next
    }

    fn add_armies(&mut self, id: &TerritoryId, armies: u32) {
        if let Some(territory) = self.territories.get_mut(id) {
            territory.garrison = territory.garrison.saturating_add(armies);
        }
    }

    fn remove_armies(&mut self, id: &TerritoryId, armies: u32) {
        if let Some(territory) = self.territories.get_mut(id) {
            territory.garrison = territory.garrison.saturating_sub(armies);
        }
    }
}

impl TryFrom<Vec<Territory>> for TerritoryMap {
    type Error = GraphError;

    fn try_from(value: Vec<Territory>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TerritoryMap> for Vec<Territory> {
    fn from(value: TerritoryMap) -> Self {
        value.territories.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a TerritoryMap {
    type Item = &'a Territory;
    type IntoIter = std::collections::btree_map::Values<'a, TerritoryId, Territory>;

    fn into_iter(self) -> Self::IntoIter {
        self.territories.values()
    }
}
