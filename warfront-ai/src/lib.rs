//! Warfront AI
//!
//! Turn planning for computer-controlled factions in a territory-conquest
//! war game. The crate scores attacks, routes reserves toward the front, and
//! spreads reinforcement budgets, producing a small list of explainable
//! [`Decision`]s that an external resolver applies to the authoritative map.

pub mod attack;
pub mod config;
pub mod consolidation;
pub mod constants;
pub mod context;
pub mod decision;
pub mod numbers;
pub mod personality;
pub mod reinforcement;
pub mod region;
pub mod seed;
pub mod store;
pub mod territory;
pub mod turn;

// Re-export commonly used types
pub use attack::{
    AttackAssessment, ForceTier, committed_armies, find_best_attack, find_next_attack,
    score_attack,
};
pub use config::{
    AttackConfig, ConsolidationConfig, EngineConfig, EngineConfigError, ReinforcementConfig,
    TurnConfig,
};
pub use consolidation::{OwnedSearch, border_territories, find_best_move, interior_territories};
pub use context::{PlanningContext, PlanningError};
pub use decision::{Decision, DecisionKind, TurnPlan};
pub use personality::{Personality, PersonalityParseError, PersonalityProfile};
pub use region::{Region, RegionCatalog};
pub use reinforcement::{
    PriorityTier, ReinforcementTarget, place_reinforcements, reinforcement_priorities,
    threat_level,
};
pub use seed::{planning_rng, turn_seed};
pub use store::{MapDocument, MemoryStore, StoreError};
pub use territory::{FactionId, GraphError, NeighborSet, Territory, TerritoryId, TerritoryMap};
pub use turn::make_ai_turn;

/// Source of authoritative territory state.
///
/// The engine only reads snapshots; control changes are applied by whatever
/// resolves the returned decisions.
pub trait TerritoryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Current snapshot of every territory.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    fn territories(&self) -> Result<TerritoryMap, Self::Error>;

    /// Region definitions for the current map.
    ///
    /// # Errors
    ///
    /// Returns an error if the regions cannot be read.
    fn regions(&self) -> Result<RegionCatalog, Self::Error>;

    /// Record a resolved change of controller and garrison.
    ///
    /// # Errors
    ///
    /// Returns an error if the territory is unknown or the change is rejected.
    fn apply_control_change(
        &mut self,
        id: &TerritoryId,
        controller: Option<FactionId>,
        garrison: u32,
    ) -> Result<(), Self::Error>;
}

/// Planner facade over a territory store.
pub struct ConquestEngine<S>
where
    S: TerritoryStore,
{
    store: S,
    config: EngineConfig,
}

impl<S> ConquestEngine<S>
where
    S: TerritoryStore,
{
    /// Create an engine over `store` with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(store: S, config: EngineConfig) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plan one turn for `faction` against a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot produce a snapshot or the
    /// planning inputs are invalid.
    pub fn plan_turn(
        &self,
        faction: &FactionId,
        personality: Personality,
        reinforcements: u32,
        seed: u64,
    ) -> Result<TurnPlan, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let territories = self.store.territories().map_err(Into::into)?;
        let regions = self.store.regions().map_err(Into::into)?;
        let ctx = PlanningContext::new(faction, &territories, &regions, personality, &self.config)?;
        let mut rng = planning_rng(seed);
        Ok(make_ai_turn(&ctx, reinforcements, &mut rng))
    }
}
