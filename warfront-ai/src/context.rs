//! Validated inputs shared by every planner call.
use thiserror::Error;

use crate::config::{EngineConfig, EngineConfigError};
use crate::personality::{Personality, PersonalityParseError, PersonalityProfile};
use crate::region::RegionCatalog;
use crate::territory::{FactionId, GraphError, TerritoryMap};

/// Errors raised when planning inputs are unusable.
#[derive(Debug, Error, PartialEq)]
pub enum PlanningError {
    #[error("faction id must not be empty")]
    EmptyFaction,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] EngineConfigError),
    #[error(transparent)]
    Personality(#[from] PersonalityParseError),
}

/// Everything a planner needs to score one faction's options.
///
/// Cheap to copy; the orchestrator re-points it at each new working
/// snapshot with [`PlanningContext::with_territories`].
#[derive(Debug, Clone, Copy)]
pub struct PlanningContext<'a> {
    pub faction: &'a FactionId,
    pub territories: &'a TerritoryMap,
    pub regions: &'a RegionCatalog,
    pub profile: PersonalityProfile,
    pub config: &'a EngineConfig,
}

impl<'a> PlanningContext<'a> {
    /// Validate inputs and build a context.
    ///
    /// A faction that owns nothing is valid; it simply plans nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError`] for an empty faction id, regions that do not
    /// match the snapshot, or an invalid configuration.
    pub fn new(
        faction: &'a FactionId,
        territories: &'a TerritoryMap,
        regions: &'a RegionCatalog,
        personality: Personality,
        config: &'a EngineConfig,
    ) -> Result<Self, PlanningError> {
        if faction.is_empty() {
            return Err(PlanningError::EmptyFaction);
        }
        regions.validate(territories)?;
        config.validate()?;
        Ok(Self {
            faction,
            territories,
            regions,
            profile: personality.profile(),
            config,
        })
    }

    /// Build a context from a personality name; `None` means balanced.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::Personality`] for an unknown name, and
    /// otherwise the same errors as [`PlanningContext::new`].
    pub fn from_personality_name(
        faction: &'a FactionId,
        territories: &'a TerritoryMap,
        regions: &'a RegionCatalog,
        personality: Option<&str>,
        config: &'a EngineConfig,
    ) -> Result<Self, PlanningError> {
        let personality = Personality::resolve(personality)?;
        Self::new(faction, territories, regions, personality, config)
    }

    /// Same faction, personality, and config over another snapshot.
    #[must_use]
    pub fn with_territories<'b>(&self, territories: &'b TerritoryMap) -> PlanningContext<'b>
    where
        'a: 'b,
    {
        PlanningContext {
            faction: self.faction,
            territories,
            regions: self.regions,
            profile: self.profile,
            config: self.config,
        }
    }
}
