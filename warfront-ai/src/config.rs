//! Tunable planner configuration.
//!
//! Every field falls back to the defaults in [`crate::constants`], so a
//! partial JSON document only needs to name the values it overrides.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum EngineConfigError {
    #[error(
        "attack tiers must descend: overwhelming {overwhelming:.2} > strong {strong:.2} > slight {slight:.2}"
    )]
    TierOrder {
        overwhelming: f64,
        strong: f64,
        slight: f64,
    },
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be positive")]
    ZeroCount { field: &'static str },
    #[error("configuration is not valid JSON: {0}")]
    Parse(String),
}

/// Attack scoring weights and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackConfig {
    #[serde(default = "AttackConfig::default_overwhelming_ratio")]
    pub overwhelming_ratio: f64,
    #[serde(default = "AttackConfig::default_strong_ratio")]
    pub strong_ratio: f64,
    #[serde(default = "AttackConfig::default_slight_ratio")]
    pub slight_ratio: f64,
    #[serde(default = "AttackConfig::default_overwhelming_bonus")]
    pub overwhelming_bonus: f64,
    #[serde(default = "AttackConfig::default_strong_bonus")]
    pub strong_bonus: f64,
    #[serde(default = "AttackConfig::default_slight_bonus")]
    pub slight_bonus: f64,
    #[serde(default = "AttackConfig::default_risk_penalty_base")]
    pub risk_penalty_base: f64,
    #[serde(default = "AttackConfig::default_strategic_weight")]
    pub strategic_weight: f64,
    #[serde(default = "AttackConfig::default_production_weight")]
    pub production_weight: f64,
    #[serde(default = "AttackConfig::default_region_completion_bonus")]
    pub region_completion_bonus: f64,
    #[serde(default = "AttackConfig::default_uncontrolled_bonus")]
    pub uncontrolled_bonus: f64,
    /// Power ratio above which conflict risk stops mattering.
    #[serde(default = "AttackConfig::default_conflict_risk_pivot")]
    pub conflict_risk_pivot: f64,
    /// Share of available armies committed to the chosen attack.
    #[serde(default = "AttackConfig::default_commit_fraction")]
    pub commit_fraction: f64,
}

impl AttackConfig {
    const fn default_overwhelming_ratio() -> f64 {
        constants::ATTACK_OVERWHELMING_RATIO
    }

    const fn default_strong_ratio() -> f64 {
        constants::ATTACK_STRONG_RATIO
    }

    const fn default_slight_ratio() -> f64 {
        constants::ATTACK_SLIGHT_RATIO
    }

    const fn default_overwhelming_bonus() -> f64 {
        constants::ATTACK_OVERWHELMING_BONUS
    }

    const fn default_strong_bonus() -> f64 {
        constants::ATTACK_STRONG_BONUS
    }

    const fn default_slight_bonus() -> f64 {
        constants::ATTACK_SLIGHT_BONUS
    }

    const fn default_risk_penalty_base() -> f64 {
        constants::ATTACK_RISK_PENALTY_BASE
    }

    const fn default_strategic_weight() -> f64 {
        constants::ATTACK_STRATEGIC_WEIGHT
    }

    const fn default_production_weight() -> f64 {
        constants::ATTACK_PRODUCTION_WEIGHT
    }

    const fn default_region_completion_bonus() -> f64 {
        constants::ATTACK_REGION_COMPLETION_BONUS
    }

    const fn default_uncontrolled_bonus() -> f64 {
        constants::ATTACK_UNCONTROLLED_BONUS
    }

    const fn default_conflict_risk_pivot() -> f64 {
        constants::ATTACK_CONFLICT_RISK_PIVOT
    }

    const fn default_commit_fraction() -> f64 {
        constants::ATTACK_COMMIT_FRACTION
    }

    fn validate(&self) -> Result<(), EngineConfigError> {
        if !(self.overwhelming_ratio > self.strong_ratio && self.strong_ratio > self.slight_ratio)
        {
            return Err(EngineConfigError::TierOrder {
                overwhelming: self.overwhelming_ratio,
                strong: self.strong_ratio,
                slight: self.slight_ratio,
            });
        }
        for (field, value) in [
            ("attack.slight_ratio", self.slight_ratio),
            ("attack.overwhelming_bonus", self.overwhelming_bonus),
            ("attack.strong_bonus", self.strong_bonus),
            ("attack.slight_bonus", self.slight_bonus),
            ("attack.risk_penalty_base", self.risk_penalty_base),
            ("attack.strategic_weight", self.strategic_weight),
            ("attack.production_weight", self.production_weight),
            ("attack.region_completion_bonus", self.region_completion_bonus),
            ("attack.uncontrolled_bonus", self.uncontrolled_bonus),
            ("attack.conflict_risk_pivot", self.conflict_risk_pivot),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineConfigError::MinViolation {
                    field,
                    min: 0.0,
                    value,
                });
            }
        }
        if !(self.commit_fraction > 0.0 && self.commit_fraction <= 1.0) {
            return Err(EngineConfigError::RangeViolation {
                field: "attack.commit_fraction",
                min: 0.0,
                max: 1.0,
                value: self.commit_fraction,
            });
        }
        Ok(())
    }
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            overwhelming_ratio: Self::default_overwhelming_ratio(),
            strong_ratio: Self::default_strong_ratio(),
            slight_ratio: Self::default_slight_ratio(),
            overwhelming_bonus: Self::default_overwhelming_bonus(),
            strong_bonus: Self::default_strong_bonus(),
            slight_bonus: Self::default_slight_bonus(),
            risk_penalty_base: Self::default_risk_penalty_base(),
            strategic_weight: Self::default_strategic_weight(),
            production_weight: Self::default_production_weight(),
            region_completion_bonus: Self::default_region_completion_bonus(),
            uncontrolled_bonus: Self::default_uncontrolled_bonus(),
            conflict_risk_pivot: Self::default_conflict_risk_pivot(),
            commit_fraction: Self::default_commit_fraction(),
        }
    }
}

/// Interior-to-border consolidation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationConfig {
    /// Interior territories need strictly more armies than this to move.
    #[serde(default = "ConsolidationConfig::default_interior_threshold")]
    pub interior_threshold: u32,
}

impl ConsolidationConfig {
    const fn default_interior_threshold() -> u32 {
        constants::INTERIOR_SURPLUS_THRESHOLD
    }
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            interior_threshold: Self::default_interior_threshold(),
        }
    }
}

/// Reinforcement priority and batching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementConfig {
    #[serde(default = "ReinforcementConfig::default_batch_size")]
    pub batch_size: u32,
    #[serde(default = "ReinforcementConfig::default_threat_threshold")]
    pub threat_threshold: u32,
    /// Threat added per rival faction contesting a territory.
    #[serde(default = "ReinforcementConfig::default_contested_weight")]
    pub contested_weight: u32,
    #[serde(default = "ReinforcementConfig::default_strategic_cutoff")]
    pub strategic_cutoff: f64,
}

impl ReinforcementConfig {
    const fn default_batch_size() -> u32 {
        constants::REINFORCE_BATCH_SIZE
    }

    const fn default_threat_threshold() -> u32 {
        constants::REINFORCE_THREAT_THRESHOLD
    }

    const fn default_contested_weight() -> u32 {
        constants::REINFORCE_CONTESTED_WEIGHT
    }

    const fn default_strategic_cutoff() -> f64 {
        constants::REINFORCE_STRATEGIC_CUTOFF
    }
}

impl Default for ReinforcementConfig {
    fn default() -> Self {
        Self {
            batch_size: Self::default_batch_size(),
            threat_threshold: Self::default_threat_threshold(),
            contested_weight: Self::default_contested_weight(),
            strategic_cutoff: Self::default_strategic_cutoff(),
        }
    }
}

/// Per-turn action caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnConfig {
    #[serde(default = "TurnConfig::default_max_attacks")]
    pub max_attacks: usize,
    #[serde(default = "TurnConfig::default_max_moves")]
    pub max_moves: usize,
}

impl TurnConfig {
    const fn default_max_attacks() -> usize {
        constants::TURN_MAX_ATTACKS
    }

    const fn default_max_moves() -> usize {
        constants::TURN_MAX_MOVES
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            max_attacks: Self::default_max_attacks(),
            max_moves: Self::default_max_moves(),
        }
    }
}

/// Complete planner configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub attack: AttackConfig,
    #[serde(default)]
    pub consolidation: ConsolidationConfig,
    #[serde(default)]
    pub reinforcement: ReinforcementConfig,
    #[serde(default)]
    pub turn: TurnConfig,
}

impl EngineConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineConfigError::Parse`] for malformed JSON and the matching
    /// validation error when a value breaks an invariant.
    pub fn from_json(json: &str) -> Result<Self, EngineConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| EngineConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section's invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        self.attack.validate()?;
        if self.consolidation.interior_threshold < 1 {
            return Err(EngineConfigError::MinViolation {
                field: "consolidation.interior_threshold",
                min: 1.0,
                value: f64::from(self.consolidation.interior_threshold),
            });
        }
        if self.reinforcement.batch_size == 0 {
            return Err(EngineConfigError::ZeroCount {
                field: "reinforcement.batch_size",
            });
        }
        let cutoff = self.reinforcement.strategic_cutoff;
        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(EngineConfigError::MinViolation {
                field: "reinforcement.strategic_cutoff",
                min: 0.0,
                value: cutoff,
            });
        }
        Ok(())
    }
}
