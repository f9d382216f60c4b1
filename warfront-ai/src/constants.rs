//! Centralized balance and tuning constants for Warfront planning.
//!
//! These are the defaults behind [`crate::config::EngineConfig`].

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_ATTACK_CANDIDATE: &str = "log.attack.candidate";
pub(crate) const LOG_ATTACK_SELECTED: &str = "log.attack.selected";
pub(crate) const LOG_MOVE_SELECTED: &str = "log.move.selected";
pub(crate) const LOG_REINFORCE_PLAN: &str = "log.reinforce.plan";
pub(crate) const LOG_TURN_SUMMARY: &str = "log.turn.summary";

// Attack tuning ------------------------------------------------------------
pub(crate) const ATTACK_OVERWHELMING_RATIO: f64 = 3.0;
pub(crate) const ATTACK_STRONG_RATIO: f64 = 2.0;
pub(crate) const ATTACK_SLIGHT_RATIO: f64 = 1.5;
pub(crate) const ATTACK_OVERWHELMING_BONUS: f64 = 40.0;
pub(crate) const ATTACK_STRONG_BONUS: f64 = 25.0;
pub(crate) const ATTACK_SLIGHT_BONUS: f64 = 10.0;
pub(crate) const ATTACK_RISK_PENALTY_BASE: f64 = 20.0;
pub(crate) const ATTACK_STRATEGIC_WEIGHT: f64 = 10.0;
pub(crate) const ATTACK_PRODUCTION_WEIGHT: f64 = 6.0;
pub(crate) const ATTACK_REGION_COMPLETION_BONUS: f64 = 50.0;
pub(crate) const ATTACK_UNCONTROLLED_BONUS: f64 = 15.0;
pub(crate) const ATTACK_CONFLICT_RISK_PIVOT: f64 = 2.5;
pub(crate) const ATTACK_COMMIT_FRACTION: f64 = 0.6;

// Garrison floors ----------------------------------------------------------
/// Armies that must stay behind at any origin.
pub(crate) const GARRISON_RESERVE: u32 = 1;
pub(crate) const INTERIOR_SURPLUS_THRESHOLD: u32 = 2;

// Reinforcement tuning -----------------------------------------------------
pub(crate) const REINFORCE_BATCH_SIZE: u32 = 5;
pub(crate) const REINFORCE_THREAT_THRESHOLD: u32 = 2;
pub(crate) const REINFORCE_CONTESTED_WEIGHT: u32 = 2;
pub(crate) const REINFORCE_STRATEGIC_CUTOFF: f64 = 2.0;

// Turn caps ----------------------------------------------------------------
pub(crate) const TURN_MAX_ATTACKS: usize = 3;
pub(crate) const TURN_MAX_MOVES: usize = 2;
