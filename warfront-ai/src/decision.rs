//! Decision records emitted by the planners.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::territory::TerritoryId;

/// What the resolver is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Reinforce,
    Attack,
    Move,
}

impl DecisionKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Reinforce => "reinforce",
            Self::Attack => "attack",
            Self::Move => "move",
        }
    }
}

/// One explainable action for the external resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    /// Origin territory; absent for reinforcements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<TerritoryId>,
    pub to: TerritoryId,
    pub armies: u32,
    pub reason: String,
    /// Ranking score, only recorded for attacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Decision {
    #[must_use]
    pub const fn reinforce(to: TerritoryId, armies: u32, reason: String) -> Self {
        Self {
            kind: DecisionKind::Reinforce,
            from: None,
            to,
            armies,
            reason,
            score: None,
        }
    }

    #[must_use]
    pub const fn attack(
        from: TerritoryId,
        to: TerritoryId,
        armies: u32,
        reason: String,
        score: f64,
    ) -> Self {
        Self {
            kind: DecisionKind::Attack,
            from: Some(from),
            to,
            armies,
            reason,
            score: Some(score),
        }
    }

    #[must_use]
    pub const fn movement(from: TerritoryId, to: TerritoryId, armies: u32, reason: String) -> Self {
        Self {
            kind: DecisionKind::Move,
            from: Some(from),
            to,
            armies,
            reason,
            score: None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(
                f,
                "{} {} -> {} x{} ({})",
                self.kind.key(),
                from,
                self.to,
                self.armies,
                self.reason
            ),
            None => write!(
                f,
                "{} {} x{} ({})",
                self.kind.key(),
                self.to,
                self.armies,
                self.reason
            ),
        }
    }
}

/// Everything one faction decided for one turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TurnPlan {
    pub reinforcements: Vec<Decision>,
    pub attacks: Vec<Decision>,
    pub moves: Vec<Decision>,
}

impl TurnPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reinforcements.is_empty() && self.attacks.is_empty() && self.moves.is_empty()
    }

    /// All decisions in resolution order: reinforcements, attacks, moves.
    pub fn decisions(&self) -> impl Iterator<Item = &Decision> {
        self.reinforcements
            .iter()
            .chain(self.attacks.iter())
            .chain(self.moves.iter())
    }

    #[must_use]
    pub fn total_reinforced(&self) -> u32 {
        self.reinforcements
            .iter()
            .fold(0u32, |acc, decision| acc.saturating_add(decision.armies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_route_and_reason() {
        let attack = Decision::attack(
            TerritoryId::new("north"),
            TerritoryId::new("south"),
            5,
            "strong advantage".to_string(),
            30.0,
        );
        assert_eq!(
            attack.to_string(),
            "attack north -> south x5 (strong advantage)"
        );

        let reinforce = Decision::reinforce(TerritoryId::new("north"), 3, "fallback".to_string());
        assert_eq!(reinforce.to_string(), "reinforce north x3 (fallback)");
    }

    #[test]
    fn serialized_kinds_are_snake_case_and_skip_empty_fields() {
        let reinforce = Decision::reinforce(TerritoryId::new("a"), 2, "r".to_string());
        let value = serde_json::to_value(&reinforce).unwrap();
        assert_eq!(value["kind"], "reinforce");
        assert!(value.get("from").is_none());
        assert!(value.get("score").is_none());
    }

    #[test]
    fn turn_plan_orders_decisions_for_resolution() {
        let plan = TurnPlan {
            reinforcements: vec![
                Decision::reinforce(TerritoryId::new("a"), 2, String::new()),
                Decision::reinforce(TerritoryId::new("b"), 3, String::new()),
            ],
            attacks: vec![Decision::attack(
                TerritoryId::new("a"),
                TerritoryId::new("c"),
                1,
                String::new(),
                1.0,
            )],
            moves: Vec::new(),
        };
        let kinds: Vec<_> = plan.decisions().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DecisionKind::Reinforce,
                DecisionKind::Reinforce,
                DecisionKind::Attack
            ]
        );
        assert_eq!(plan.total_reinforced(), 5);
        assert!(!plan.is_empty());
        assert!(TurnPlan::default().is_empty());
    }
}
