//! Reinforcement allocation across owned territories.
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::LOG_REINFORCE_PLAN;
use crate::context::PlanningContext;
use crate::decision::Decision;
use crate::numbers::usize_to_u32;
use crate::territory::{Territory, TerritoryId};

/// Why a territory earned its place in the reinforcement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    RegionCompletion,
    ThreatenedBorder,
    StrategicValue,
    Fallback,
}

impl PriorityTier {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RegionCompletion => "region_completion",
            Self::ThreatenedBorder => "threatened_border",
            Self::StrategicValue => "strategic_value",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementTarget {
    pub id: TerritoryId,
    pub tier: PriorityTier,
    pub reason: String,
}

/// Pressure on an owned territory from hostile neighbors and rival claims.
#[must_use]
pub fn threat_level(ctx: &PlanningContext<'_>, territory: &Territory) -> u32 {
    let faction = ctx.faction;
    let border = ctx
        .territories
        .neighbors_of(territory)
        .filter(|neighbor| neighbor.is_enemy_of(faction))
        .map(|enemy| enemy.garrison.saturating_sub(territory.garrison))
        .max()
        .unwrap_or(0);
    let rivals = territory
        .contested_by
        .iter()
        .filter(|claimant| *claimant != faction)
        .count();
    let claims = usize_to_u32(rivals).saturating_mul(ctx.config.reinforcement.contested_weight);
    border.saturating_add(claims)
}

/// Owned territories in reinforcement order, each listed once at its best tier.
#[must_use]
pub fn reinforcement_priorities(ctx: &PlanningContext<'_>) -> Vec<ReinforcementTarget> {
    let map = ctx.territories;
    let faction = ctx.faction;
    let cfg = &ctx.config.reinforcement;

    let mut seen: BTreeSet<&TerritoryId> = BTreeSet::new();
    let mut ordered = Vec::new();

    for region in ctx.regions {
        let Some(missing) = region.sole_missing(faction, map) else {
            continue;
        };
        for territory in map.owned_by(faction) {
            if territory.neighbors.contains(missing) && seen.insert(&territory.id) {
                ordered.push(ReinforcementTarget {
                    id: territory.id.clone(),
                    tier: PriorityTier::RegionCompletion,
                    reason: format!("stage to complete {} via {missing}", region.name),
                });
            }
        }
    }

    let mut threatened: Vec<(u32, &Territory)> = map
        .owned_by(faction)
        .filter(|territory| !seen.contains(&territory.id))
        .map(|territory| (threat_level(ctx, territory), territory))
        .filter(|(threat, _)| *threat >= cfg.threat_threshold)
        .collect();
    threatened.sort_by(|(a_threat, a), (b_threat, b)| {
        b_threat.cmp(a_threat).then_with(|| a.id.cmp(&b.id))
    });
    for (threat, territory) in threatened {
        seen.insert(&territory.id);
        ordered.push(ReinforcementTarget {
            id: territory.id.clone(),
            tier: PriorityTier::ThreatenedBorder,
            reason: format!("threatened border (threat {threat})"),
        });
    }

    let mut strategic: Vec<&Territory> = map
        .owned_by(faction)
        .filter(|territory| !seen.contains(&territory.id))
        .filter(|territory| territory.strategic_value >= cfg.strategic_cutoff)
        .collect();
    strategic.sort_by(|a, b| {
        b.strategic_value
            .total_cmp(&a.strategic_value)
            .then_with(|| a.id.cmp(&b.id))
    });
    for territory in strategic {
        seen.insert(&territory.id);
        ordered.push(ReinforcementTarget {
            id: territory.id.clone(),
            tier: PriorityTier::StrategicValue,
            reason: format!("strategic value {:.1}", territory.strategic_value),
        });
    }

    for territory in map.owned_by(faction) {
        if seen.insert(&territory.id) {
            ordered.push(ReinforcementTarget {
                id: territory.id.clone(),
                tier: PriorityTier::Fallback,
                reason: "hold the line".to_string(),
            });
        }
    }

    ordered
}

/// Spread `total` armies over the priority list in batches.
///
/// The list is walked repeatedly until the whole budget is placed, so the
/// returned decisions always sum to `total`. A zero budget or a faction with
/// no territory yields an empty list.
#[must_use]
pub fn place_reinforcements(ctx: &PlanningContext<'_>, total: u32) -> Vec<Decision> {
    if total == 0 {
        return Vec::new();
    }
    let targets = reinforcement_priorities(ctx);
    if targets.is_empty() {
        return Vec::new();
    }

    let batch = ctx.config.reinforcement.batch_size.max(1);
    let mut remaining = total;
    let mut decisions = Vec::new();
    for target in targets.iter().cycle() {
        if remaining == 0 {
            break;
        }
        let armies = remaining.min(batch);
        remaining -= armies;
        decisions.push(Decision::reinforce(
            target.id.clone(),
            armies,
            format!("{}: {}", target.tier.key(), target.reason),
        ));
    }

    debug!(
        "{LOG_REINFORCE_PLAN} | {} placed {total} across {} decision(s) over {} target(s)",
        ctx.faction,
        decisions.len(),
        targets.len()
    );
    decisions
}
