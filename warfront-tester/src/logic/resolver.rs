//! Reference resolver: applies a faction's plan to the authoritative store.
use anyhow::Result;
use log::debug;
use rand::Rng;
use serde::Serialize;
use warfront_ai::{
    Decision, DecisionKind, FactionId, TerritoryId, TerritoryMap, TerritoryStore, TurnPlan,
};

/// Die faces used for each combat exchange.
const DIE_FACES: u32 = 6;

/// What the resolver did with one plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub reinforced: u32,
    pub attacks_resolved: u32,
    pub captures: u32,
    pub moves_resolved: u32,
    /// Decisions dropped because earlier outcomes made them stale.
    pub skipped: u32,
}

/// Outcome of one fight between committed attackers and a garrison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Battle {
    pub attackers_left: u32,
    pub defenders_left: u32,
}

/// Trade single casualties until one side is gone; defenders win ties.
pub fn fight<R: Rng>(attackers: u32, defenders: u32, rng: &mut R) -> Battle {
    let mut battle = Battle {
        attackers_left: attackers,
        defenders_left: defenders,
    };
    while battle.attackers_left > 0 && battle.defenders_left > 0 {
        let attack_roll = rng.gen_range(1..=DIE_FACES);
        let defense_roll = rng.gen_range(1..=DIE_FACES);
        if attack_roll > defense_roll {
            battle.defenders_left -= 1;
        } else {
            battle.attackers_left -= 1;
        }
    }
    battle
}

/// Apply `plan` for `faction` in resolution order.
///
/// Every decision is re-checked against the live store first; anything made
/// stale by an earlier outcome is skipped rather than forced through.
pub fn resolve_plan<S, R>(
    store: &mut S,
    faction: &FactionId,
    plan: &TurnPlan,
    rng: &mut R,
) -> Result<ResolutionStats>
where
    S: TerritoryStore,
    S::Error: Into<anyhow::Error>,
    R: Rng,
{
    let mut stats = ResolutionStats::default();
    for decision in plan.decisions() {
        let map = store.territories().map_err(Into::into)?;
        match decision.kind {
            DecisionKind::Reinforce => {
                let Some(target) = map.get(&decision.to).filter(|t| t.is_controlled_by(faction))
                else {
                    stats.skipped += 1;
                    continue;
                };
                let garrison = target.garrison.saturating_add(decision.armies);
                store
                    .apply_control_change(&decision.to, target.controller.clone(), garrison)
                    .map_err(Into::into)?;
                stats.reinforced += decision.armies;
            }
            DecisionKind::Attack => {
                let Some(committed) = usable_armies(&map, faction, decision) else {
                    stats.skipped += 1;
                    continue;
                };
                let Some(target) = map.get(&decision.to).filter(|t| !t.is_controlled_by(faction))
                else {
                    stats.skipped += 1;
                    continue;
                };
                let origin_garrison = origin_garrison(&map, decision);
                let battle = fight(committed, target.garrison, rng);
                store
                    .apply_control_change(
                        origin_id(decision),
                        Some(faction.clone()),
                        origin_garrison - committed,
                    )
                    .map_err(Into::into)?;
                if battle.defenders_left == 0 {
                    store
                        .apply_control_change(
                            &decision.to,
                            Some(faction.clone()),
                            battle.attackers_left,
                        )
                        .map_err(Into::into)?;
                    stats.captures += 1;
                    debug!(
                        "{faction} captured {} with {} survivor(s)",
                        decision.to, battle.attackers_left
                    );
                } else {
                    store
                        .apply_control_change(
                            &decision.to,
                            target.controller.clone(),
                            battle.defenders_left,
                        )
                        .map_err(Into::into)?;
                }
                stats.attacks_resolved += 1;
            }
            DecisionKind::Move => {
                let Some(moved) = usable_armies(&map, faction, decision) else {
                    stats.skipped += 1;
                    continue;
                };
                let Some(target) = map.get(&decision.to).filter(|t| t.is_controlled_by(faction))
                else {
                    stats.skipped += 1;
                    continue;
                };
                let origin_garrison = origin_garrison(&map, decision);
                store
                    .apply_control_change(
                        origin_id(decision),
                        Some(faction.clone()),
                        origin_garrison - moved,
                    )
                    .map_err(Into::into)?;
                store
                    .apply_control_change(
                        &decision.to,
                        Some(faction.clone()),
                        target.garrison.saturating_add(moved),
                    )
                    .map_err(Into::into)?;
                stats.moves_resolved += 1;
            }
        }
    }
    Ok(stats)
}

fn origin_id(decision: &Decision) -> &TerritoryId {
    decision.from.as_ref().unwrap_or(&decision.to)
}

fn origin_garrison(map: &TerritoryMap, decision: &Decision) -> u32 {
    map.get(origin_id(decision)).map_or(0, |t| t.garrison)
}

/// Armies the origin can still release for `decision`, capped by what was asked.
fn usable_armies(map: &TerritoryMap, faction: &FactionId, decision: &Decision) -> Option<u32> {
    let from = map.get(decision.from.as_ref()?)?;
    if !from.is_controlled_by(faction) || !from.neighbors.contains(&decision.to) {
        return None;
    }
    let armies = decision.armies.min(from.available_armies());
    (armies > 0).then_some(armies)
}
