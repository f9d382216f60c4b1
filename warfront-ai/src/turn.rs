//! One faction's full turn: reinforce, attack, then consolidate.
use log::debug;
use rand::Rng;
use std::collections::BTreeSet;

use crate::attack::find_next_attack;
use crate::consolidation::find_best_move;
use crate::constants::LOG_TURN_SUMMARY;
use crate::context::PlanningContext;
use crate::decision::TurnPlan;
use crate::reinforcement::place_reinforcements;

/// Plan a complete turn against a private working copy of the snapshot.
///
/// Reinforcements land on the working copy before attacks are scored. Each
/// accepted attack withdraws its armies from the origin and takes its target
/// off the table for the rest of the turn. Each move shifts armies along its
/// first hop. The caller's snapshot is never touched.
pub fn make_ai_turn<R: Rng>(
    ctx: &PlanningContext<'_>,
    reinforcements: u32,
    rng: &mut R,
) -> TurnPlan {
    let mut plan = TurnPlan {
        reinforcements: place_reinforcements(ctx, reinforcements),
        ..TurnPlan::default()
    };

    let mut working = ctx.territories.clone();
    for decision in &plan.reinforcements {
        working = working.with_decision(decision);
    }

    let max_attacks = ctx.config.turn.max_attacks;
    let mut engaged = BTreeSet::new();
    while plan.attacks.len() < max_attacks {
        let Some(attack) = find_next_attack(&ctx.with_territories(&working), &engaged, rng) else {
            break;
        };
        working = working.with_decision(&attack);
        engaged.insert(attack.to.clone());
        plan.attacks.push(attack);
    }

    let max_moves = ctx.config.turn.max_moves;
    while plan.moves.len() < max_moves {
        let Some(movement) = find_best_move(&ctx.with_territories(&working)) else {
            break;
        };
        working = working.with_decision(&movement);
        plan.moves.push(movement);
    }

    debug!(
        "{LOG_TURN_SUMMARY} | {} reinforce {} / attacks {} / moves {}",
        ctx.faction,
        plan.total_reinforced(),
        plan.attacks.len(),
        plan.moves.len()
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decision::DecisionKind;
    use crate::personality::Personality;
    use crate::region::RegionCatalog;
    use crate::seed::planning_rng;
    use crate::territory::{FactionId, Territory, TerritoryId, TerritoryMap};

    fn star() -> TerritoryMap {
        TerritoryMap::new(vec![
            Territory::new("hub")
                .with_controller("red")
                .with_neighbors(&["n1", "n2", "n3", "n4", "n5"])
                .with_garrison(30),
            Territory::new("n1").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
            Territory::new("n2").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
            Territory::new("n3").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
            Territory::new("n4").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
            Territory::new("n5").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
        ])
        .unwrap()
    }

    #[test]
    fn attack_cap_holds_and_origin_is_drawn_down() {
        let map = star();
        let red = FactionId::new("red");
        let regions = RegionCatalog::empty();
        let config = EngineConfig::default();
        let ctx = PlanningContext::new(&red, &map, &regions, Personality::Aggressive, &config)
            .unwrap();
        let plan = make_ai_turn(&ctx, 0, &mut planning_rng(1));

        assert!(plan.reinforcements.is_empty());
        assert_eq!(plan.attacks.len(), 3);
        // 29 available: 17, then 7 of 12, then 3 of 5 after the first two.
        let committed: Vec<u32> = plan.attacks.iter().map(|a| a.armies).collect();
        assert_eq!(committed, vec![17, 7, 3]);
        let targets: Vec<&str> = plan.attacks.iter().map(|a| a.to.as_str()).collect();
        assert_eq!(targets, vec!["n1", "n2", "n3"]);
        assert!(plan.attacks.iter().all(|a| a.kind == DecisionKind::Attack));
        assert_eq!(map, star());
    }

    #[test]
    fn each_attack_goes_to_a_fresh_target() {
        let map = TerritoryMap::new(vec![
            Territory::new("hub")
                .with_controller("red")
                .with_neighbors(&["n1", "n2", "n3"])
                .with_garrison(30),
            Territory::new("n1").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
            Territory::new("n2").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
            Territory::new("n3").with_controller("blue").with_neighbors(&["hub"]).with_garrison(1),
        ])
        .unwrap();
        let red = FactionId::new("red");
        let regions = RegionCatalog::empty();
        let config = EngineConfig::default();
        let ctx =
            PlanningContext::new(&red, &map, &regions, Personality::Balanced, &config).unwrap();
        let plan = make_ai_turn(&ctx, 0, &mut planning_rng(2));

        let mut targets: Vec<&str> = plan.attacks.iter().map(|a| a.to.as_str()).collect();
        assert_eq!(targets.len(), 3);
        targets.dedup();
        assert_eq!(targets, vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn lone_target_is_attacked_once() {
        let map = TerritoryMap::new(vec![
            Territory::new("home")
                .with_controller("red")
                .with_neighbors(&["away"])
                .with_garrison(20),
            Territory::new("away")
                .with_controller("blue")
                .with_neighbors(&["home"])
                .with_garrison(1),
        ])
        .unwrap();
        let red = FactionId::new("red");
        let regions = RegionCatalog::empty();
        let config = EngineConfig::default();
        let ctx =
            PlanningContext::new(&red, &map, &regions, Personality::Aggressive, &config).unwrap();
        let plan = make_ai_turn(&ctx, 0, &mut planning_rng(6));
        assert_eq!(plan.attacks.len(), 1);
        assert_eq!(plan.attacks[0].armies, 11);
    }

    #[test]
    fn reinforcements_feed_the_attack_phase() {
        // 4 vs 3 is too thin until the budget lands on the border.
        let map = TerritoryMap::new(vec![
            Territory::new("home")
                .with_controller("red")
                .with_neighbors(&["away"])
                .with_garrison(4),
            Territory::new("away")
                .with_controller("blue")
                .with_neighbors(&["home"])
                .with_garrison(3),
        ])
        .unwrap();
        let red = FactionId::new("red");
        let regions = RegionCatalog::empty();
        let config = EngineConfig::default();
        let ctx =
            PlanningContext::new(&red, &map, &regions, Personality::Balanced, &config).unwrap();

        let idle = make_ai_turn(&ctx, 0, &mut planning_rng(3));
        assert!(idle.attacks.is_empty());

        let plan = make_ai_turn(&ctx, 6, &mut planning_rng(3));
        assert_eq!(plan.total_reinforced(), 6);
        assert_eq!(plan.attacks.len(), 1);
        assert_eq!(plan.attacks[0].from, Some(TerritoryId::new("home")));
        assert_eq!(plan.attacks[0].armies, 5);
    }

    #[test]
    fn idle_turn_is_three_empty_lists() {
        let map = TerritoryMap::new(vec![
            Territory::new("alone").with_controller("red").with_garrison(1),
        ])
        .unwrap();
        let red = FactionId::new("red");
        let regions = RegionCatalog::empty();
        let config = EngineConfig::default();
        let ctx =
            PlanningContext::new(&red, &map, &regions, Personality::Defensive, &config).unwrap();
        let plan = make_ai_turn(&ctx, 0, &mut planning_rng(9));
        assert!(plan.is_empty());
    }

    #[test]
    fn move_cap_holds() {
        // three loaded interiors feeding one border
        let map = TerritoryMap::new(vec![
            Territory::new("a").with_controller("red").with_neighbors(&["edge"]).with_garrison(6),
            Territory::new("b").with_controller("red").with_neighbors(&["edge"]).with_garrison(6),
            Territory::new("c").with_controller("red").with_neighbors(&["edge"]).with_garrison(6),
            Territory::new("edge")
                .with_controller("red")
                .with_neighbors(&["a", "b", "c", "foe"])
                .with_garrison(1),
            Territory::new("foe")
                .with_controller("blue")
                .with_neighbors(&["edge"])
                .with_garrison(40),
        ])
        .unwrap();
        let red = FactionId::new("red");
        let regions = RegionCatalog::empty();
        let config = EngineConfig::default();
        let ctx =
            PlanningContext::new(&red, &map, &regions, Personality::Balanced, &config).unwrap();
        let plan = make_ai_turn(&ctx, 0, &mut planning_rng(5));

        assert!(plan.attacks.is_empty());
        assert_eq!(plan.moves.len(), 2);
        let origins: Vec<_> = plan.moves.iter().filter_map(|m| m.from.clone()).collect();
        assert_eq!(origins, vec![TerritoryId::new("a"), TerritoryId::new("b")]);
        assert!(plan.moves.iter().all(|m| m.to == TerritoryId::new("edge") && m.armies == 5));
    }
}
