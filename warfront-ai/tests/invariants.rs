use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use warfront_ai::{
    DecisionKind, EngineConfig, FactionId, Personality, PlanningContext, Region, RegionCatalog,
    Territory, TerritoryMap, TurnPlan, make_ai_turn, planning_rng,
};

const FACTIONS: [&str; 3] = ["red", "blue", "green"];

fn link(adjacency: &mut [Vec<usize>], a: usize, b: usize) {
    if a != b && !adjacency[a].contains(&b) {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
}

/// Ring of territories with a few random chords; every edge is symmetric.
fn random_map(rng: &mut ChaCha20Rng) -> (TerritoryMap, RegionCatalog) {
    let count = rng.gen_range(4..14);
    let ids: Vec<String> = (0..count).map(|i| format!("t{i:02}")).collect();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
    for i in 0..count {
        link(&mut adjacency, i, (i + 1) % count);
    }
    for _ in 0..count / 2 {
        let a = rng.gen_range(0..count);
        let b = rng.gen_range(0..count);
        link(&mut adjacency, a, b);
    }

    let territories: Vec<Territory> = (0..count)
        .map(|i| {
            let neighbors: Vec<&str> = adjacency[i].iter().map(|&n| ids[n].as_str()).collect();
            let mut territory = Territory::new(&ids[i])
                .with_neighbors(&neighbors)
                .with_garrison(rng.gen_range(0..15))
                .with_strategic_value(f64::from(rng.gen_range(0..4_u8)))
                .with_production_bonus(f64::from(rng.gen_range(0..3_u8)))
                .with_conflict_risk(f64::from(rng.gen_range(0..5_u8)));
            if rng.gen_bool(0.85) {
                territory = territory.with_controller(FACTIONS[rng.gen_range(0..FACTIONS.len())]);
            }
            if rng.gen_bool(0.2) {
                territory = territory.contested_by(FACTIONS[rng.gen_range(0..FACTIONS.len())]);
            }
            territory
        })
        .collect();

    let mut regions = Vec::new();
    for (n, chunk) in ids.chunks(3).enumerate() {
        let members: Vec<&str> = chunk.iter().map(String::as_str).collect();
        regions.push(Region::new(&format!("R{n}"), &members));
    }

    (TerritoryMap::new(territories).unwrap(), RegionCatalog(regions))
}

fn check_plan(map: &TerritoryMap, faction: &FactionId, budget: u32, plan: &TurnPlan) {
    let config = EngineConfig::default();
    let owns_any = map.owns_any(faction);

    assert_eq!(plan.total_reinforced(), if owns_any { budget } else { 0 });
    assert_eq!(plan.reinforcements.is_empty(), budget == 0 || !owns_any);
    assert!(plan.attacks.len() <= config.turn.max_attacks);
    assert!(plan.moves.len() <= config.turn.max_moves);

    let mut targets: Vec<&str> = plan.attacks.iter().map(|a| a.to.as_str()).collect();
    targets.sort_unstable();
    targets.dedup();
    assert_eq!(targets.len(), plan.attacks.len(), "repeated attack target");

    let mut working = map.clone();
    for decision in &plan.reinforcements {
        assert_eq!(decision.kind, DecisionKind::Reinforce);
        assert!(decision.armies >= 1 && decision.armies <= config.reinforcement.batch_size);
        assert!(working.get(&decision.to).unwrap().is_controlled_by(faction));
        working = working.with_decision(decision);
    }

    for decision in plan.attacks.iter().chain(plan.moves.iter()) {
        let from_id = decision.from.as_ref().expect("origin");
        assert_ne!(from_id, &decision.to);
        let from = working.get(from_id).unwrap();
        let to = working.get(&decision.to).unwrap();
        assert!(from.is_controlled_by(faction));
        assert!(from.garrison > 1);
        assert!(from.neighbors.contains(&decision.to));
        assert!(decision.armies >= 1);
        assert!(decision.armies <= from.garrison - 1);
        match decision.kind {
            DecisionKind::Attack => assert!(!to.is_controlled_by(faction)),
            DecisionKind::Move => assert!(to.is_controlled_by(faction)),
            DecisionKind::Reinforce => panic!("reinforcement outside its phase"),
        }
        working = working.with_decision(decision);
    }
}

#[test]
fn seeded_sweep_respects_every_invariant() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5EED_CAFE);
    let config = EngineConfig::default();

    for round in 0..120_u64 {
        let (map, regions) = random_map(&mut rng);
        let pristine = map.clone();
        let budget = rng.gen_range(0..23);
        for name in FACTIONS {
            let faction = FactionId::new(name);
            for personality in Personality::ALL {
                let ctx = PlanningContext::new(&faction, &map, &regions, *personality, &config)
                    .unwrap();
                let plan = make_ai_turn(&ctx, budget, &mut planning_rng(round));
                check_plan(&map, &faction, budget, &plan);
            }
        }
        assert_eq!(map, pristine);
    }
}

#[test]
fn jittered_personalities_replay_identically() {
    let mut rng = ChaCha20Rng::seed_from_u64(17);
    let config = EngineConfig::default();
    for round in 0..30_u64 {
        let (map, regions) = random_map(&mut rng);
        let faction = FactionId::new("red");
        for personality in [Personality::Chaotic, Personality::Trickster] {
            let ctx =
                PlanningContext::new(&faction, &map, &regions, personality, &config).unwrap();
            let first = make_ai_turn(&ctx, 9, &mut planning_rng(round));
            let second = make_ai_turn(&ctx, 9, &mut planning_rng(round));
            assert_eq!(first, second);
        }
    }
}
