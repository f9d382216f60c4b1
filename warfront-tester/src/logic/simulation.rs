use anyhow::Result;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::hash::Hasher;
use std::time::{Duration, Instant};
use twox_hash::XxHash64;
use warfront_ai::{
    ConquestEngine, DecisionKind, EngineConfig, FactionId, MemoryStore, Personality,
    RegionCatalog, TerritoryMap, TerritoryStore, TurnPlan, turn_seed,
};

use super::resolver::{ResolutionStats, resolve_plan};

/// Floor on the per-turn reinforcement budget.
const MIN_REINFORCEMENTS: u32 = 3;
/// Owned territories per extra reinforcement army.
const TERRITORIES_PER_ARMY: u32 = 3;
/// Bonus for each region held outright.
const REGION_HOLD_BONUS: u32 = 2;
/// Separates the resolver's dice stream from the planner's jitter stream.
const RESOLVER_STREAM: u64 = 0xD1CE_D1CE_D1CE_D1CE;

/// Settings for one self-play match.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub max_turns: u32,
    pub personalities: Vec<Personality>,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(seed: u64, personalities: Vec<Personality>) -> Self {
        Self {
            seed,
            max_turns: 20,
            personalities,
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Personality for the `index`-th faction, cycling through the roster.
    #[must_use]
    pub fn personality_for(&self, index: usize) -> Personality {
        if self.personalities.is_empty() {
            return Personality::default();
        }
        self.personalities[index % self.personalities.len()]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FactionSummary {
    pub faction: String,
    pub personality: Personality,
    pub territories: usize,
    pub armies: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DecisionTotals {
    pub reinforcements: u32,
    pub attacks: u32,
    pub moves: u32,
    pub captures: u32,
    pub skipped: u32,
}

impl DecisionTotals {
    fn absorb(&mut self, plan: &TurnPlan, stats: ResolutionStats) {
        self.reinforcements += stats.reinforced;
        self.attacks += u32::try_from(plan.attacks.len()).unwrap_or(u32::MAX);
        self.moves += u32::try_from(plan.moves.len()).unwrap_or(u32::MAX);
        self.captures += stats.captures;
        self.skipped += stats.skipped;
    }
}

/// Everything observed during one match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub turns_played: u32,
    pub winner: Option<String>,
    pub factions: Vec<FactionSummary>,
    pub totals: DecisionTotals,
    /// XxHash64 over every planned decision, in order.
    pub digest: u64,
    pub violations: Vec<String>,
}

impl MatchReport {
    /// Placeholder for a match that never started.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            turns_played: 0,
            winner: None,
            factions: Vec::new(),
            totals: DecisionTotals {
                reinforcements: 0,
                attacks: 0,
                moves: 0,
                captures: 0,
                skipped: 0,
            },
            digest: 0,
            violations: Vec::new(),
        }
    }
}

/// Risk-style budget: a third of held territory plus region bonuses.
#[must_use]
pub fn reinforcement_budget(
    map: &TerritoryMap,
    regions: &RegionCatalog,
    faction: &FactionId,
) -> u32 {
    let held = u32::try_from(map.owned_by(faction).count()).unwrap_or(u32::MAX);
    if held == 0 {
        return 0;
    }
    let regions_held = regions
        .iter()
        .filter(|region| region.is_controlled_by(faction, map))
        .count();
    let bonus = u32::try_from(regions_held)
        .unwrap_or(u32::MAX)
        .saturating_mul(REGION_HOLD_BONUS);
    (held / TERRITORIES_PER_ARMY)
        .max(MIN_REINFORCEMENTS)
        .saturating_add(bonus)
}

/// Check a plan against the snapshot it was made from.
///
/// Replays the plan on a scratch copy so every origin is judged on the
/// garrison it would actually have when the decision is resolved.
#[must_use]
pub fn check_plan(
    map: &TerritoryMap,
    faction: &FactionId,
    budget: u32,
    config: &EngineConfig,
    plan: &TurnPlan,
) -> Vec<String> {
    let mut violations = Vec::new();
    let owns_any = map.owns_any(faction);
    let expected = if owns_any { budget } else { 0 };

    if plan.total_reinforced() != expected {
        violations.push(format!(
            "{faction}: reinforced {} of a {expected} budget",
            plan.total_reinforced()
        ));
    }
    if plan.attacks.len() > config.turn.max_attacks {
        violations.push(format!("{faction}: {} attacks", plan.attacks.len()));
    }
    if plan.moves.len() > config.turn.max_moves {
        violations.push(format!("{faction}: {} moves", plan.moves.len()));
    }
    for (index, attack) in plan.attacks.iter().enumerate() {
        if plan.attacks[..index].iter().any(|earlier| earlier.to == attack.to) {
            violations.push(format!("{faction}: attacks {} twice", attack.to));
        }
    }

    let mut working = map.clone();
    for decision in plan.decisions() {
        if decision.armies == 0 {
            violations.push(format!("{faction}: zero-army decision {decision}"));
        }
        match decision.kind {
            DecisionKind::Reinforce => {
                if decision.armies > config.reinforcement.batch_size {
                    violations.push(format!("{faction}: oversized batch {decision}"));
                }
                if !working
                    .get(&decision.to)
                    .is_some_and(|t| t.is_controlled_by(faction))
                {
                    violations.push(format!("{faction}: reinforces foreign ground {decision}"));
                }
            }
            DecisionKind::Attack | DecisionKind::Move => {
                let origin = decision.from.as_ref().and_then(|id| working.get(id));
                let target = working.get(&decision.to);
                match (origin, target) {
                    (Some(from), Some(to)) => {
                        if !from.is_controlled_by(faction) {
                            violations.push(format!("{faction}: foreign origin {decision}"));
                        }
                        if decision.armies > from.available_armies() {
                            violations.push(format!("{faction}: over-commits {decision}"));
                        }
                        if !from.neighbors.contains(&to.id) {
                            violations.push(format!("{faction}: non-adjacent {decision}"));
                        }
                        let own_target = to.is_controlled_by(faction);
                        if decision.kind == DecisionKind::Attack && own_target {
                            violations.push(format!("{faction}: attacks itself {decision}"));
                        }
                        if decision.kind == DecisionKind::Move && !own_target {
                            violations.push(format!("{faction}: moves off-territory {decision}"));
                        }
                    }
                    _ => violations.push(format!("{faction}: unknown territory in {decision}")),
                }
            }
        }
        working = working.with_decision(decision);
    }
    violations
}

fn digest_plan(hasher: &mut XxHash64, turn: u32, faction: &FactionId, plan: &TurnPlan) {
    hasher.write_u32(turn);
    hasher.write(faction.as_str().as_bytes());
    for decision in plan.decisions() {
        hasher.write(decision.kind.key().as_bytes());
        if let Some(from) = &decision.from {
            hasher.write(from.as_str().as_bytes());
        }
        hasher.write(decision.to.as_str().as_bytes());
        hasher.write_u32(decision.armies);
    }
}

/// Deterministic self-play over one map.
pub struct SimulationSession {
    engine: ConquestEngine<MemoryStore>,
    config: SimulationConfig,
    roster: Vec<(FactionId, Personality)>,
}

impl SimulationSession {
    pub fn new(
        store: MemoryStore,
        engine_config: EngineConfig,
        config: SimulationConfig,
    ) -> Result<Self> {
        let roster = store
            .snapshot()
            .factions()
            .into_iter()
            .enumerate()
            .map(|(index, faction)| (faction, config.personality_for(index)))
            .collect();
        let engine = ConquestEngine::new(store, engine_config)?;
        Ok(Self {
            engine,
            config,
            roster,
        })
    }

    #[must_use]
    pub fn roster(&self) -> &[(FactionId, Personality)] {
        &self.roster
    }

    /// Play until one faction remains or the turn limit is reached.
    pub fn run(mut self) -> Result<(MatchReport, Duration)> {
        let started = Instant::now();
        let mut hasher = XxHash64::with_seed(self.config.seed);
        let mut totals = DecisionTotals::default();
        let mut violations = Vec::new();
        let mut turns_played = 0;

        for turn in 1..=self.config.max_turns {
            if self.survivors().len() <= 1 {
                break;
            }
            turns_played = turn;
            for (faction, personality) in self.roster.clone() {
                let map = self.engine.store().territories()?;
                if !map.owns_any(&faction) {
                    continue;
                }
                let regions = self.engine.store().regions()?;
                let budget = reinforcement_budget(&map, &regions, &faction);
                let seed = turn_seed(self.config.seed, &faction, turn);

                let plan = self.engine.plan_turn(&faction, personality, budget, seed)?;
                violations.extend(check_plan(&map, &faction, budget, self.engine.config(), &plan));
                digest_plan(&mut hasher, turn, &faction, &plan);

                let mut dice = ChaCha20Rng::seed_from_u64(seed ^ RESOLVER_STREAM);
                let stats = resolve_plan(self.engine.store_mut(), &faction, &plan, &mut dice)?;
                totals.absorb(&plan, stats);
                debug!(
                    "turn {turn} {faction} ({personality}): +{budget}, {} attack(s), {} capture(s), {} move(s)",
                    plan.attacks.len(),
                    stats.captures,
                    plan.moves.len()
                );
            }
        }

        let survivors = self.survivors();
        let winner = (survivors.len() == 1).then(|| survivors[0].to_string());
        if let Some(name) = &winner {
            info!("{name} holds the map after {turns_played} turn(s)");
        }
        let report = MatchReport {
            turns_played,
            winner,
            factions: self.summaries(),
            totals,
            digest: hasher.finish(),
            violations,
        };
        Ok((report, started.elapsed()))
    }

    fn survivors(&self) -> Vec<FactionId> {
        self.engine.store().snapshot().factions().into_iter().collect()
    }

    fn summaries(&self) -> Vec<FactionSummary> {
        let map = self.engine.store().snapshot();
        self.roster
            .iter()
            .map(|(faction, personality)| FactionSummary {
                faction: faction.to_string(),
                personality: *personality,
                territories: map.owned_by(faction).count(),
                armies: map
                    .owned_by(faction)
                    .fold(0u32, |acc, t| acc.saturating_add(t.garrison)),
            })
            .collect()
    }
}
