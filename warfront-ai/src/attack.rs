//! Attack evaluation: score every legal attacker/defender pair and keep the best.
use log::{debug, trace};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::constants::{LOG_ATTACK_CANDIDATE, LOG_ATTACK_SELECTED};
use crate::context::PlanningContext;
use crate::decision::Decision;
use crate::numbers::{army_ratio, round_f64_to_u32, u32_to_f64};
use crate::territory::{Territory, TerritoryId};

/// Power-ratio tier an attack falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceTier {
    Overwhelming,
    Strong,
    Slight,
    BelowTolerance,
}

impl ForceTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overwhelming => "overwhelming force",
            Self::Strong => "strong advantage",
            Self::Slight => "slight advantage",
            Self::BelowTolerance => "below risk tolerance",
        }
    }
}

/// Deterministic score for one candidate attack, before jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackAssessment {
    pub available: u32,
    pub power_ratio: f64,
    pub tier: ForceTier,
    pub score: f64,
    pub reason: String,
}

/// Score an attack from `from` into `to` for the context's faction.
///
/// Positive contributions (tier, strategic, region, uncontrolled) are scaled
/// by the personality's aggression; the offset and penalties are not.
#[must_use]
pub fn score_attack(
    ctx: &PlanningContext<'_>,
    from: &Territory,
    to: &Territory,
) -> AttackAssessment {
    let cfg = &ctx.config.attack;
    let profile = ctx.profile;
    let available = from.available_armies();
    let power_ratio = army_ratio(available, to.garrison.max(1));

    let mut positive = 0.0;
    let mut penalty = 0.0;
    let mut notes: Vec<String> = Vec::new();

    let tier = if power_ratio >= cfg.overwhelming_ratio {
        positive += cfg.overwhelming_bonus;
        ForceTier::Overwhelming
    } else if power_ratio >= cfg.strong_ratio {
        positive += cfg.strong_bonus;
        ForceTier::Strong
    } else if power_ratio >= cfg.slight_ratio {
        positive += cfg.slight_bonus;
        ForceTier::Slight
    } else {
        penalty += cfg.risk_penalty_base / profile.risk_tolerance;
        ForceTier::BelowTolerance
    };
    notes.push(format!("{} ({power_ratio:.1}:1)", tier.label()));

    let strategic =
        to.strategic_value * cfg.strategic_weight + to.production_bonus * cfg.production_weight;
    if strategic > 0.0 {
        positive += strategic;
        notes.push(format!("strategic worth {strategic:.1}"));
    }

    for region in ctx
        .regions
        .completed_by_capture(ctx.faction, &to.id, ctx.territories)
    {
        positive += cfg.region_completion_bonus;
        notes.push(format!("completes {}", region.name));
    }

    if to.is_uncontrolled() {
        positive += cfg.uncontrolled_bonus;
        notes.push("uncontrolled territory".to_string());
    }

    let exposure = (cfg.conflict_risk_pivot - power_ratio).max(0.0);
    let conflict = to.conflict_risk * exposure;
    if conflict > 0.0 {
        penalty += conflict;
        notes.push(format!("conflict risk -{conflict:.1}"));
    }

    let score = profile.base_score_offset + positive * profile.aggression_multiplier - penalty;
    AttackAssessment {
        available,
        power_ratio,
        tier,
        score,
        reason: notes.join("; "),
    }
}

/// Armies to commit out of `available`: the configured share, at least one.
#[must_use]
pub fn committed_armies(available: u32, commit_fraction: f64) -> u32 {
    if available == 0 {
        return 0;
    }
    round_f64_to_u32(u32_to_f64(available) * commit_fraction).clamp(1, available)
}

fn jitter<R: Rng>(amplitude: f64, rng: &mut R) -> f64 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

struct Candidate<'a> {
    from: &'a TerritoryId,
    to: &'a TerritoryId,
    available: u32,
    score: f64,
    reason: String,
}

impl Candidate<'_> {
    /// Higher score wins; ties go to the lower target id, then lower origin id.
    fn outranks(&self, other: &Self) -> bool {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.to.cmp(self.to))
            .then_with(|| other.from.cmp(self.from))
            == Ordering::Greater
    }
}

/// Best attack for the context's faction, or `None` when nothing scores above zero.
///
/// Candidates are visited in ascending origin id and adjacency order, so the
/// jitter stream (only drawn when the profile has jitter) is reproducible.
pub fn find_best_attack<R: Rng>(ctx: &PlanningContext<'_>, rng: &mut R) -> Option<Decision> {
    find_next_attack(ctx, &BTreeSet::new(), rng)
}

/// Like [`find_best_attack`], but never picks a target in `engaged`.
///
/// The turn orchestrator passes the targets it has already committed armies
/// against, so later attacks in the same turn spread to fresh targets.
pub fn find_next_attack<R: Rng>(
    ctx: &PlanningContext<'_>,
    engaged: &BTreeSet<TerritoryId>,
    rng: &mut R,
) -> Option<Decision> {
    let map = ctx.territories;
    let mut best: Option<Candidate<'_>> = None;

    for from in map.owned_by(ctx.faction) {
        if from.available_armies() == 0 {
            continue;
        }
        for to in map.neighbors_of(from) {
            if to.is_controlled_by(ctx.faction) || engaged.contains(&to.id) {
                continue;
            }
            let assessment = score_attack(ctx, from, to);
            let score = assessment.score + jitter(ctx.profile.score_jitter, rng);
            trace!(
                "{LOG_ATTACK_CANDIDATE} | {} -> {} score {score:.2} ({})",
                from.id, to.id, assessment.reason
            );
            if score <= 0.0 {
                continue;
            }
            let candidate = Candidate {
                from: &from.id,
                to: &to.id,
                available: assessment.available,
                score,
                reason: assessment.reason,
            };
            if best.as_ref().is_none_or(|current| candidate.outranks(current)) {
                best = Some(candidate);
            }
        }
    }

    let best = best?;
    let armies = committed_armies(best.available, ctx.config.attack.commit_fraction);
    debug!(
        "{LOG_ATTACK_SELECTED} | {} {} -> {} x{armies} score {:.2}",
        ctx.faction, best.from, best.to, best.score
    );
    Some(Decision::attack(
        best.from.clone(),
        best.to.clone(),
        armies,
        best.reason,
        best.score,
    ))
}
