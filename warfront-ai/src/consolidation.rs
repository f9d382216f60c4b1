//! Consolidation: push surplus armies from the interior toward the weakest border.
use log::debug;
use std::collections::{HashMap, VecDeque};

use crate::constants::{GARRISON_RESERVE, LOG_MOVE_SELECTED};
use crate::context::PlanningContext;
use crate::decision::Decision;
use crate::territory::{FactionId, Territory, TerritoryId, TerritoryMap};

/// Breadth-first search over territories held by one faction.
///
/// Parent pointers are keyed by territory id so the first hop toward any
/// reached territory can be recovered without touching the graph.
#[derive(Debug)]
pub struct OwnedSearch<'a> {
    start: &'a TerritoryId,
    parents: HashMap<&'a TerritoryId, &'a TerritoryId>,
    depths: HashMap<&'a TerritoryId, usize>,
}

impl<'a> OwnedSearch<'a> {
    /// Explore from `start`, never stepping onto territory `faction` does not hold.
    #[must_use]
    pub fn run(map: &'a TerritoryMap, faction: &FactionId, start: &'a Territory) -> Self {
        let mut parents = HashMap::new();
        let mut depths = HashMap::new();
        let mut queue: VecDeque<&Territory> = VecDeque::new();

        depths.insert(&start.id, 0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let depth = depths.get(&current.id).copied().unwrap_or(0);
            for neighbor in map.neighbors_of(current) {
                if !neighbor.is_controlled_by(faction) || depths.contains_key(&neighbor.id) {
                    continue;
                }
                depths.insert(&neighbor.id, depth + 1);
                parents.insert(&neighbor.id, &current.id);
                queue.push_back(neighbor);
            }
        }

        Self {
            start: &start.id,
            parents,
            depths,
        }
    }

    /// Hop count to `id`, if it was reached.
    #[must_use]
    pub fn distance(&self, id: &TerritoryId) -> Option<usize> {
        self.depths.get(id).copied()
    }

    /// First territory on the shortest path from the start toward `target`.
    #[must_use]
    pub fn first_hop(&self, target: &TerritoryId) -> Option<&'a TerritoryId> {
        let mut current = *self.parents.get(target)?;
        let mut hop = self.depths.get_key_value(target).map(|(id, _)| *id)?;
        while current != self.start {
            hop = current;
            current = *self.parents.get(current)?;
        }
        Some(hop)
    }
}

struct Route<'a> {
    interior: &'a Territory,
    border: &'a Territory,
    distance: usize,
    first_hop: &'a TerritoryId,
}

impl Route<'_> {
    fn rank(&self) -> (u32, usize, &TerritoryId, &TerritoryId) {
        (
            self.border.garrison,
            self.distance,
            &self.border.id,
            &self.interior.id,
        )
    }
}

/// Owned territories with surplus armies and no enemy neighbor.
pub fn interior_territories<'a>(
    map: &'a TerritoryMap,
    faction: &'a FactionId,
    threshold: u32,
) -> impl Iterator<Item = &'a Territory> {
    map.owned_by(faction).filter(move |territory| {
        territory.garrison > threshold && !map.has_enemy_neighbor(territory, faction)
    })
}

/// Owned territories touching at least one enemy-held neighbor.
pub fn border_territories<'a>(
    map: &'a TerritoryMap,
    faction: &'a FactionId,
) -> impl Iterator<Item = &'a Territory> {
    map.owned_by(faction)
        .filter(move |territory| map.has_enemy_neighbor(territory, faction))
}

/// Move order toward the weakest reachable border, or `None`.
///
/// Pairs are ranked by border garrison, then path length, then border id,
/// then interior id. The order only covers the first hop of the path.
#[must_use]
pub fn find_best_move(ctx: &PlanningContext<'_>) -> Option<Decision> {
    let map = ctx.territories;
    let faction = ctx.faction;
    let threshold = ctx.config.consolidation.interior_threshold;

    let interiors: Vec<&Territory> = interior_territories(map, faction, threshold).collect();
    let borders: Vec<&Territory> = border_territories(map, faction).collect();
    if interiors.is_empty() || borders.is_empty() {
        return None;
    }

    let mut best: Option<Route<'_>> = None;
    for interior in interiors {
        let search = OwnedSearch::run(map, faction, interior);
        for &border in &borders {
            let Some(distance) = search.distance(&border.id) else {
                continue;
            };
            let Some(first_hop) = search.first_hop(&border.id) else {
                continue;
            };
            let route = Route {
                interior,
                border,
                distance,
                first_hop,
            };
            if best
                .as_ref()
                .is_none_or(|current| route.rank() < current.rank())
            {
                best = Some(route);
            }
        }
    }

    let route = best?;
    let armies = route.interior.garrison.saturating_sub(GARRISON_RESERVE);
    if armies == 0 {
        return None;
    }
    debug!(
        "{LOG_MOVE_SELECTED} | {faction} {} -> {} toward {} x{armies}",
        route.interior.id, route.first_hop, route.border.id
    );
    Some(Decision::movement(
        route.interior.id.clone(),
        route.first_hop.clone(),
        armies,
        format!(
            "consolidate toward weakest border {} (garrison {}, {} hop{})",
            route.border.id,
            route.border.garrison,
            route.distance,
            if route.distance == 1 { "" } else { "s" }
        ),
    ))
}
