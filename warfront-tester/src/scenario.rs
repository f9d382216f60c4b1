use anyhow::{Context, Result};
use std::path::Path;
use warfront_ai::{MemoryStore, Region, RegionCatalog, Territory, TerritoryMap};

/// A named starting map for self-play.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    build: fn() -> Result<MemoryStore>,
}

impl Scenario {
    /// Fresh store holding the scenario's opening position.
    pub fn build(&self) -> Result<MemoryStore> {
        (self.build)().with_context(|| format!("building scenario {}", self.key))
    }
}

const CATALOG: &[Scenario] = &[
    Scenario {
        key: "duel",
        description: "Two factions on a six-territory line",
        build: duel,
    },
    Scenario {
        key: "continents",
        description: "Three factions on bridged continents with region bonuses",
        build: continents,
    },
    Scenario {
        key: "frontier",
        description: "Ring with unclaimed land, contested claims, and volatile ground",
        build: frontier,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description))
}

pub fn get_scenario(key: &str) -> Option<Scenario> {
    CATALOG
        .iter()
        .find(|s| s.key.eq_ignore_ascii_case(key))
        .copied()
}

/// Expand `all` and keep first-seen order.
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if name.eq_ignore_ascii_case("all") {
            for (key, _) in list_scenarios() {
                if !out.iter().any(|n| n == key) {
                    out.push(key.to_string());
                }
            }
        } else if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

/// Load a map document from disk.
pub fn load_map(path: &Path) -> Result<MemoryStore> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    MemoryStore::from_json(&json).with_context(|| format!("invalid map {}", path.display()))
}

fn duel() -> Result<MemoryStore> {
    let map = TerritoryMap::new(vec![
        Territory::new("w1")
            .with_controller("red")
            .with_neighbors(&["w2"])
            .with_garrison(4)
            .with_strategic_value(2.0),
        Territory::new("w2")
            .with_controller("red")
            .with_neighbors(&["w1", "w3"])
            .with_garrison(3),
        Territory::new("w3")
            .with_controller("red")
            .with_neighbors(&["w2", "e1"])
            .with_garrison(3),
        Territory::new("e1")
            .with_controller("blue")
            .with_neighbors(&["w3", "e2"])
            .with_garrison(3),
        Territory::new("e2")
            .with_controller("blue")
            .with_neighbors(&["e1", "e3"])
            .with_garrison(3),
        Territory::new("e3")
            .with_controller("blue")
            .with_neighbors(&["e2"])
            .with_garrison(4)
            .with_strategic_value(2.0),
    ])?;
    let regions = RegionCatalog(vec![
        Region::new("West", &["w1", "w2", "w3"]),
        Region::new("East", &["e1", "e2", "e3"]),
    ]);
    Ok(MemoryStore::new(map, regions)?)
}

fn continents() -> Result<MemoryStore> {
    let map = TerritoryMap::new(vec![
        // Norland
        Territory::new("n-capital")
            .with_controller("red")
            .with_neighbors(&["n-hills", "n-coast"])
            .with_garrison(6)
            .with_strategic_value(3.0)
            .with_production_bonus(2.0),
        Territory::new("n-hills")
            .with_controller("red")
            .with_neighbors(&["n-capital", "n-port"])
            .with_garrison(2),
        Territory::new("n-coast")
            .with_controller("red")
            .with_neighbors(&["n-capital", "n-port"])
            .with_garrison(2),
        Territory::new("n-port")
            .with_controller("red")
            .with_neighbors(&["n-hills", "n-coast", "s-port", "e-port"])
            .with_garrison(3),
        // Southmark
        Territory::new("s-capital")
            .with_controller("blue")
            .with_neighbors(&["s-plains", "s-marsh"])
            .with_garrison(6)
            .with_strategic_value(3.0)
            .with_production_bonus(2.0),
        Territory::new("s-plains")
            .with_controller("blue")
            .with_neighbors(&["s-capital", "s-port"])
            .with_garrison(2)
            .with_production_bonus(1.0),
        Territory::new("s-marsh")
            .with_controller("blue")
            .with_neighbors(&["s-capital", "s-port"])
            .with_garrison(2)
            .with_conflict_risk(2.0),
        Territory::new("s-port")
            .with_controller("blue")
            .with_neighbors(&["s-plains", "s-marsh", "n-port", "e-port"])
            .with_garrison(3),
        // Eastreach
        Territory::new("e-capital")
            .with_controller("green")
            .with_neighbors(&["e-steppe", "e-wood"])
            .with_garrison(6)
            .with_strategic_value(3.0)
            .with_production_bonus(2.0),
        Territory::new("e-steppe")
            .with_controller("green")
            .with_neighbors(&["e-capital", "e-port"])
            .with_garrison(2),
        Territory::new("e-wood")
            .with_controller("green")
            .with_neighbors(&["e-capital", "e-port"])
            .with_garrison(2),
        Territory::new("e-port")
            .with_controller("green")
            .with_neighbors(&["e-steppe", "e-wood", "n-port", "s-port"])
            .with_garrison(3),
    ])?;
    let regions = RegionCatalog(vec![
        Region::new("Norland", &["n-capital", "n-hills", "n-coast", "n-port"]),
        Region::new("Southmark", &["s-capital", "s-plains", "s-marsh", "s-port"]),
        Region::new("Eastreach", &["e-capital", "e-steppe", "e-wood", "e-port"]),
    ]);
    Ok(MemoryStore::new(map, regions)?)
}

fn frontier() -> Result<MemoryStore> {
    const RING: [&str; 10] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9"];
    const OWNERS: [Option<&str>; 10] = [
        Some("red"),
        Some("red"),
        None,
        Some("blue"),
        Some("blue"),
        None,
        Some("green"),
        Some("green"),
        None,
        None,
    ];
    const CLAIMS: &[(&str, &str)] = &[("r2", "red"), ("r2", "blue"), ("r7", "blue")];

    let territories = RING.iter().enumerate().map(|(i, id)| {
        let prev = RING[(i + RING.len() - 1) % RING.len()];
        let next = RING[(i + 1) % RING.len()];
        let owner = OWNERS[i];
        let mut territory = Territory::new(id)
            .with_neighbors(&[prev, next])
            .with_garrison(if owner.is_some() { 5 } else { 2 })
            .with_strategic_value(if i % 3 == 0 { 2.0 } else { 0.5 })
            .with_conflict_risk(if owner.is_none() { 3.0 } else { 0.0 });
        if let Some(owner) = owner {
            territory = territory.with_controller(owner);
        }
        for (claimed, claimant) in CLAIMS {
            if claimed == id {
                territory = territory.contested_by(claimant);
            }
        }
        territory
    });
    let map = TerritoryMap::new(territories)?;
    let regions = RegionCatalog(vec![
        Region::new("Crossing", &["r1", "r2", "r3"]),
        Region::new("Barrens", &["r8", "r9"]),
    ]);
    Ok(MemoryStore::new(map, regions)?)
}
