pub mod reports;
pub mod resolver;
pub mod simulation;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;
use warfront_ai::{EngineConfig, MemoryStore, Personality};

use simulation::{MatchReport, SimulationConfig, SimulationSession};

/// One scenario played on one seed, twice for the determinism check.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub report: MatchReport,
    pub duration: Duration,
    pub failures: Vec<String>,
}

/// Runs self-play matches and judges them.
pub struct LogicTester {
    engine_config: EngineConfig,
    turns: u32,
    personalities: Vec<Personality>,
    verbose: bool,
}

impl LogicTester {
    #[must_use]
    pub fn new(turns: u32, personalities: Vec<Personality>, verbose: bool) -> Self {
        Self {
            engine_config: EngineConfig::default(),
            turns,
            personalities,
            verbose,
        }
    }

    /// Play `build`'s map once per seed.
    pub fn run_scenario<F>(&self, name: &str, build: F, seeds: &[u64]) -> Vec<ScenarioResult>
    where
        F: Fn() -> Result<MemoryStore>,
    {
        seeds
            .iter()
            .map(|&seed| match self.run_seed(&build, seed) {
                Ok((report, duration, failures)) => {
                    let passed = failures.is_empty();
                    if self.verbose {
                        let status = if passed { "✅".green() } else { "❌".red() };
                        println!(
                            "{status} {name} seed {seed}: {} turn(s), digest {:016x}",
                            report.turns_played, report.digest
                        );
                    }
                    ScenarioResult {
                        scenario_name: name.to_string(),
                        seed,
                        passed,
                        report,
                        duration,
                        failures,
                    }
                }
                Err(err) => ScenarioResult {
                    scenario_name: name.to_string(),
                    seed,
                    passed: false,
                    report: MatchReport::empty(),
                    duration: Duration::ZERO,
                    failures: vec![format!("{err:#}")],
                },
            })
            .collect()
    }

    fn run_seed<F>(&self, build: &F, seed: u64) -> Result<(MatchReport, Duration, Vec<String>)>
    where
        F: Fn() -> Result<MemoryStore>,
    {
        let config =
            SimulationConfig::new(seed, self.personalities.clone()).with_max_turns(self.turns);

        let session = SimulationSession::new(build()?, self.engine_config.clone(), config.clone())?;
        if self.verbose {
            for (faction, personality) in session.roster() {
                println!("   {} plays {}", faction.to_string().bold(), personality);
            }
        }
        let (report, duration) = session.run()?;

        let replay = SimulationSession::new(build()?, self.engine_config.clone(), config)?;
        let (again, _) = replay.run()?;

        let mut failures = report.violations.clone();
        if again.digest != report.digest {
            failures.push(format!(
                "replay diverged: digest {:016x} vs {:016x}",
                report.digest, again.digest
            ));
        }
        Ok((report, duration, failures))
    }
}
