use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = (passed as f64 / results.len() as f64) * 100.0;
    rate
}

fn winner_label(result: &ScenarioResult) -> String {
    result
        .report
        .winner
        .clone()
        .unwrap_or_else(|| "none".to_string())
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Self-Play Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total matches: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        let report = &result.report;
        writeln!(
            out,
            "{status} {} (seed {})",
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Turns: {}  Winner: {}  Digest: {:016x}",
            report.turns_played,
            winner_label(result),
            report.digest
        )?;
        writeln!(
            out,
            "   Reinforced {}  Attacks {} ({} captured)  Moves {}  Skipped {}",
            report.totals.reinforcements,
            report.totals.attacks,
            report.totals.captures,
            report.totals.moves,
            report.totals.skipped
        )?;
        for faction in &report.factions {
            writeln!(
                out,
                "   • {} [{}]: {} territories, {} armies",
                faction.faction, faction.personality, faction.territories, faction.armies
            )?;
        }
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let (Some(fastest), Some(slowest)) = (
        results.iter().min_by_key(|r| r.duration),
        results.iter().max_by_key(|r| r.duration),
    ) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} seed {} ({:?})",
            fastest.scenario_name.green(),
            fastest.seed,
            fastest.duration
        )?;
        writeln!(
            out,
            "Slowest: {} seed {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.seed,
            slowest.duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    writeln!(out, "# Warfront Self-Play Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total matches**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Matches\n")?;
    writeln!(out, "| Scenario | Seed | Turns | Winner | Attacks | Captures | Digest |")?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {status} {} | {} | {} | {} | {} | {} | `{:016x}` |",
            result.scenario_name,
            result.seed,
            result.report.turns_played,
            winner_label(result),
            result.report.totals.attacks,
            result.report.totals.captures,
            result.report.digest
        )?;
    }

    let failing: Vec<&ScenarioResult> = results.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failing {
            writeln!(out, "### {} (seed {})\n", result.scenario_name, result.seed)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::MatchReport;

    fn sample(name: &str, passed: bool) -> ScenarioResult {
        let mut report = MatchReport::empty();
        report.turns_played = 4;
        report.winner = Some("red".to_string());
        report.digest = 0xABCD;
        ScenarioResult {
            scenario_name: name.to_string(),
            seed: 9,
            passed,
            report,
            duration: Duration::from_millis(3),
            failures: if passed {
                vec![]
            } else {
                vec!["red: 4 attacks".to_string()]
            },
        }
    }

    #[test]
    fn markdown_lists_matches_and_failures() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[sample("duel", true), sample("frontier", false)])
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("| ✅ duel | 9 | 4 | red |"));
        assert!(text.contains("## Failures"));
        assert!(text.contains("- red: 4 attacks"));
        assert!(text.contains("000000000000abcd"));
    }

    #[test]
    fn json_report_is_an_array() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &[sample("duel", true)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["scenario_name"], "duel");
        assert_eq!(value[0]["report"]["winner"], "red");
    }

    #[test]
    fn console_report_names_every_match() {
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &[sample("duel", true)], Duration::from_secs(1))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total matches: 1"));
        assert!(text.contains("duel"));
    }
}
