mod logic;
mod scenario;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{LogicTester, ScenarioResult};
use scenario::{expand_scenarios, get_scenario, list_scenarios, load_map};
use util::{resolve_personalities, resolve_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "warfront-tester", version)]
#[command(about = "Seeded self-play and invariant checks for the Warfront AI")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "duel")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Maximum turns per match
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Personalities assigned to factions in id order (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    personalities: String,

    /// Play a map document from disk instead of the built-in scenarios
    #[arg(long)]
    map: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seeds(&split_csv(&args.seeds))?;
    let personalities = resolve_personalities(&split_csv(&args.personalities))?;
    let tester = LogicTester::new(args.turns, personalities, args.verbose);

    let results = run_matches(&args, &tester, &seeds)?;
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:12} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "⚔️  Warfront Self-Play Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn run_matches(args: &Args, tester: &LogicTester, seeds: &[u64]) -> Result<Vec<ScenarioResult>> {
    if let Some(path) = &args.map {
        let label = path
            .file_stem()
            .map_or_else(|| "map".to_string(), |s| s.to_string_lossy().into_owned());
        // fail fast on an unreadable map rather than once per seed
        load_map(path)?;
        return Ok(tester.run_scenario(&label, || load_map(path), seeds));
    }

    let mut results = Vec::new();
    for name in expand_scenarios(&split_csv(&args.scenarios)) {
        let Some(scenario) = get_scenario(&name) else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
            continue;
        };
        println!("{} {}", "🧠 Running".bright_yellow().bold(), scenario.key);
        results.extend(tester.run_scenario(scenario.key, || scenario.build(), seeds));
    }
    if results.is_empty() {
        bail!("no scenarios matched '{}'", args.scenarios);
    }
    Ok(results)
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, results)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                results,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
