mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{ScenarioCtx, expand_scenarios, get_scenario, list_scenarios};
use common::split_csv;
use logic::{FileLoader, LogicTester, ScenarioResult, resolve_seed_inputs};
use mars_objectives::{Registry, SelectionConfig};

#[derive(Debug, Parser)]
#[command(name = "mars-objectives-tester", version = "0.1.0")]
#[command(about = "Automated QA testing for the milestone and award selection engine")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x-prefixed hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

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

    /// Base selection configuration (JSON) that scenarios start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog JSON replacing the built-in milestones and awards
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Synergy table JSON replacing the built-in weights
    #[arg(long)]
    synergies: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let base = load_base_config(&args)?;
    let registry = Registry::load(&FileLoader::new(args.catalog.clone(), args.synergies.clone()))
        .context("failed to load selection data")?;
    debug!(
        "registry holds {} partitions and {} synergy pairs",
        registry.catalog().partitions().len(),
        registry.synergies().len()
    );

    let scenarios = expand_scenarios(split_csv(&args.scenarios));
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    info!(
        "running {} scenario(s) over {} seed(s), {} iteration(s) each",
        scenarios.len(),
        seeds.len(),
        args.iterations
    );

    let ctx = ScenarioCtx {
        registry: &registry,
        base: &base,
        verbose: args.verbose,
    };
    let results = run_scenarios(&args, ctx, &scenarios, &seeds);

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
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🪐 Mars Objectives Automated Tester".bright_cyan().bold());
    println!("{}", "===================================".cyan());
}

fn load_base_config(args: &Args) -> Result<SelectionConfig> {
    let Some(path) = &args.config else {
        return Ok(SelectionConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SelectionConfig::from_json(&json)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn run_scenarios(
    args: &Args,
    ctx: ScenarioCtx<'_>,
    scenarios: &[String],
    seeds: &[u64],
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Selection Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(ctx);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(tester.run_scenario(scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Mars Objectives Selection Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    if args.report != "json" {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "mars-objectives-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn base_args() -> Args {
        Args {
            scenarios: "determinism".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
            config: None,
            catalog: None,
            synergies: None,
        }
    }

    #[test]
    fn base_config_defaults_without_file() {
        assert_eq!(
            load_base_config(&base_args()).unwrap(),
            SelectionConfig::default()
        );
    }

    #[test]
    fn base_config_reads_json_file() {
        let path = temp_path("config");
        fs::write(&path, r#"{"board":"hellas","expansions":["venus"]}"#).unwrap();
        let args = Args {
            config: Some(path),
            ..base_args()
        };
        let config = load_base_config(&args).unwrap();
        assert_eq!(config.board, mars_objectives::Board::Hellas);
        assert_eq!(config.target_count(), 6);
    }

    #[test]
    fn reports_are_written_to_the_output_file() {
        let path = temp_path("report");
        let args = Args {
            output: Some(path.clone()),
            report: "markdown".to_string(),
            ..base_args()
        };
        let base = SelectionConfig::default();
        let ctx = ScenarioCtx {
            registry: Registry::standard(),
            base: &base,
            verbose: false,
        };
        let results = run_scenarios(&args, ctx, &["determinism".to_string()], &[1]);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);

        write_reports(&args, &results, Instant::now()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Seed Determinism"));
        assert!(content.contains("Total time"));
    }
}
