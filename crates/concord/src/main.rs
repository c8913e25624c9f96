use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

use concord::build::{Builder, ToolchainBuilder};
use concord::cases::{CaseFilter, discover_cases, select};
use concord::catalog::{PrecisionMode, VariantCatalog};
use concord::config::HarnessConfig;
use concord::error::HarnessError;
use concord::orchestrator::Orchestrator;

#[derive(Parser, Debug)]
#[command(name = "concord")]
#[command(about = "Cross-check independently built program variants against each other")]
struct Args {
    /// Verbosity level (once echoes commands, twice also echoes their
    /// captured output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run only these cases (repeatable; names matching nothing are
    /// silently ignored)
    #[arg(short, long = "case", value_name = "NAME")]
    case: Vec<String>,

    /// Restrict the run to one precision mode (default: both)
    #[arg(long, value_enum)]
    precision: Option<PrecisionMode>,

    /// Path to the config file (default: concord.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the cases directory
    #[arg(long)]
    cases_dir: Option<PathBuf>,

    /// Override the number of repetitions per case
    #[arg(long)]
    repetitions: Option<u32>,

    /// List the selected cases without building or running anything
    #[arg(long)]
    list: bool,

    /// Emit the final report as JSON instead of the colored summary
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), HarnessError> {
    let mut config = HarnessConfig::load_or_default(args.config.as_deref())?;
    config.verbosity = args.verbose;
    if let Some(dir) = args.cases_dir {
        config.cases_dir = dir;
    }
    if let Some(repetitions) = args.repetitions {
        config.repetitions = repetitions;
    }

    let catalog = VariantCatalog::from_declared(config.variants.clone())?;

    let filter = CaseFilter {
        names: if args.case.is_empty() {
            None
        } else {
            Some(args.case)
        },
        precision: args.precision,
    };
    let cases = discover_cases(&config.cases_dir, &config.extended_marker)?;
    let cases = select(cases, &filter);

    if args.list {
        for case in &cases {
            println!("{} ({:?})", case.name, case.precision);
        }
        println!("\nTotal: {} case(s)", cases.len());
        return Ok(());
    }

    if !args.json {
        println!("{}", "Concord cross-variant harness".bold().cyan());
        println!("Cases directory: {}", config.cases_dir.display());
        println!(
            "Selected {} case(s), {} repetition(s) each\n",
            cases.len(),
            config.repetitions
        );
    }

    let builder = ToolchainBuilder::new(&config);
    let artifacts = builder.build_all(&catalog)?;
    if config.verbosity >= 1 {
        println!();
    }

    let orchestrator = Orchestrator::new(&config, &catalog, &artifacts);
    let report = orchestrator.run(&cases)?;

    if args.json {
        let json = report
            .to_json()
            .map_err(|e| HarnessError::Config(format!("failed to serialize report: {}", e)))?;
        println!("{}", json);
    } else {
        report.print_summary();
    }

    Ok(())
}
