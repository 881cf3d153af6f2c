//! Graph timing simulator CLI.
//!
//! This binary replays per-core traces through the timing core. It performs:
//! 1. **Run:** Load a configuration and one JSON-lines trace per core, simulate, print statistics.
//! 2. **Config:** Print the default configuration as JSON, as a starting point for edits.
//!
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=graphsim_core=debug`).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use graphsim_core::common::SimError;
use graphsim_core::config::Config;
use graphsim_core::sim::trace::load_trace;
use graphsim_core::sim::Simulator;
use graphsim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "graphsim",
    author,
    version,
    about = "Cycle-level memory timing simulator with graph and stream prefetchers",
    long_about = "Replay per-core JSON-lines traces through the timing core.\n\nExamples:\n  graphsim config > cfg.json\n  graphsim run --config cfg.json --trace core0.jsonl\n  graphsim run --trace core0.jsonl --trace core1.jsonl --stats summary,memory\n  graphsim run --config cfg.json --trace core0.jsonl --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay traces (one per core) and print statistics.
    Run {
        /// JSON configuration file; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Trace file for the next core; repeat once per core.
        #[arg(short, long = "trace", required = true)]
        traces: Vec<PathBuf>,

        /// Statistics sections to print (comma separated); all when omitted.
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,

        /// Print statistics as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            traces,
            stats,
            json,
        } => cmd_run(config.as_deref(), &traces, &stats, json),
        Commands::Config => cmd_config(),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn cmd_run(
    config: Option<&Path>,
    traces: &[PathBuf],
    sections: &[String],
    json: bool,
) -> Result<(), SimError> {
    if let Some(bad) = sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        eprintln!(
            "Unknown stats section '{bad}'; expected one of: {}",
            STATS_SECTIONS.join(", ")
        );
        process::exit(2);
    }

    let mut config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    // One core per trace unless the configuration says otherwise.
    if config.general.num_cores == 1 && traces.len() > 1 {
        config.general.num_cores = traces.len();
    }

    let traces = traces
        .iter()
        .map(|path| load_trace(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut sim = Simulator::new(config)?;
    let stats = sim.run(&traces)?;

    if json {
        println!("{}", stats.to_json());
    } else {
        stats.print_sections(sections);
    }
    Ok(())
}

fn cmd_config() -> Result<(), SimError> {
    let text = serde_json::to_string_pretty(&Config::default()).map_err(|source| {
        SimError::Parse {
            what: "default configuration".to_string(),
            source,
        }
    })?;
    println!("{text}");
    Ok(())
}
