use std::path::PathBuf;

use clap::Parser;

use sixtysix_bench::config::{ResolvedOutputs, SimulationConfig};
use sixtysix_bench::logging::init_logging;
use sixtysix_bench::runner::SimulationRunner;

/// Batch bot-vs-bot Sixty-Six simulations.
#[derive(Debug, Parser)]
#[command(
    name = "sixtysix-bench",
    author,
    version,
    about = "Deterministic Sixty-Six match simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of matches to play.
    #[arg(long, value_name = "MATCHES")]
    matches: Option<usize>,

    /// Override the master seed the per-match seeds are drawn from.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(matches) = cli.matches {
        config.matches.count = matches;
    }
    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }
    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let count = config.matches.count;
    println!(
        "Loaded configuration '{run_id}': {} vs {} over {count} match{}",
        config.agents[0].name,
        config.agents[1].name,
        if count == 1 { "" } else { "es" }
    );

    let _telemetry = init_logging(&config, &outputs)?;
    let runner = SimulationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} matches, {} rows at {}",
        summary.matches_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for (name, wins) in summary.agent_names.iter().zip(summary.wins) {
        println!(
            "  {name}: {wins} wins ({:.1}%)",
            wins as f64 * 100.0 / summary.matches_played as f64
        );
    }
    println!("  Avg rounds/match: {:.2}", summary.average_rounds);
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
