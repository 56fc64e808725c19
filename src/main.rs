//! Command-line runner on the 100-job reference instance.
//!
//! Defaults reproduce the benchmark setup: 10 machines, seed 1843397,
//! temperature 1e8 down to 1 with alpha 0.9999999.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_makespan::{AnnealConfig, AnnealingEngine, CoolingConfig, JobCatalog, MoveMix};

#[derive(Debug, Parser)]
#[command(name = "u-makespan", version, about = "Simulated annealing for P||Cmax")]
struct Cli {
    /// Number of identical machines.
    #[arg(long, default_value_t = 10)]
    machines: usize,

    #[arg(long, default_value_t = 100_000_000.0)]
    start_temp: f64,

    #[arg(long, default_value_t = 1.0)]
    end_temp: f64,

    /// Geometric cooling factor in (0, 1).
    #[arg(long, default_value_t = 0.9999999)]
    alpha: f64,

    #[arg(long, default_value_t = 999_999_999_999_999_999)]
    max_iterations: u64,

    /// Random seed.
    #[arg(long, default_value_t = 1843397)]
    seed: u64,

    /// Seed from the OS instead of `--seed`.
    #[arg(long)]
    random_seed: bool,

    /// Log progress every N iterations (0 disables).
    #[arg(long, default_value_t = 100_000_000)]
    report_interval: u64,

    #[arg(long, default_value_t = 1)]
    relocate_weight: u32,

    #[arg(long, default_value_t = 1)]
    exchange_weight: u32,

    /// Print only the summary, not the machine contents.
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let catalog = Arc::new(JobCatalog::reference());
    let mut config = AnnealConfig::new(cli.machines)
        .with_cooling(CoolingConfig {
            start_temperature: cli.start_temp,
            end_temperature: cli.end_temp,
            alpha: cli.alpha,
            max_iterations: cli.max_iterations,
        })
        .with_move_mix(MoveMix::new(cli.relocate_weight, cli.exchange_weight))
        .with_report_interval(cli.report_interval);
    config.seed = (!cli.random_seed).then_some(cli.seed);

    let engine = AnnealingEngine::new(catalog.clone(), config).context("invalid configuration")?;

    if !cli.quiet {
        println!("Initial solution:\n{}\n", engine.current());
    }
    info!(seed = engine.seed(), "starting simulated annealing");

    let result = engine.run_with_observer(|p| {
        info!(
            iteration = p.iteration,
            temperature = p.temperature,
            best_fitness = p.best_fitness,
            "progress"
        );
    });

    if !cli.quiet {
        println!("Best solution:\n{}\n", result.best);
    }
    let bound = catalog.lower_bound(cli.machines);
    println!("Best solution has a fitness of {}", result.best_fitness);
    println!(
        "Lower bound {bound} (gap {:.4}%)",
        result.best_fitness.saturating_sub(bound) as f64 / bound.max(1) as f64 * 100.0
    );
    println!(
        "{} iterations, {} accepted, {} improving, final temperature {:.6}",
        result.iterations, result.accepted_moves, result.improving_moves, result.final_temperature
    );
    println!("Time taken was {:.3} seconds", started.elapsed().as_secs_f64());
    Ok(())
}
