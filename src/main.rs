//! Command-line driver: build a config, run it, print the report.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankroll::analysis::{self, DEFAULT_BINS};
use bankroll::config::{Seed, SimulationConfig};
use bankroll::simulation::{self, Statistics};
use bankroll::{prompt, report};

/// Seed used as the sweep base when the config asks for entropy.
const FALLBACK_SWEEP_SEED: u64 = 42;

/// Upper bound on `--runs`.
const MAX_RUNS: u64 = 1_000_000;

/// Monte Carlo estimate of bankroll ruin under Gaussian per-step shocks.
#[derive(Parser)]
#[command(name = "bankroll", version, about, long_about = None)]
struct Cli {
    /// JSON config file; individual flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ask for every parameter on stdin
    #[arg(short, long, conflicts_with = "config")]
    interactive: bool,

    /// Mean change per step
    #[arg(long, allow_negative_numbers = true)]
    mu: Option<f64>,

    /// Standard deviation per step
    #[arg(long, allow_negative_numbers = true)]
    sigma: Option<f64>,

    /// Steps per trajectory
    #[arg(long)]
    steps: Option<u64>,

    /// Starting bankroll
    #[arg(long, allow_negative_numbers = true)]
    start: Option<f64>,

    /// Number of trajectories
    #[arg(long)]
    trials: Option<u64>,

    /// Ruin when the bankroll drops below this
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Fixed seed for a reproducible run
    #[arg(long, conflicts_with = "no_seed")]
    seed: Option<u64>,

    /// Seed from OS entropy instead
    #[arg(long)]
    no_seed: bool,

    /// Run N times with consecutive seeds and summarise across runs
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_RUNS))]
    runs: Option<u64>,

    /// Histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,

    /// Write the statistics record (or all sweep records) as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Suppress the text report
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn build_config(&self) -> Result<SimulationConfig> {
        let mut config = if self.interactive {
            let stdin = io::stdin();
            prompt::collect(&mut stdin.lock(), &mut io::stdout())
                .context("failed to read configuration")?
        } else if let Some(path) = &self.config {
            SimulationConfig::from_json_file(path)?
        } else {
            SimulationConfig::canonical()
        };

        if let Some(mu) = self.mu {
            config.mu = mu;
        }
        if let Some(sigma) = self.sigma {
            config.sigma = sigma;
        }
        if let Some(steps) = self.steps {
            config.step_count = steps;
        }
        if let Some(start) = self.start {
            config.start_value = start;
        }
        if let Some(trials) = self.trials {
            config.trial_count = trials;
        }
        if let Some(threshold) = self.threshold {
            config.ruin_threshold = threshold;
        }
        if let Some(seed) = self.seed {
            config.seed = Seed::Fixed(seed);
        }
        if self.no_seed {
            config.seed = Seed::Entropy;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.build_config()?;
    config.validate().context("invalid configuration")?;

    match cli.runs {
        Some(n) => run_sweep(&cli, config, n),
        None => run_once(&cli, &config),
    }
}

fn run_once(cli: &Cli, config: &SimulationConfig) -> Result<()> {
    let stats = simulation::run(config)?;
    info!(trials = stats.trial_count, ruined = stats.ruined_count, "simulation finished");

    if let Some(path) = &cli.json {
        write_json(path, &stats)?;
    }
    if !cli.quiet {
        print!("{}", report::render(&stats, cli.bins));
    }
    Ok(())
}

fn run_sweep(cli: &Cli, base: SimulationConfig, n: u64) -> Result<()> {
    let start_seed = match base.seed {
        Seed::Fixed(s) => s,
        Seed::Entropy => {
            warn!(seed = FALLBACK_SWEEP_SEED, "sweeps need fixed seeds; using fallback base seed");
            FALLBACK_SWEEP_SEED
        }
    };

    let mut all_stats: Vec<Statistics> = Vec::new();
    for i in 0..n {
        let seed = start_seed.wrapping_add(i);
        let config = SimulationConfig { seed: Seed::Fixed(seed), ..base.clone() };
        let stats = simulation::run(&config)?;
        info!(seed, ruined = stats.ruined_count, "run finished");
        all_stats.push(stats);
    }

    if let Some(path) = &cli.json {
        write_json(path, &all_stats)?;
    }

    let dist = analysis::analyse_runs(&all_stats);
    if dist.is_none() {
        warn!("distribution requires >= 2 runs");
    }
    if !cli.quiet {
        print!("{}", report::render_sweep(&all_stats, start_seed, dist.as_ref()));
    }
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "statistics written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use bankroll::error::ValidationError;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bankroll").chain(args.iter().copied()))
    }

    #[test]
    fn runs_beyond_limit_rejected_at_parse() {
        assert!(parse(&["--runs", "18446744073709551615"]).is_err());
        assert!(parse(&["--runs", "1000001"]).is_err());
        assert!(parse(&["--runs", "0"]).is_err());
        assert_eq!(parse(&["--runs", "1000000"]).unwrap().runs, Some(MAX_RUNS));
    }

    #[test]
    fn small_sweep_completes() {
        let cli = parse(&["--runs", "3", "--trials", "4", "--steps", "5", "-q"]).unwrap();
        let config = cli.build_config().unwrap();
        run_sweep(&cli, config, 3).unwrap();
    }

    #[test]
    fn negative_flags_reach_validation() {
        let cases: [(&[&str], ValidationError); 3] = [
            (&["--sigma", "-1"], ValidationError::NegativeSigma { sigma: -1.0 }),
            (&["--start", "-5"], ValidationError::NonPositiveStart { start_value: -5.0 }),
            (&["--threshold", "-1"], ValidationError::NegativeThreshold { ruin_threshold: -1.0 }),
        ];
        for (args, expected) in cases {
            let cli = parse(args).unwrap_or_else(|e| panic!("{args:?} rejected by parser: {e}"));
            let config = cli.build_config().unwrap();
            assert_eq!(config.validate(), Err(expected), "{args:?}");
        }
    }

    #[test]
    fn negative_mu_is_valid() {
        let config = parse(&["--mu", "-0.5"]).unwrap().build_config().unwrap();
        assert_eq!(config.mu, -0.5);
        assert_eq!(config.validate(), Ok(()));
    }
}
