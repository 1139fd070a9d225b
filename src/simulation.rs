use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{Seed, SimulationConfig};
use crate::error::ValidationError;
use crate::trajectory::{Termination, Trajectory, TrajectoryOutcome};

/// Aggregate results of one Monte Carlo run.
///
/// Survivor-only sums are zero (and `survivor_final_values` empty) when every
/// trial was ruined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub trial_count: u64,
    pub ruined_count: u64,
    /// `final_value` of every surviving trial, in trial order.
    pub survivor_final_values: Vec<f64>,
    pub sum_survivor_final: f64,
    pub sum_survivor_min: f64,
    pub sum_survivor_drawdown: f64,
    /// Drawdown summed over all trials, ruined ones included.
    pub sum_drawdown_all: f64,
    pub max_drawdown_all: f64,
}

impl Statistics {
    fn empty(trial_count: u64) -> Self {
        Self {
            trial_count,
            ruined_count: 0,
            survivor_final_values: Vec::new(),
            sum_survivor_final: 0.0,
            sum_survivor_min: 0.0,
            sum_survivor_drawdown: 0.0,
            sum_drawdown_all: 0.0,
            max_drawdown_all: 0.0,
        }
    }

    pub fn survivor_count(&self) -> u64 {
        self.survivor_final_values.len() as u64
    }

    fn record(&mut self, outcome: &TrajectoryOutcome) {
        if outcome.is_ruined() {
            self.ruined_count += 1;
        } else {
            self.survivor_final_values.push(outcome.final_value);
            self.sum_survivor_final += outcome.final_value;
            self.sum_survivor_min += outcome.min_value;
            self.sum_survivor_drawdown += outcome.drawdown;
        }
        self.sum_drawdown_all += outcome.drawdown;
        self.max_drawdown_all = self.max_drawdown_all.max(outcome.drawdown);
    }
}

/// One validated run. Owns its random source for the whole of `run`.
pub struct Simulation<R: Rng = ChaCha20Rng> {
    config: SimulationConfig,
    trajectory: Trajectory,
    rng: R,
}

impl Simulation<ChaCha20Rng> {
    /// Validate `config` and seed the run's RNG once.
    pub fn from_config(config: SimulationConfig) -> Result<Self, ValidationError> {
        let rng = match config.seed {
            Seed::Fixed(seed) => ChaCha20Rng::seed_from_u64(seed),
            Seed::Entropy => ChaCha20Rng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Validate `config` and drive trials from a caller-supplied source.
    /// `config.seed` is ignored.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, ValidationError> {
        config.validate()?;
        let trajectory = Trajectory::new(&config)?;
        Ok(Simulation { config, trajectory, rng })
    }

    /// Run every trial in order and return the folded totals.
    pub fn run(mut self) -> Statistics {
        let trials = self.config.trial_count;
        debug!(
            trials,
            steps = self.config.step_count,
            mu = self.config.mu,
            sigma = self.config.sigma,
            seed = ?self.config.seed,
            "starting run"
        );

        let mut stats = Statistics::empty(trials);
        for trial in 1..=trials {
            let outcome = self.trajectory.simulate(&mut self.rng);
            if let Termination::Ruined { step } = outcome.termination {
                trace!(trial, step, final_value = outcome.final_value, "trial ruined");
            }
            stats.record(&outcome);
        }

        debug!(
            trials,
            ruined = stats.ruined_count,
            max_drawdown = stats.max_drawdown_all,
            "run complete"
        );
        stats
    }
}

/// Validate `config`, then simulate all of its trials.
pub fn run(config: &SimulationConfig) -> Result<Statistics, ValidationError> {
    Ok(Simulation::from_config(config.clone())?.run())
}

/// As [`run`], drawing from `rng` instead of a source built from `config.seed`.
pub fn run_with_rng<R: Rng>(
    config: &SimulationConfig,
    rng: R,
) -> Result<Statistics, ValidationError> {
    Ok(Simulation::with_rng(config.clone(), rng)?.run())
}
