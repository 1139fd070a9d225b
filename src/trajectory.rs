use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::SimulationConfig;
use crate::error::ValidationError;

/// How a trajectory stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Dropped below the ruin threshold on `step` (1-based). Later steps were not simulated.
    Ruined { step: u64 },
    /// Ran the full step budget without ruin.
    Exhausted,
}

/// Terminal state of one simulated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryOutcome {
    pub termination: Termination,
    /// Value at the point of stopping.
    pub final_value: f64,
    /// Lowest value seen, start value included.
    pub min_value: f64,
    /// Largest peak-to-trough decline seen over the simulated prefix.
    pub drawdown: f64,
    pub steps_taken: u64,
}

impl TrajectoryOutcome {
    pub fn is_ruined(&self) -> bool {
        matches!(self.termination, Termination::Ruined { .. })
    }
}

/// A single bankroll path driven by i.i.d. N(mu, sigma) increments.
///
/// The step distribution is built once and reused for every trial of a run.
#[derive(Debug, Clone, Copy)]
pub struct Trajectory {
    step: Normal<f64>,
    step_count: u64,
    start_value: f64,
    ruin_threshold: f64,
}

impl Trajectory {
    pub fn new(config: &SimulationConfig) -> Result<Self, ValidationError> {
        let step = Normal::new(config.mu, config.sigma)
            .map_err(|_| ValidationError::NegativeSigma { sigma: config.sigma })?;
        Ok(Trajectory {
            step,
            step_count: config.step_count,
            start_value: config.start_value,
            ruin_threshold: config.ruin_threshold,
        })
    }

    /// Walk one path until ruin or until the step budget is spent.
    ///
    /// Exactly one draw is taken from `rng` per simulated step, so a ruined
    /// path consumes fewer draws than a surviving one.
    pub fn simulate(&self, rng: &mut impl Rng) -> TrajectoryOutcome {
        let mut current = self.start_value;
        let mut peak = self.start_value;
        let mut min = self.start_value;
        let mut drawdown = 0.0_f64;

        for step in 1..=self.step_count {
            current += self.step.sample(rng);
            peak = peak.max(current);
            drawdown = drawdown.max(peak - current);
            min = min.min(current);

            if current < self.ruin_threshold {
                return TrajectoryOutcome {
                    termination: Termination::Ruined { step },
                    final_value: current,
                    min_value: min,
                    drawdown,
                    steps_taken: step,
                };
            }
        }

        TrajectoryOutcome {
            termination: Termination::Exhausted,
            final_value: current,
            min_value: min,
            drawdown,
            steps_taken: self.step_count,
        }
    }
}
