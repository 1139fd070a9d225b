use bankroll::config::{Seed, SimulationConfig};

pub struct Scenario {
    pub mu: f64,
    pub sigma: f64,
    pub step_count: u64,
    pub start_value: f64,
    pub ruin_threshold: f64,
}

/// Drift-free walk far from the threshold: nearly every path runs to the end.
pub const SURVIVING: Scenario = Scenario {
    mu: 0.0,
    sigma: 1.0,
    step_count: 1_000,
    start_value: 1_000.0,
    ruin_threshold: 0.0,
};

/// Negative drift close to the threshold: most paths exit early.
pub const RUINOUS: Scenario = Scenario {
    mu: -0.5,
    sigma: 2.0,
    step_count: 1_000,
    start_value: 30.0,
    ruin_threshold: 10.0,
};

/// Roughly half of all paths are ruined.
pub const MIXED: Scenario = Scenario {
    mu: -0.02,
    sigma: 1.0,
    step_count: 1_000,
    start_value: 40.0,
    ruin_threshold: 0.0,
};

pub fn build_config(scenario: &Scenario, trial_count: u64, seed: u64) -> SimulationConfig {
    SimulationConfig {
        mu: scenario.mu,
        sigma: scenario.sigma,
        step_count: scenario.step_count,
        start_value: scenario.start_value,
        trial_count,
        ruin_threshold: scenario.ruin_threshold,
        seed: Seed::Fixed(seed),
    }
}
