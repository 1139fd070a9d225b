use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};

/// Where the run's random stream comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Seed {
    /// Reproducible: the whole run replays identically for the same value.
    Fixed(u64),
    /// Fresh OS-backed entropy on every run.
    #[default]
    Entropy,
}

impl From<Option<u64>> for Seed {
    fn from(value: Option<u64>) -> Self {
        match value {
            Some(s) => Seed::Fixed(s),
            None => Seed::Entropy,
        }
    }
}

impl From<Seed> for Option<u64> {
    fn from(seed: Seed) -> Self {
        match seed {
            Seed::Fixed(s) => Some(s),
            Seed::Entropy => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Mean per-step change.
    pub mu: f64,
    /// Per-step standard deviation.
    pub sigma: f64,
    /// Steps per trajectory.
    pub step_count: u64,
    pub start_value: f64,
    /// Number of independent trajectories.
    pub trial_count: u64,
    /// A trajectory is ruined as soon as its value drops strictly below this.
    pub ruin_threshold: f64,
    #[serde(default)]
    pub seed: Seed,
}

impl SimulationConfig {
    pub fn canonical() -> Self {
        SimulationConfig {
            mu: 0.0,
            sigma: 1.0,
            step_count: 1_000,
            start_value: 100.0,
            trial_count: 10_000,
            ruin_threshold: 0.0,
            seed: Seed::Fixed(42),
        }
    }

    /// Read a config from a JSON file. The result is not validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Json { path: path.display().to_string(), source })
    }

    /// Check every invariant. The first violation found is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.step_count == 0 {
            return Err(ValidationError::ZeroSteps);
        }
        if self.trial_count == 0 {
            return Err(ValidationError::ZeroTrials);
        }
        for (field, value) in [
            ("mu", self.mu),
            ("sigma", self.sigma),
            ("start_value", self.start_value),
            ("ruin_threshold", self.ruin_threshold),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field, value });
            }
        }
        if self.sigma < 0.0 {
            return Err(ValidationError::NegativeSigma { sigma: self.sigma });
        }
        if self.start_value <= 0.0 {
            return Err(ValidationError::NonPositiveStart { start_value: self.start_value });
        }
        if self.ruin_threshold < 0.0 {
            return Err(ValidationError::NegativeThreshold { ruin_threshold: self.ruin_threshold });
        }
        if self.start_value <= self.ruin_threshold {
            return Err(ValidationError::ThresholdNotBelowStart {
                start_value: self.start_value,
                ruin_threshold: self.ruin_threshold,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_valid() {
        assert_eq!(SimulationConfig::canonical().validate(), Ok(()));
    }

    #[test]
    fn zero_steps_rejected() {
        let config = SimulationConfig { step_count: 0, ..SimulationConfig::canonical() };
        assert_eq!(config.validate(), Err(ValidationError::ZeroSteps));
    }

    #[test]
    fn zero_trials_rejected() {
        let config = SimulationConfig { trial_count: 0, ..SimulationConfig::canonical() };
        assert_eq!(config.validate(), Err(ValidationError::ZeroTrials));
    }

    #[test]
    fn threshold_equal_to_start_rejected() {
        let config = SimulationConfig {
            start_value: 50.0,
            ruin_threshold: 50.0,
            ..SimulationConfig::canonical()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), "ruin_threshold");
        assert!(matches!(err, ValidationError::ThresholdNotBelowStart { .. }));
    }

    #[test]
    fn negative_values_rejected() {
        let base = SimulationConfig::canonical();
        let sigma = SimulationConfig { sigma: -1.0, ..base.clone() };
        assert_eq!(sigma.validate(), Err(ValidationError::NegativeSigma { sigma: -1.0 }));

        let start = SimulationConfig { start_value: -5.0, ..base.clone() };
        assert_eq!(start.validate().unwrap_err().field(), "start_value");

        let threshold = SimulationConfig { ruin_threshold: -1.0, ..base };
        assert_eq!(
            threshold.validate(),
            Err(ValidationError::NegativeThreshold { ruin_threshold: -1.0 })
        );
    }

    #[test]
    fn non_finite_rejected() {
        let config = SimulationConfig { mu: f64::NAN, ..SimulationConfig::canonical() };
        assert_eq!(config.validate().unwrap_err().field(), "mu");

        let config = SimulationConfig { sigma: f64::INFINITY, ..SimulationConfig::canonical() };
        assert_eq!(config.validate().unwrap_err().field(), "sigma");
    }

    #[test]
    fn zero_sigma_and_zero_threshold_allowed() {
        let config = SimulationConfig {
            sigma: 0.0,
            ruin_threshold: 0.0,
            ..SimulationConfig::canonical()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn json_seed_is_optional() {
        let json = r#"{"mu":0.5,"sigma":2.0,"step_count":10,"start_value":100.0,
                       "trial_count":3,"ruin_threshold":20.0}"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, Seed::Entropy);

        let json = r#"{"mu":0.5,"sigma":2.0,"step_count":10,"start_value":100.0,
                       "trial_count":3,"ruin_threshold":20.0,"seed":7}"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, Seed::Fixed(7));
    }

    #[test]
    fn seed_serializes_as_nullable_integer() {
        let config = SimulationConfig { seed: Seed::Entropy, ..SimulationConfig::canonical() };
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["seed"].is_null());

        let config = SimulationConfig::canonical();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["seed"], 42);
    }
}
