use thiserror::Error;

/// A configuration invariant was violated. Raised before any trial runs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("step_count must be > 0")]
    ZeroSteps,

    #[error("trial_count must be > 0")]
    ZeroTrials,

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("sigma must be >= 0, got {sigma}")]
    NegativeSigma { sigma: f64 },

    #[error("start_value must be > 0, got {start_value}")]
    NonPositiveStart { start_value: f64 },

    #[error("ruin_threshold must be >= 0, got {ruin_threshold}")]
    NegativeThreshold { ruin_threshold: f64 },

    #[error("start_value ({start_value}) must be above ruin_threshold ({ruin_threshold})")]
    ThresholdNotBelowStart { start_value: f64, ruin_threshold: f64 },
}

impl ValidationError {
    /// Name of the configuration field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::ZeroSteps => "step_count",
            Self::ZeroTrials => "trial_count",
            Self::NonFinite { field, .. } => *field,
            Self::NegativeSigma { .. } => "sigma",
            Self::NonPositiveStart { .. } => "start_value",
            Self::NegativeThreshold { .. } | Self::ThresholdNotBelowStart { .. } => {
                "ruin_threshold"
            }
        }
    }
}

/// A config file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
