//! Line-oriented interactive collection of a [`SimulationConfig`].
//!
//! Values are parsed but not range-checked; [`SimulationConfig::validate`]
//! owns the invariants.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::config::{Seed, SimulationConfig};

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("invalid value for {field}: {input:?}")]
    Parse { field: &'static str, input: String },

    #[error("input ended before {field} was given")]
    Eof { field: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Ask for every field in turn on `output`, reading one line each from `input`.
/// A blank seed line selects [`Seed::Entropy`].
pub fn collect<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<SimulationConfig, PromptError> {
    let mu = ask(input, output, "mu", "Mean change per step (mu): ")?;
    let sigma = ask(input, output, "sigma", "Standard deviation per step (sigma): ")?;
    let step_count = ask(input, output, "step_count", "Steps per trajectory: ")?;
    let start_value = ask(input, output, "start_value", "Starting bankroll: ")?;
    let trial_count = ask(input, output, "trial_count", "Number of trajectories: ")?;
    let ruin_threshold = ask(input, output, "ruin_threshold", "Ruin threshold: ")?;

    let line = read_line(input, output, "seed", "Seed (blank for random): ")?;
    let seed = if line.is_empty() {
        Seed::Entropy
    } else {
        Seed::Fixed(parse(&line, "seed")?)
    };

    Ok(SimulationConfig { mu, sigma, step_count, start_value, trial_count, ruin_threshold, seed })
}

fn ask<T: FromStr, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &'static str,
    question: &str,
) -> Result<T, PromptError> {
    let line = read_line(input, output, field, question)?;
    parse(&line, field)
}

fn parse<T: FromStr>(line: &str, field: &'static str) -> Result<T, PromptError> {
    line.parse().map_err(|_| PromptError::Parse { field, input: line.to_string() })
}

/// Trimmed next line of `input`.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &'static str,
    question: &str,
) -> Result<String, PromptError> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Eof { field });
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn session(script: &str) -> (Result<SimulationConfig, PromptError>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = collect(&mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn full_session_with_seed() {
        let (config, transcript) = session("0.5\n2\n100\n1000\n500\n50\n7\n");
        let config = config.unwrap();
        assert_eq!(
            config,
            SimulationConfig {
                mu: 0.5,
                sigma: 2.0,
                step_count: 100,
                start_value: 1000.0,
                trial_count: 500,
                ruin_threshold: 50.0,
                seed: Seed::Fixed(7),
            }
        );
        assert!(transcript.starts_with("Mean change per step (mu): "));
        assert!(transcript.ends_with("Seed (blank for random): "));
    }

    #[test]
    fn blank_seed_is_entropy() {
        let (config, _) = session("0\n1\n10\n100\n5\n0\n\n");
        assert_eq!(config.unwrap().seed, Seed::Entropy);
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        let (config, _) = session("  -1.5 \n1\n10\n100\n5\n0\n  \n");
        assert_eq!(config.unwrap().mu, -1.5);
    }

    #[test]
    fn bad_number_names_field() {
        let (result, _) = session("0\n1\nten\n");
        match result {
            Err(PromptError::Parse { field, input }) => {
                assert_eq!(field, "step_count");
                assert_eq!(input, "ten");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn negative_count_is_parse_error() {
        let (result, _) = session("0\n1\n10\n100\n-5\n");
        assert!(matches!(result, Err(PromptError::Parse { field: "trial_count", .. })));
    }

    #[test]
    fn early_eof_reported() {
        let (result, _) = session("0\n1\n");
        assert!(matches!(result, Err(PromptError::Eof { field: "step_count" })));
    }

    /// Range checks belong to validation, not the prompt.
    #[test]
    fn out_of_range_values_pass_through() {
        let (config, _) = session("0\n-1\n10\n100\n5\n0\n1\n");
        let config = config.unwrap();
        assert_eq!(config.sigma, -1.0);
        assert!(config.validate().is_err());
    }
}
