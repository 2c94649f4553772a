//! Solver configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::error::{MdpError, MdpResult};
use gymnasium::Continous;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How a sweep reads and writes the value array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Every state reads the values from before the sweep. Terminal states
    /// bootstrap as 0 and keep a value of 0.
    #[default]
    Synchronous,

    /// In-place sweep that writes 0 into the value of a `done` outcome's next
    /// state before reading it, and floors value-iteration maxima at 0.
    /// Reproduces the classic gridworld trajectory step for step.
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Discount factor, in `[0, 1)`.
    #[serde(default = "default_gamma")]
    pub gamma: Continous,

    /// A sweep whose largest value change is at most `tol` ends the loop.
    /// `0.0` demands an exactly unchanged sweep.
    #[serde(default = "default_tol")]
    pub tol: Continous,

    /// Evaluate/improve rounds allowed in policy iteration.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Sweeps allowed in one policy evaluation or one value iteration run.
    #[serde(default = "default_max_sweeps")]
    pub max_sweeps: usize,

    #[serde(default)]
    pub sweep_mode: SweepMode,
}

fn default_gamma() -> Continous {
    0.9
}

fn default_tol() -> Continous {
    1e-8
}

fn default_max_iterations() -> usize {
    1_000
}

fn default_max_sweeps() -> usize {
    100_000
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            tol: default_tol(),
            max_iterations: default_max_iterations(),
            max_sweeps: default_max_sweeps(),
            sweep_mode: SweepMode::default(),
        }
    }
}

impl SolverConfig {
    pub fn from_json(json: &str) -> MdpResult<Self> {
        let config = serde_json::from_str::<Self>(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> MdpResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| MdpError::Io {
            context: format!("reading solver config {}", path.display()),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn with_gamma(mut self, gamma: Continous) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_tol(mut self, tol: Continous) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    pub fn with_sweep_mode(mut self, sweep_mode: SweepMode) -> Self {
        self.sweep_mode = sweep_mode;
        self
    }

    pub fn validate(&self) -> MdpResult<()> {
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(MdpError::InvalidConfig(format!(
                "gamma must be in [0, 1), got {}",
                self.gamma
            )));
        }
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(MdpError::InvalidConfig(format!(
                "tol must be finite and non-negative, got {}",
                self.tol
            )));
        }
        if self.max_iterations == 0 {
            return Err(MdpError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.max_sweeps == 0 {
            return Err(MdpError::InvalidConfig(
                "max_sweeps must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertor::*;
    use float_eq::*;
    use rstest::rstest;

    #[test]
    fn empty_json_gives_defaults() {
        let config = SolverConfig::from_json("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_float_eq!(config.gamma, 0.9, abs <= 1e-16);
        assert_float_eq!(config.tol, 1e-8, abs <= 1e-20);
        assert_that!(config.sweep_mode).is_equal_to(SweepMode::Synchronous);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config =
            SolverConfig::from_json(r#"{"gamma": 0.5, "sweep_mode": "reference"}"#).unwrap();
        assert_float_eq!(config.gamma, 0.5, abs <= 1e-16);
        assert_that!(config.sweep_mode).is_equal_to(SweepMode::Reference);
        assert_that!(config.max_sweeps).is_equal_to(100_000);
    }

    #[rstest]
    #[case(SolverConfig::default().with_gamma(1.0))]
    #[case(SolverConfig::default().with_gamma(-0.1))]
    #[case(SolverConfig::default().with_tol(-1e-3))]
    #[case(SolverConfig::default().with_tol(f64::NAN))]
    #[case(SolverConfig::default().with_max_iterations(0))]
    #[case(SolverConfig::default().with_max_sweeps(0))]
    fn out_of_range_values_are_rejected(#[case] config: SolverConfig) {
        assert!(matches!(config.validate(), Err(MdpError::InvalidConfig(_))));
    }

    #[test]
    fn strict_zero_tolerance_is_allowed() {
        assert!(SolverConfig::default().with_tol(0.0).validate().is_ok());
    }

    #[test]
    fn unknown_sweep_mode_is_a_json_error() {
        assert!(matches!(
            SolverConfig::from_json(r#"{"sweep_mode": "jacobi"}"#),
            Err(MdpError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SolverConfig::load("/nonexistent/mdp-dp.json"),
            Err(MdpError::Io { .. })
        ));
    }
}
