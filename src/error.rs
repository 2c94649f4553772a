//! Error types for mdp-dp.
//!
//! Inputs are checked once, at the public entry points. Sweeps never fail
//! part way through; the only runtime failure is running out of iterations.

use gymnasium::Discrete;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MdpError {
    #[error("Invalid model at state {state}, action {action}: {reason}")]
    InvalidModel {
        state: Discrete,
        action: Discrete,
        reason: String,
    },

    #[error("Invalid policy at state {state}: {reason}")]
    InvalidPolicy { state: Discrete, reason: String },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{algorithm} did not converge within {iterations} iterations")]
    NonConvergence {
        algorithm: &'static str,
        iterations: usize,
    },

    #[error("Invalid value function at state {state}: {reason}")]
    InvalidValues { state: Discrete, reason: String },

    #[error("Policy has no action for state {state}")]
    NoAction { state: Discrete },

    #[error("Policy chose action {action} in state {state}, but only {n_a} actions exist")]
    InvalidAction {
        state: Discrete,
        action: Discrete,
        n_a: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type MdpResult<T> = Result<T, MdpError>;
