//! Dynamic-programming solvers for finite Markov decision processes.
//!
//! Policy iteration and value iteration over a tabular transition model,
//! with a simulator and rollout harness for playing the solved policies.

pub mod config;
pub mod envs;
pub mod error;
pub mod mdps;
pub mod rollout;

pub use config::{SolverConfig, SweepMode};
pub use error::{MdpError, MdpResult};
pub use mdps::mdp::{validate_model, Mdp, TabularMdp};
pub use mdps::mdp_simulator::ModelSimulator;
pub use mdps::mdp_solver::{MdpSolver, Solution};
pub use mdps::mdp_solver_policy::{GreedyPolicy, MdpSolverPolicy};
pub use mdps::solvers::common::{PolicyTable, ValueFunction};
pub use mdps::solvers::{
    evaluate_policy, improve_policy, run_policy_iteration, run_value_iteration, PolicyIteration,
    ValueIteration,
};
pub use rollout::rollout;
