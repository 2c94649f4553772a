use super::mdp::Mdp;
use super::solvers::common::*;
use crate::config::SolverConfig;
use crate::error::MdpResult;
use gymnasium::*;

/// Outcome of a solver run: a greedy policy and its value function.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub policy: PolicyTable,
    pub values: ValueFunction,
    /// Policy-iteration rounds, or value-iteration sweeps.
    pub iterations: usize,
}

impl Solution {
    /// Action with the largest probability in state `s`.
    pub fn action(&self, s: Discrete) -> Option<Discrete> {
        (s < self.policy.nrows()).then(|| argmax(self.policy.row(s).iter().copied()))
    }
}

pub trait MdpSolver {
    fn mdp(&self) -> &dyn Mdp;

    fn config(&self) -> &SolverConfig;

    /// `None` until `exec` has succeeded.
    fn solution(&self) -> Option<&Solution>;

    /// Solves the MDP, returning the number of iterations it took.
    fn exec(&mut self) -> MdpResult<usize>;

    fn v_star(&self, s: Discrete) -> Option<Continous> {
        self.solution()?.values.get(s).copied()
    }

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous> {
        let solution = self.solution()?;
        let mdp = self.mdp();
        if s >= mdp.n_s() || a >= mdp.n_a() {
            return None;
        }

        Some(q_value(
            mdp.transitions(s, a),
            &solution.values,
            self.config().gamma,
        ))
    }

    fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        self.solution()?.action(s)
    }
}
