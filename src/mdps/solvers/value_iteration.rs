use super::super::mdp::{validate_model, Mdp};
use super::super::mdp_solver::{MdpSolver, Solution};
use super::common::*;
use crate::config::{SolverConfig, SweepMode};
use crate::error::{MdpError, MdpResult};
use gymnasium::*;
use std::rc::Rc;
use tracing::{info, trace, warn};

/// Value iteration: Bellman optimality sweeps on `initial_value`, keeping the
/// greedy policy alongside. Runs at least one sweep, then continues while the
/// largest per-state change exceeds `config.tol`.
pub fn run_value_iteration(
    mdp: &dyn Mdp,
    initial_value: &ValueFunction,
    config: &SolverConfig,
) -> MdpResult<(PolicyTable, ValueFunction)> {
    solve(mdp, initial_value, config).map(|solution| (solution.policy, solution.values))
}

fn solve(mdp: &dyn Mdp, initial_value: &ValueFunction, config: &SolverConfig) -> MdpResult<Solution> {
    config.validate()?;
    validate_model(mdp)?;
    check_values(mdp, initial_value)?;

    iterate(mdp, initial_value.clone(), config)
}

fn iterate(mdp: &dyn Mdp, mut v: ValueFunction, config: &SolverConfig) -> MdpResult<Solution> {
    let terminal = terminal_states(mdp);
    let mut policy = PolicyTable::zeros((mdp.n_s(), mdp.n_a()));

    for sweep in 1..=config.max_sweeps {
        let error = value_sweep(mdp, &mut v, &mut policy, &terminal, config);
        trace!(sweep, error, "value iteration sweep");

        if error <= config.tol {
            info!(sweeps = sweep, "value iteration converged");
            return Ok(Solution {
                policy,
                values: v,
                iterations: sweep,
            });
        }
    }

    warn!(max_sweeps = config.max_sweeps, "value iteration did not converge");
    Err(MdpError::NonConvergence {
        algorithm: "value iteration",
        iterations: config.max_sweeps,
    })
}

/// One optimality sweep over every state. Returns the largest change of a
/// state's value against its value just before that state was updated.
pub(crate) fn value_sweep(
    mdp: &dyn Mdp,
    v: &mut ValueFunction,
    policy: &mut PolicyTable,
    terminal: &[bool],
    config: &SolverConfig,
) -> Continous {
    match config.sweep_mode {
        SweepMode::Synchronous => synchronous_sweep(mdp, v, policy, terminal, config.gamma),
        SweepMode::Reference => in_place_sweep(mdp, v, policy, config.gamma),
    }
}

fn synchronous_sweep(
    mdp: &dyn Mdp,
    v: &mut ValueFunction,
    policy: &mut PolicyTable,
    terminal: &[bool],
    gamma: Continous,
) -> Continous {
    let prev = v.clone();
    for s in 0..mdp.n_s() {
        let qs = (0..mdp.n_a())
            .map(|a| backup(mdp.transitions(s, a), &prev, terminal, gamma))
            .collect::<Vec<_>>();
        let best = argmax(qs.iter().copied());

        set_one_hot(policy, s, best);
        v[s] = if terminal[s] { 0. } else { qs[best] };
    }

    max_abs_diff(v, &prev)
}

fn in_place_sweep(
    mdp: &dyn Mdp,
    v: &mut ValueFunction,
    policy: &mut PolicyTable,
    gamma: Continous,
) -> Continous {
    let mut error: Continous = 0.;
    for s in 0..mdp.n_s() {
        let before = v[s];
        // Later actions read the zeroes written by earlier ones.
        let qs = (0..mdp.n_a())
            .map(|a| backup_in_place(mdp.transitions(s, a), v, gamma))
            .collect::<Vec<_>>();

        set_one_hot(policy, s, argmax(qs.iter().copied()));
        v[s] = qs.iter().copied().fold(0., Continous::max);
        error = error.max((before - v[s]).abs());
    }

    error
}

#[derive(Clone)]
pub struct ValueIteration {
    mdp: Rc<dyn Mdp>,
    config: SolverConfig,
    initial_values: ValueFunction,
    solution: Option<Solution>,
}

impl ValueIteration {
    /// Starts from all-zero values.
    pub fn new(mdp: Rc<dyn Mdp>, config: SolverConfig) -> Self {
        let initial_values = ValueFunction::zeros(mdp.n_s());

        Self {
            mdp,
            config,
            initial_values,
            solution: None,
        }
    }

    pub fn with_initial_values(mut self, values: ValueFunction) -> Self {
        self.initial_values = values;
        self
    }
}

impl MdpSolver for ValueIteration {
    fn mdp(&self) -> &dyn Mdp {
        &*self.mdp
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn exec(&mut self) -> MdpResult<usize> {
        let solution = solve(&*self.mdp, &self.initial_values, &self.config)?;
        let iterations = solution.iterations;
        self.solution = Some(solution);

        Ok(iterations)
    }
}
