use super::super::mdp::{validate_model, Mdp};
use super::common::*;
use crate::config::{SolverConfig, SweepMode};
use crate::error::{MdpError, MdpResult};
use gymnasium::*;
use tracing::{debug, trace, warn};

/// Iterative policy evaluation: the value function of a fixed, possibly
/// stochastic, policy. Sweeps until the largest per-state change is at most
/// `config.tol`.
pub fn evaluate_policy(
    mdp: &dyn Mdp,
    policy: &PolicyTable,
    config: &SolverConfig,
) -> MdpResult<ValueFunction> {
    config.validate()?;
    validate_model(mdp)?;
    check_policy(mdp, policy)?;

    evaluate(mdp, policy, config).map(|(v, _)| v)
}

/// Unchecked evaluation, also returning the number of sweeps it took.
pub(crate) fn evaluate(
    mdp: &dyn Mdp,
    policy: &PolicyTable,
    config: &SolverConfig,
) -> MdpResult<(ValueFunction, usize)> {
    let terminal = terminal_states(mdp);
    let mut v = ValueFunction::zeros(mdp.n_s());

    for sweep in 1..=config.max_sweeps {
        let delta = match config.sweep_mode {
            SweepMode::Synchronous => synchronous_sweep(mdp, policy, &mut v, &terminal, config.gamma),
            SweepMode::Reference => in_place_sweep(mdp, policy, &mut v, config.gamma),
        };
        trace!(sweep, delta, "policy evaluation sweep");

        if delta <= config.tol {
            debug!(sweeps = sweep, "policy evaluation converged");
            return Ok((v, sweep));
        }
    }

    warn!(max_sweeps = config.max_sweeps, "policy evaluation did not converge");
    Err(MdpError::NonConvergence {
        algorithm: "policy evaluation",
        iterations: config.max_sweeps,
    })
}

fn expected_backup(
    mdp: &dyn Mdp,
    policy: &PolicyTable,
    s: Discrete,
    mut backup_of: impl FnMut(&[Transition]) -> Continous,
) -> Continous {
    (0..mdp.n_a())
        .map(|a| policy[[s, a]] * backup_of(mdp.transitions(s, a)))
        .sum()
}

fn synchronous_sweep(
    mdp: &dyn Mdp,
    policy: &PolicyTable,
    v: &mut ValueFunction,
    terminal: &[bool],
    gamma: Continous,
) -> Continous {
    let prev = v.clone();
    for s in 0..mdp.n_s() {
        v[s] = if terminal[s] {
            0.
        } else {
            expected_backup(mdp, policy, s, |ts| backup(ts, &prev, terminal, gamma))
        };
    }

    max_abs_diff(v, &prev)
}

fn in_place_sweep(
    mdp: &dyn Mdp,
    policy: &PolicyTable,
    v: &mut ValueFunction,
    gamma: Continous,
) -> Continous {
    let mut delta: Continous = 0.;
    for s in 0..mdp.n_s() {
        let before = v[s];
        let updated = expected_backup(mdp, policy, s, |ts| backup_in_place(ts, v, gamma));
        v[s] = updated;
        delta = delta.max((before - updated).abs());
    }

    delta
}
