use super::super::mdp::Mdp;
use crate::error::{MdpError, MdpResult};
use gymnasium::*;
use itertools::Itertools;
use ndarray::{Array1, Array2};

/// `V[s]`: expected discounted return from each state.
pub type ValueFunction = Array1<Continous>;

/// `π[s][a]`: probability of taking `a` in `s`. Rows sum to 1.
pub type PolicyTable = Array2<Continous>;

/// Largest allowed gap between a policy row's mass and 1.
pub const POLICY_TOLERANCE: Continous = 1e-6;

/// `terminal[s]` is set when `s` is the next state of some `done` outcome.
pub fn terminal_states(mdp: &dyn Mdp) -> Vec<bool> {
    let mut terminal = vec![false; mdp.n_s()];
    for s in 0..mdp.n_s() {
        for a in 0..mdp.n_a() {
            for t in mdp.transitions(s, a).iter().filter(|t| t.done) {
                terminal[t.next_state] = true;
            }
        }
    }
    terminal
}

/// Value a state contributes when bootstrapped: absorbing states are worth 0.
pub fn effective_value(v: &ValueFunction, terminal: &[bool], s: Discrete) -> Continous {
    if terminal[s] {
        0.
    } else {
        v[s]
    }
}

/// `Σ p · (r + γ · V[s'])` with `V` taken as given.
pub fn q_value(ts: &[Transition], v: &ValueFunction, gamma: Continous) -> Continous {
    ts.iter()
        .map(|t| t.probability * (t.reward + gamma * v[t.next_state]))
        .sum()
}

/// `Σ p · (r + γ · V'[s'])` where terminal states bootstrap as 0.
pub fn backup(ts: &[Transition], v: &ValueFunction, terminal: &[bool], gamma: Continous) -> Continous {
    ts.iter()
        .map(|t| t.probability * (t.reward + gamma * effective_value(v, terminal, t.next_state)))
        .sum()
}

/// In-place backup: a `done` outcome zeroes its next state's entry before it is read.
/// The write is visible to every later read in the sweep.
pub fn backup_in_place(ts: &[Transition], v: &mut ValueFunction, gamma: Continous) -> Continous {
    let mut q = 0.;
    for t in ts {
        if t.done {
            v[t.next_state] = 0.;
        }
        q += t.probability * (t.reward + gamma * v[t.next_state]);
    }
    q
}

/// Index of the first maximum.
pub fn argmax(values: impl IntoIterator<Item = Continous>) -> Discrete {
    let mut best = (0, Continous::NEG_INFINITY);
    for (i, x) in values.into_iter().enumerate() {
        if x > best.1 {
            best = (i, x);
        }
    }
    best.0
}

/// Sets row `s` to the deterministic choice of `a`.
pub fn set_one_hot(policy: &mut PolicyTable, s: Discrete, a: Discrete) {
    policy.row_mut(s).fill(0.);
    policy[[s, a]] = 1.;
}

/// Policy choosing action `a` everywhere.
pub fn uniform_action_policy(n_s: usize, n_a: usize, a: Discrete) -> PolicyTable {
    PolicyTable::from_shape_fn((n_s, n_a), |(_, b)| if a == b { 1. } else { 0. })
}

pub fn max_abs_diff(a: &ValueFunction, b: &ValueFunction) -> Continous {
    a.iter()
        .zip_eq(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0., Continous::max)
}

pub fn check_policy(mdp: &dyn Mdp, policy: &PolicyTable) -> MdpResult<()> {
    let expected = (mdp.n_s(), mdp.n_a());
    if policy.dim() != expected {
        return Err(MdpError::DimensionMismatch {
            what: "policy",
            expected: format!("{expected:?}"),
            actual: format!("{:?}", policy.dim()),
        });
    }

    for (s, row) in policy.outer_iter().enumerate() {
        if let Some(p) = row.iter().find(|p| !(**p >= 0.)) {
            return Err(MdpError::InvalidPolicy {
                state: s,
                reason: format!("entry {p} is not a probability"),
            });
        }
        let total = row.sum();
        if (total - 1.).abs() > POLICY_TOLERANCE {
            return Err(MdpError::InvalidPolicy {
                state: s,
                reason: format!("row sums to {total}"),
            });
        }
    }

    Ok(())
}

pub fn check_values(mdp: &dyn Mdp, v: &ValueFunction) -> MdpResult<()> {
    if v.len() != mdp.n_s() {
        return Err(MdpError::DimensionMismatch {
            what: "value function",
            expected: mdp.n_s().to_string(),
            actual: v.len().to_string(),
        });
    }

    if let Some((s, x)) = v.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(MdpError::InvalidValues {
            state: s,
            reason: format!("{x} is not finite"),
        });
    }

    Ok(())
}
