use crate::error::{MdpError, MdpResult};
use gymnasium::*;
use itertools::iproduct;

/// Largest allowed gap between an outcome list's probability mass and 1.
pub const PROBABILITY_TOLERANCE: Continous = 1e-6;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// Outcomes of taking action `a` in state `s`.
    fn transitions(&self, s: Discrete, a: Discrete) -> &[Transition];
}

/// Dense, validated transition table.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularMdp {
    n_s: usize,
    n_a: usize,
    // Indexed by `s * n_a + a`.
    transitions: Vec<Vec<Transition>>,
}

impl TabularMdp {
    /// Builds a model from `transitions[s][a]`.
    pub fn new(transitions: Vec<Vec<Vec<Transition>>>) -> MdpResult<Self> {
        let n_s = transitions.len();
        let n_a = transitions.first().map_or(0, |row| row.len());
        for (s, row) in transitions.iter().enumerate() {
            if row.len() != n_a {
                return Err(MdpError::InvalidModel {
                    state: s,
                    action: row.len().min(n_a),
                    reason: format!("expected {} actions, found {}", n_a, row.len()),
                });
            }
        }

        let mdp = Self {
            n_s,
            n_a,
            transitions: transitions.into_iter().flatten().collect(),
        };
        validate_model(&mdp)?;
        Ok(mdp)
    }

    /// Builds a model from a keyed table. The state and action counts are one
    /// past the largest keys; every pair in between must be present.
    pub fn from_transitions(transitions: &Transitions) -> MdpResult<Self> {
        let n_s = transitions.keys().map(|&(s, _)| s + 1).max().unwrap_or(0);
        let n_a = transitions.keys().map(|&(_, a)| a + 1).max().unwrap_or(0);

        let mut table = Vec::with_capacity(n_s * n_a);
        for (s, a) in iproduct!(0..n_s, 0..n_a) {
            let ts = transitions
                .get(&(s, a))
                .ok_or_else(|| MdpError::InvalidModel {
                    state: s,
                    action: a,
                    reason: "no outcomes listed".to_string(),
                })?;
            table.push(ts.clone());
        }

        let mdp = Self {
            n_s,
            n_a,
            transitions: table,
        };
        validate_model(&mdp)?;
        Ok(mdp)
    }

    /// Parses a gym-style `P` table, see [`gymnasium::parse_transitions`].
    pub fn from_json(json: &str) -> MdpResult<Self> {
        Self::from_transitions(&parse_transitions(json)?)
    }
}

impl Mdp for TabularMdp {
    fn n_s(&self) -> usize {
        self.n_s
    }

    fn n_a(&self) -> usize {
        self.n_a
    }

    fn transitions(&self, s: Discrete, a: Discrete) -> &[Transition] {
        &self.transitions[s * self.n_a + a]
    }
}

/// Checks that every outcome list is a probability distribution over valid states.
pub fn validate_model(mdp: &dyn Mdp) -> MdpResult<()> {
    if mdp.n_s() == 0 || mdp.n_a() == 0 {
        return Err(MdpError::InvalidModel {
            state: 0,
            action: 0,
            reason: format!("empty model ({} states, {} actions)", mdp.n_s(), mdp.n_a()),
        });
    }

    for (s, a) in iproduct!(0..mdp.n_s(), 0..mdp.n_a()) {
        let invalid = |reason: String| MdpError::InvalidModel {
            state: s,
            action: a,
            reason,
        };

        let ts = mdp.transitions(s, a);
        if ts.is_empty() {
            return Err(invalid("no outcomes listed".to_string()));
        }

        for t in ts {
            if !(0.0..=1.0).contains(&t.probability) {
                return Err(invalid(format!("probability {} outside [0, 1]", t.probability)));
            }
            if t.next_state >= mdp.n_s() {
                return Err(invalid(format!(
                    "next state {} out of range for {} states",
                    t.next_state,
                    mdp.n_s()
                )));
            }
            if !t.reward.is_finite() {
                return Err(invalid(format!("reward {} is not finite", t.reward)));
            }
        }

        let total = ts.iter().map(|t| t.probability).sum::<Continous>();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(invalid(format!("probabilities sum to {total}")));
        }
    }

    Ok(())
}
