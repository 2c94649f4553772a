extern crate serde;
extern crate serde_json;

pub mod common;

pub use common::defs::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub type Discrete = usize;
pub type Continous = f64;

/// One possible outcome of taking an action in a state.
/// Serialized the way gym exposes `env.P[s][a]`: `[probability, next_state, reward, done]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(Continous, Discrete, Continous, bool)",
    into = "(Continous, Discrete, Continous, bool)"
)]
pub struct Transition {
    pub probability: Continous,
    pub next_state: Discrete,
    pub reward: Continous,
    pub done: bool,
}

impl From<(Continous, Discrete, Continous, bool)> for Transition {
    fn from((probability, next_state, reward, done): (Continous, Discrete, Continous, bool)) -> Self {
        Self {
            probability,
            next_state,
            reward,
            done,
        }
    }
}

impl From<Transition> for (Continous, Discrete, Continous, bool) {
    fn from(t: Transition) -> Self {
        (t.probability, t.next_state, t.reward, t.done)
    }
}

pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

/// Parses a transition table in the gym layout: `{"<s>": {"<a>": [[p, s', r, done], ...]}}`.
pub fn parse_transitions(json: &str) -> serde_json::Result<Transitions> {
    let nested = serde_json::from_str::<HashMap<Discrete, HashMap<Discrete, Vec<Transition>>>>(json)?;

    Ok(nested
        .into_iter()
        .flat_map(|(s, s_trans)| s_trans.into_iter().map(move |(a, ts)| ((s, a), ts)))
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderFrame {
    Ansi(String),
}

impl RenderFrame {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RenderFrame::Ansi(s) => Some(s),
        }
    }
}

impl fmt::Display for RenderFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFrame::Ansi(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepInfo {
    pub observation: Discrete,
    pub reward: Continous,
    pub truncated: bool,
    pub terminated: bool,
    pub info: Value,
}

/// An environment with discrete observation and action spaces.
/// Refer: https://gymnasium.farama.org/api/env/
pub trait Environment {
    fn name(&self) -> String;

    /// Size of the action space; valid actions are `0..n_actions()`.
    fn n_actions(&self) -> Discrete;

    /// Resets the environment to an initial state, returning it. A seed re-seeds the environment's RNG.
    fn reset(&mut self, seed: Option<usize>) -> Discrete;

    fn step(&mut self, action: Discrete) -> StepInfo;

    fn render(&self) -> RenderFrame;
}
