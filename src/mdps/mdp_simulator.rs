use super::mdp::{validate_model, Mdp};
use crate::error::{MdpError, MdpResult};
use gymnasium::*;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde_json::json;
use std::rc::Rc;

pub trait Weighted {
    fn p(&self) -> Continous;
}

impl Weighted for Transition {
    fn p(&self) -> Continous {
        self.probability
    }
}

/// Samples one item in proportion to its weight. `None` if no item carries weight.
pub fn pick_next<'a, T>(rng: &mut StdRng, ts: &'a [T]) -> Option<&'a T>
where
    T: Weighted,
{
    let dist = WeightedIndex::new(ts.iter().map(|item| item.p())).ok()?;
    ts.get(dist.sample(rng))
}

struct Grid {
    desc: Vec<String>,
    action_names: Vec<String>,
}

/// Steps through an [`Mdp`] by sampling its outcomes, so a solved policy can be
/// played without a live environment.
pub struct ModelSimulator {
    name: String,
    mdp: Rc<dyn Mdp>,
    start_state: Discrete,
    rng: StdRng,
    state: Discrete,
    last_action: Option<Discrete>,
    steps: usize,
    max_episode_steps: Option<usize>,
    grid: Option<Grid>,
}

impl ModelSimulator {
    pub fn new(mdp: Rc<dyn Mdp>, start_state: Discrete, seed: u64) -> MdpResult<Self> {
        validate_model(&*mdp)?;
        if start_state >= mdp.n_s() {
            return Err(MdpError::InvalidConfig(format!(
                "start state {start_state} out of range for {} states",
                mdp.n_s()
            )));
        }

        Ok(Self {
            name: "MdpSimulator".to_string(),
            mdp,
            start_state,
            rng: StdRng::seed_from_u64(seed),
            state: start_state,
            last_action: None,
            steps: 0,
            max_episode_steps: None,
            grid: None,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Episodes are truncated after this many steps.
    pub fn with_max_episode_steps(mut self, max_episode_steps: usize) -> Self {
        self.max_episode_steps = Some(max_episode_steps);
        self
    }

    /// Renders states as cells of a row-major map instead of bare indices.
    pub fn with_grid(mut self, desc: &[String], action_names: &[&str]) -> Self {
        self.grid = Some(Grid {
            desc: desc.to_vec(),
            action_names: action_names.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    pub fn state(&self) -> Discrete {
        self.state
    }
}

impl Environment for ModelSimulator {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn n_actions(&self) -> Discrete {
        self.mdp.n_a()
    }

    fn reset(&mut self, seed: Option<usize>) -> Discrete {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed as u64);
        }
        self.state = self.start_state;
        self.last_action = None;
        self.steps = 0;

        self.state
    }

    fn step(&mut self, action: Discrete) -> StepInfo {
        assert!(
            action < self.mdp.n_a(),
            "Action {action} out of range for {} actions.",
            self.mdp.n_a()
        );

        let t = *pick_next(&mut self.rng, self.mdp.transitions(self.state, action))
            .expect("validated outcome lists carry probability mass");
        self.state = t.next_state;
        self.last_action = Some(action);
        self.steps += 1;

        StepInfo {
            observation: t.next_state,
            reward: t.reward,
            truncated: self.max_episode_steps.is_some_and(|max| self.steps >= max),
            terminated: t.done,
            info: json!({ "prob": t.probability }),
        }
    }

    fn render(&self) -> RenderFrame {
        let header = match (self.last_action, &self.grid) {
            (Some(a), Some(grid)) => match grid.action_names.get(a) {
                Some(name) => format!("  ({name})\n"),
                None => format!("  ({a})\n"),
            },
            (Some(a), None) => format!("  ({a})\n"),
            (None, _) => "\n".to_string(),
        };

        let Some(grid) = &self.grid else {
            return RenderFrame::Ansi(format!("{header}{}\n", self.state));
        };

        let n_col = grid.desc.first().map_or(0, |r| r.len());
        let mut frame = header;
        for (row, cells) in grid.desc.iter().enumerate() {
            for (col, c) in cells.chars().enumerate() {
                if row * n_col + col == self.state {
                    frame.push_str(&format!("\u{1b}[41m{c}\u{1b}[0m"));
                } else {
                    frame.push(c);
                }
            }
            frame.push('\n');
        }

        RenderFrame::Ansi(frame)
    }
}
