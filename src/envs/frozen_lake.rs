use crate::error::{MdpError, MdpResult};
use crate::mdps::mdp::{Mdp, TabularMdp};
use crate::mdps::solvers::common::{argmax, PolicyTable};
use gymnasium::*;

/// Refer: https://gymnasium.farama.org/environments/toy_text/frozen_lake/
pub const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

pub const MAP_8X8: [&str; 8] = [
    "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF", "FFFHFFFG",
];

pub const ACTION_NAMES: [&str; 4] = ["Left", "Down", "Right", "Up"];

const ACTION_ARROWS: [char; 4] = ['←', '↓', '→', '↑'];

/// The FrozenLake dynamics, built the way gym builds `env.P`.
pub struct FrozenLake {
    desc: Vec<String>,
    mdp: TabularMdp,
}

impl FrozenLake {
    pub fn new(desc: &[&str], is_slippery: bool) -> MdpResult<Self> {
        let rows = desc.iter().map(|r| r.as_bytes()).collect::<Vec<_>>();
        let n_row = rows.len();
        let n_col = rows.first().map_or(0, |r| r.len());
        if let Some(r) = rows.iter().position(|r| r.len() != n_col) {
            return Err(MdpError::InvalidModel {
                state: r * n_col,
                action: 0,
                reason: format!("map row {r} is not {n_col} cells wide"),
            });
        }

        let to_s = |row: usize, col: usize| row * n_col + col;
        let mv = |row: usize, col: usize, a: Discrete| match a {
            0 => (row, col.saturating_sub(1)),
            1 => ((row + 1).min(n_row - 1), col),
            2 => (row, (col + 1).min(n_col - 1)),
            _ => (row.saturating_sub(1), col),
        };

        let mut transitions = Vec::with_capacity(n_row * n_col);
        for row in 0..n_row {
            for col in 0..n_col {
                let s = to_s(row, col);
                let letter = rows[row][col];
                let actions = (0..4)
                    .map(|a| {
                        if letter == b'G' || letter == b'H' {
                            return vec![Transition {
                                probability: 1.,
                                next_state: s,
                                reward: 0.,
                                done: true,
                            }];
                        }

                        let (moves, probability) = if is_slippery {
                            (vec![(a + 3) % 4, a, (a + 1) % 4], 1. / 3.)
                        } else {
                            (vec![a], 1.)
                        };
                        moves
                            .into_iter()
                            .map(|b| {
                                let (next_row, next_col) = mv(row, col, b);
                                let next_letter = rows[next_row][next_col];
                                Transition {
                                    probability,
                                    next_state: to_s(next_row, next_col),
                                    reward: if next_letter == b'G' { 1. } else { 0. },
                                    done: next_letter == b'G' || next_letter == b'H',
                                }
                            })
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<Vec<Transition>>>();
                transitions.push(actions);
            }
        }

        Ok(Self {
            desc: desc.iter().map(|r| r.to_string()).collect(),
            mdp: TabularMdp::new(transitions)?,
        })
    }

    pub fn desc(&self) -> &[String] {
        &self.desc
    }

    /// The `S` cell, or 0 when the map has none.
    pub fn start_state(&self) -> Discrete {
        self.desc
            .iter()
            .flat_map(|r| r.bytes())
            .position(|c| c == b'S')
            .unwrap_or(0)
    }

    /// Draws the greedy action of every cell as an arrow; holes and goals keep their letter.
    pub fn render_policy(&self, policy: &PolicyTable) -> String {
        let n_col = self.desc.first().map_or(0, |r| r.len());
        self.desc
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .chars()
                    .enumerate()
                    .map(|(col, c)| match c {
                        'G' | 'H' => c,
                        _ => ACTION_ARROWS[argmax(policy.row(row * n_col + col).iter().copied())],
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Mdp for FrozenLake {
    fn n_s(&self) -> usize {
        self.mdp.n_s()
    }

    fn n_a(&self) -> usize {
        self.mdp.n_a()
    }

    fn transitions(&self, s: Discrete, a: Discrete) -> &[Transition] {
        self.mdp.transitions(s, a)
    }
}
