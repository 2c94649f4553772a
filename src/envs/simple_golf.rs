use crate::mdps::mdp::{Mdp, TabularMdp};
use gymnasium::*;

/// https://towardsdatascience.com/reinforcement-learning-an-easy-introduction-to-value-iteration-e4cfe0731fd5
///
/// States: 0 fairway, 1 green, 2 in the hole. Actions: 0 hit to green,
/// 1 hit to fairway, 2 hit in hole. An action that makes no sense where the
/// ball lies leaves it there.
pub struct SimpleGolf {
    mdp: TabularMdp,
}

impl SimpleGolf {
    pub fn new() -> Self {
        let t = |probability, next_state, reward, done| Transition {
            probability,
            next_state,
            reward,
            done,
        };
        let stay = |s| vec![t(1., s, 0., false)];

        let mdp = TabularMdp::new(vec![
            vec![
                vec![t(0.9, 1, 0., false), t(0.1, 0, 0., false)],
                stay(0),
                stay(0),
            ],
            vec![
                stay(1),
                vec![t(0.9, 0, 0., false), t(0.1, 1, 0., false)],
                vec![t(0.9, 2, 10., true), t(0.1, 1, 0., false)],
            ],
            vec![vec![t(1., 2, 0., true)]; 3],
        ])
        .expect("simple golf is a valid model");

        Self { mdp }
    }
}

impl Mdp for SimpleGolf {
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
