use gymnasium::*;
use mdp_dp::*;
use rand::prelude::*;

/// A random model with `n_s` states and `n_a` actions. Every outcome list has
/// one to three outcomes; the last state is absorbing and reached with `done`.
#[allow(dead_code)]
pub fn random_mdp(seed: u64, n_s: usize, n_a: usize) -> TabularMdp {
    let rng = &mut StdRng::seed_from_u64(seed);
    let sink = n_s - 1;

    let transitions = (0..n_s)
        .map(|s| {
            (0..n_a)
                .map(|_| {
                    if s == sink {
                        return vec![Transition {
                            probability: 1.,
                            next_state: sink,
                            reward: 0.,
                            done: true,
                        }];
                    }

                    let n = rng.gen_range(1..=3);
                    let weights = (0..n).map(|_| rng.gen_range(0.1..1.)).collect::<Vec<f64>>();
                    let mass = weights.iter().sum::<f64>();
                    weights
                        .iter()
                        .map(|w| {
                            let next_state = rng.gen_range(0..n_s);
                            Transition {
                                probability: w / mass,
                                next_state,
                                reward: rng.gen_range(0. ..2.),
                                done: next_state == sink,
                            }
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    TabularMdp::new(transitions).expect("random model is valid")
}

/// Action chosen in each state of a one-hot policy.
#[allow(dead_code)]
pub fn actions(policy: &PolicyTable) -> Vec<Discrete> {
    let greedy = GreedyPolicy(policy);
    (0..policy.nrows())
        .map(|s| greedy.policy(&s).expect("state in range"))
        .collect()
}

#[allow(dead_code)]
pub fn assert_one_hot(policy: &PolicyTable) {
    for row in policy.outer_iter() {
        assert_eq!(row.iter().filter(|&&p| p == 1.).count(), 1);
        assert_eq!(row.iter().filter(|&&p| p == 0.).count(), row.len() - 1);
    }
}
