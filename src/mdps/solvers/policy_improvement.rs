use super::super::mdp::{validate_model, Mdp};
use super::common::*;
use crate::config::SolverConfig;
use crate::error::MdpResult;
use gymnasium::*;

/// Greedy one-step lookahead on `v`. Each row is one-hot at the first action
/// with the highest action value.
pub fn improve_policy(
    mdp: &dyn Mdp,
    v: &ValueFunction,
    config: &SolverConfig,
) -> MdpResult<PolicyTable> {
    config.validate()?;
    validate_model(mdp)?;
    check_values(mdp, v)?;

    Ok(improve(mdp, v, config.gamma))
}

pub(crate) fn improve(mdp: &dyn Mdp, v: &ValueFunction, gamma: Continous) -> PolicyTable {
    let mut policy = PolicyTable::zeros((mdp.n_s(), mdp.n_a()));
    for s in 0..mdp.n_s() {
        let best = argmax((0..mdp.n_a()).map(|a| q_value(mdp.transitions(s, a), v, gamma)));
        set_one_hot(&mut policy, s, best);
    }

    policy
}

#[cfg(test)]
mod tests {
    use super::super::policy_evaluation::evaluate_policy;
    use super::*;
    use crate::envs::{frozen_lake::*, simple_golf::*};
    use crate::error::MdpError;
    use crate::mdps::mdp::TabularMdp;
    use ndarray::arr1;

    #[test]
    fn greedy_on_simple_golf() {
        let mdp = SimpleGolf::new();
        let v = arr1(&[0., 0., 0.]);

        let policy = improve_policy(&mdp, &v, &SolverConfig::default()).unwrap();

        // Only putting from the green pays before anything is known.
        assert_eq!(policy.row(1).to_vec(), vec![0., 0., 1.]);
        assert_eq!(policy.row(0).to_vec(), vec![1., 0., 0.]);
    }

    #[test]
    fn ties_go_to_the_lowest_action() {
        let same = vec![Transition {
            probability: 1.,
            next_state: 0,
            reward: 1.,
            done: false,
        }];
        let mdp = TabularMdp::new(vec![vec![
            vec![Transition {
                probability: 1.,
                next_state: 0,
                reward: 0.,
                done: false,
            }],
            same.clone(),
            same,
        ]])
        .unwrap();

        let policy = improve_policy(&mdp, &arr1(&[2.]), &SolverConfig::default()).unwrap();

        assert_eq!(policy.row(0).to_vec(), vec![0., 1., 0.]);
    }

    #[test]
    fn values_are_used_as_given() {
        // A done outcome into a state with a stored value still sees that value here.
        let mdp = TabularMdp::new(vec![
            vec![
                vec![Transition {
                    probability: 1.,
                    next_state: 1,
                    reward: 0.,
                    done: true,
                }],
                vec![Transition {
                    probability: 1.,
                    next_state: 0,
                    reward: 1.,
                    done: false,
                }],
            ],
            vec![
                vec![Transition {
                    probability: 1.,
                    next_state: 1,
                    reward: 0.,
                    done: true,
                }];
                2
            ],
        ])
        .unwrap();

        let policy = improve_policy(&mdp, &arr1(&[0., 10.]), &SolverConfig::default()).unwrap();

        assert_eq!(policy.row(0).to_vec(), vec![1., 0.]);
    }

    #[test]
    fn improving_the_fixed_point_is_idempotent() {
        let mdp = FrozenLake::new(&MAP_4X4, true).unwrap();
        let config = SolverConfig::default();
        let optimal = PolicyTable::from_shape_fn((16, 4), |(s, a)| {
            let actions = [0, 3, 0, 3, 0, 0, 0, 0, 3, 1, 0, 0, 0, 2, 1, 0];
            if actions[s] == a {
                1.
            } else {
                0.
            }
        });

        let v = evaluate_policy(&mdp, &optimal, &config).unwrap();
        let once = improve_policy(&mdp, &v, &config).unwrap();
        let v = evaluate_policy(&mdp, &once, &config).unwrap();
        let twice = improve_policy(&mdp, &v, &config).unwrap();

        assert_eq!(once, optimal);
        assert_eq!(twice, once);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mdp = SimpleGolf::new();

        assert!(matches!(
            improve_policy(&mdp, &arr1(&[0., Continous::NAN, 0.]), &SolverConfig::default()),
            Err(MdpError::InvalidValues { state: 1, .. })
        ));
    }

    #[test]
    fn value_length_must_match_states() {
        let mdp = SimpleGolf::new();

        assert!(matches!(
            improve_policy(&mdp, &arr1(&[0., 0.]), &SolverConfig::default()),
            Err(MdpError::DimensionMismatch { .. })
        ));
    }
}
