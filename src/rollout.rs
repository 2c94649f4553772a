use crate::error::{MdpError, MdpResult};
use gymnasium::*;
use tracing::{debug, info};

/// Plays `n_episodes` episodes of `policy` on `env` and returns the summed reward.
///
/// Every episode starts from `env.reset(None)` and ends on `terminated` or
/// `truncated`. With `render` set, each frame is logged before acting. An
/// action outside the environment's action space fails with `InvalidAction`.
pub fn rollout(
    env: &mut dyn Environment,
    policy: &dyn Policy,
    render: bool,
    n_episodes: usize,
) -> MdpResult<Continous> {
    let mut total = 0.;
    for ep in 0..n_episodes {
        let mut state = env.reset(None);
        let mut ep_reward = 0.;
        loop {
            if render {
                debug!(env = %env.name(), "\n{}", env.render());
            }

            let action = policy
                .policy(&state)
                .ok_or(MdpError::NoAction { state })?;
            let n_a = env.n_actions();
            if action >= n_a {
                return Err(MdpError::InvalidAction { state, action, n_a });
            }
            let si = env.step(action);
            ep_reward += si.reward;
            state = si.observation;

            if si.truncated || si.terminated {
                break;
            }
        }

        info!(episode = ep, reward = ep_reward, "finished episode");
        total += ep_reward;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::envs::frozen_lake::*;
    use crate::mdps::mdp::Mdp;
    use crate::mdps::mdp_simulator::ModelSimulator;
    use crate::mdps::mdp_solver_policy::GreedyPolicy;
    use crate::mdps::solvers::{common::uniform_action_policy, run_policy_iteration};
    use assertor::*;
    use float_eq::*;
    use std::rc::Rc;

    struct Nowhere;

    impl Policy for Nowhere {
        fn policy(&self, _: &Discrete) -> Option<Discrete> {
            None
        }
    }

    fn lake(is_slippery: bool) -> (Rc<dyn Mdp>, ModelSimulator) {
        let fl = FrozenLake::new(&MAP_4X4, is_slippery).unwrap();
        let desc = fl.desc().to_vec();
        let mdp: Rc<dyn Mdp> = Rc::new(fl);
        let env = ModelSimulator::new(Rc::clone(&mdp), 0, 2718)
            .unwrap()
            .with_grid(&desc, &ACTION_NAMES)
            .with_max_episode_steps(100);
        (mdp, env)
    }

    #[test]
    fn optimal_policy_reaches_the_goal_every_episode() {
        let (mdp, mut env) = lake(false);
        let (policy, _) =
            run_policy_iteration(&*mdp, &uniform_action_policy(16, 4, 0), &SolverConfig::default())
                .unwrap();

        let total = rollout(&mut env, &GreedyPolicy(&policy), true, 5).unwrap();

        assert_float_eq!(total, 5., abs <= 1e-12);
    }

    #[test]
    fn truncation_ends_an_episode() {
        // Always moving left from the start never finishes on its own.
        let (_, env) = lake(false);
        let mut env = env.with_max_episode_steps(3);
        let left = uniform_action_policy(16, 4, 0);

        let total = rollout(&mut env, &GreedyPolicy(&left), false, 2).unwrap();

        assert_float_eq!(total, 0., abs <= 1e-16);
        assert_that!(env.state()).is_equal_to(0);
    }

    #[test]
    fn missing_action_is_an_error() {
        let (_, mut env) = lake(true);

        assert!(matches!(
            rollout(&mut env, &Nowhere, false, 1),
            Err(MdpError::NoAction { state: 0 })
        ));
    }

    #[test]
    fn action_outside_the_action_space_is_an_error() {
        let (_, mut env) = lake(false);
        let wide = uniform_action_policy(16, 5, 4);

        assert!(matches!(
            rollout(&mut env, &GreedyPolicy(&wide), false, 1),
            Err(MdpError::InvalidAction {
                state: 0,
                action: 4,
                n_a: 4
            })
        ));
    }

    #[test]
    fn zero_episodes_collect_nothing() {
        let (_, mut env) = lake(true);

        assert_float_eq!(rollout(&mut env, &Nowhere, false, 0).unwrap(), 0., abs <= 1e-16);
    }
}
