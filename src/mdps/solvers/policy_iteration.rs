use super::super::mdp::{validate_model, Mdp};
use super::super::mdp_solver::{MdpSolver, Solution};
use super::common::*;
use super::policy_evaluation::evaluate;
use super::policy_improvement::improve;
use crate::config::SolverConfig;
use crate::error::{MdpError, MdpResult};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Policy iteration: evaluate, improve, repeat until the improved policy is
/// identical to the one just evaluated.
pub fn run_policy_iteration(
    mdp: &dyn Mdp,
    initial_policy: &PolicyTable,
    config: &SolverConfig,
) -> MdpResult<(PolicyTable, ValueFunction)> {
    solve(mdp, initial_policy, config).map(|solution| (solution.policy, solution.values))
}

fn solve(mdp: &dyn Mdp, initial_policy: &PolicyTable, config: &SolverConfig) -> MdpResult<Solution> {
    config.validate()?;
    validate_model(mdp)?;
    check_policy(mdp, initial_policy)?;

    iterate(mdp, initial_policy.clone(), config)
}

enum Phase {
    Evaluating {
        policy: PolicyTable,
    },
    Improving {
        policy: PolicyTable,
        values: ValueFunction,
    },
    Converged {
        policy: PolicyTable,
        values: ValueFunction,
    },
}

fn iterate(mdp: &dyn Mdp, policy: PolicyTable, config: &SolverConfig) -> MdpResult<Solution> {
    let mut phase = Phase::Evaluating { policy };
    let mut iterations = 0;

    loop {
        phase = match phase {
            Phase::Evaluating { policy } => {
                if iterations == config.max_iterations {
                    warn!(iterations, "policy iteration did not converge");
                    return Err(MdpError::NonConvergence {
                        algorithm: "policy iteration",
                        iterations,
                    });
                }
                iterations += 1;

                let (values, sweeps) = evaluate(mdp, &policy, config)?;
                debug!(iteration = iterations, sweeps, "evaluated policy");
                Phase::Improving { policy, values }
            }

            Phase::Improving { policy, values } => {
                let improved = improve(mdp, &values, config.gamma);
                if improved == policy {
                    Phase::Converged {
                        policy: improved,
                        values,
                    }
                } else {
                    Phase::Evaluating { policy: improved }
                }
            }

            Phase::Converged { policy, values } => {
                info!(iterations, "policy iteration converged");
                return Ok(Solution {
                    policy,
                    values,
                    iterations,
                });
            }
        };
    }
}

#[derive(Clone)]
pub struct PolicyIteration {
    mdp: Rc<dyn Mdp>,
    config: SolverConfig,
    initial_policy: PolicyTable,
    solution: Option<Solution>,
}

impl PolicyIteration {
    /// Starts from the policy that always takes action 0.
    pub fn new(mdp: Rc<dyn Mdp>, config: SolverConfig) -> Self {
        let initial_policy = uniform_action_policy(mdp.n_s(), mdp.n_a(), 0);

        Self {
            mdp,
            config,
            initial_policy,
            solution: None,
        }
    }

    pub fn with_initial_policy(mut self, policy: PolicyTable) -> Self {
        self.initial_policy = policy;
        self
    }
}

impl MdpSolver for PolicyIteration {
    fn mdp(&self) -> &dyn Mdp {
        &*self.mdp
    }

    fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn exec(&mut self) -> MdpResult<usize> {
        let solution = solve(&*self.mdp, &self.initial_policy, &self.config)?;
        let iterations = solution.iterations;
        self.solution = Some(solution);

        Ok(iterations)
    }
}
