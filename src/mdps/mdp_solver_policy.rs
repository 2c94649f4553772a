use super::mdp_solver::*;
use super::solvers::common::{argmax, PolicyTable};
use gymnasium::*;
use std::rc::Rc;

/// Acts with the optimal action of a solved [`MdpSolver`].
pub struct MdpSolverPolicy {
    pub mdp_solver: Rc<dyn MdpSolver>,
}

impl Policy for MdpSolverPolicy {
    fn policy(&self, s: &Discrete) -> Option<Discrete> {
        self.mdp_solver.pi_star(*s)
    }
}

/// Acts with the most probable action of each row of a policy table.
pub struct GreedyPolicy<'a>(pub &'a PolicyTable);

impl Policy for GreedyPolicy<'_> {
    fn policy(&self, s: &Discrete) -> Option<Discrete> {
        (*s < self.0.nrows() && self.0.ncols() > 0).then(|| argmax(self.0.row(*s).iter().copied()))
    }
}
