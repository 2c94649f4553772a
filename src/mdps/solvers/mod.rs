pub mod common;
pub mod policy_evaluation;
pub mod policy_improvement;
pub mod policy_iteration;
pub mod value_iteration;

pub use policy_evaluation::evaluate_policy;
pub use policy_improvement::improve_policy;
pub use policy_iteration::{run_policy_iteration, PolicyIteration};
pub use value_iteration::{run_value_iteration, ValueIteration};
