use crate::*;

/// Maps an observed state to the action to take, if the policy knows one.
pub trait Policy {
    fn policy(&self, s: &Discrete) -> Option<Discrete>;
}
