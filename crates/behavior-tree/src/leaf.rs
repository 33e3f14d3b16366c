//! Caller-defined leaf nodes.
//!
//! Leaves have no children. [`Action`] and [`Condition`] wrap caller closures
//! so that most behaviours can be written without implementing [`Node`] by
//! hand. Closures capture whatever blackboard handles they need.

use std::borrow::Cow;

use crate::node::{Node, NodeState};
use crate::Status;

/// Runs a caller closure and returns its status.
///
/// # Example
///
/// ```rust
/// use behavior_tree::{Action, Node, Status};
///
/// let mut walk = Action::new("Walk to door", || Status::Success);
/// assert_eq!(walk.run(), Status::Success);
/// ```
pub struct Action<F> {
    state: NodeState,
    behaviour: F,
}

impl<F> Action<F>
where
    F: FnMut() -> Status + Send,
{
    pub fn new(name: impl Into<Cow<'static, str>>, behaviour: F) -> Self {
        Self {
            state: NodeState::new(name),
            behaviour,
        }
    }
}

impl<F> Node for Action<F>
where
    F: FnMut() -> Status + Send,
{
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        (self.behaviour)()
    }
}

/// Evaluates a caller predicate: `true` is `Success`, `false` is `Failure`.
pub struct Condition<F> {
    state: NodeState,
    predicate: F,
}

impl<F> Condition<F>
where
    F: FnMut() -> bool + Send,
{
    pub fn new(name: impl Into<Cow<'static, str>>, predicate: F) -> Self {
        Self {
            state: NodeState::new(name),
            predicate,
        }
    }
}

impl<F> Node for Condition<F>
where
    F: FnMut() -> bool + Send,
{
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        if (self.predicate)() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn action_records_its_status() {
        let mut action = Action::new("fail", || Status::Failure);
        assert_eq!(action.run(), Status::Failure);
        assert_eq!(action.last_status(), Status::Failure);
        assert_eq!(action.name(), "fail");
    }

    #[test]
    fn action_runs_closure_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut action = Action::new("count", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Status::Success
        });

        action.run();
        action.run();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn condition_maps_bool_to_status() {
        let threshold = 3;
        let mut above = Condition::new("above", move || 5 > threshold);
        let mut below = Condition::new("below", move || 1 > threshold);

        assert_eq!(above.run(), Status::Success);
        assert_eq!(below.run(), Status::Failure);
    }
}
