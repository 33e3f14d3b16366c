//! Decorators that rewrite their child's outcome: [`Invert`] (NOT logic),
//! [`Succeed`] and [`Fail`] (outcome forcing).
//!
//! `Running` and `Error` always pass through untouched.

use crate::decorator::{ChildSlot, Decorator};
use crate::node::{Node, NodeState};
use crate::Status;

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - `Running` and `Error` are returned unchanged
///
/// This is analogous to a logical NOT (!) operation.
pub struct Invert {
    state: NodeState,
    child: ChildSlot,
}

impl Invert {
    pub fn new() -> Self {
        Self {
            state: NodeState::new("Invert"),
            child: ChildSlot::default(),
        }
    }
}

impl Default for Invert {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Invert {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        self.child.visit(self.state.name()).invert()
    }

    fn reset(&mut self) {
        self.state.clear();
        self.child.reset();
    }
}

impl Decorator for Invert {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}

/// Returns `Success` once its child has finished, whatever the child's
/// outcome.
///
/// # Semantics
///
/// - `Success` or `Failure` from the child becomes `Success`
/// - `Running` and `Error` are returned unchanged
///
/// This is useful for optional branches where a failure is expected but must
/// not abort the sequence the branch sits on.
pub struct Succeed {
    state: NodeState,
    child: ChildSlot,
}

impl Succeed {
    pub fn new() -> Self {
        Self {
            state: NodeState::new("Succeed"),
            child: ChildSlot::default(),
        }
    }
}

impl Default for Succeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Succeed {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        match self.child.visit(self.state.name()) {
            status @ (Status::Running | Status::Error) => status,
            _ => Status::Success,
        }
    }

    fn reset(&mut self) {
        self.state.clear();
        self.child.reset();
    }
}

impl Decorator for Succeed {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}

/// The opposite of [`Succeed`]: a finished child always yields `Failure`.
pub struct Fail {
    state: NodeState,
    child: ChildSlot,
}

impl Fail {
    pub fn new() -> Self {
        Self {
            state: NodeState::new("Fail"),
            child: ChildSlot::default(),
        }
    }
}

impl Default for Fail {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Fail {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        match self.child.visit(self.state.name()) {
            status @ (Status::Running | Status::Error) => status,
            _ => Status::Failure,
        }
    }

    fn reset(&mut self) {
        self.state.clear();
        self.child.reset();
    }
}

impl Decorator for Fail {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::node::NodeExt;
    use crate::Action;

    fn leaf(status: Status) -> Box<dyn Node> {
        Action::new("leaf", move || status).boxed()
    }

    #[test]
    fn invert_swaps_outcomes() {
        assert_eq!(Invert::new().with_child(leaf(Status::Success)).run(), Status::Failure);
        assert_eq!(Invert::new().with_child(leaf(Status::Failure)).run(), Status::Success);
    }

    #[test]
    fn invert_twice_is_identity() {
        let inner = Invert::new().with_child(leaf(Status::Success)).boxed();
        let mut outer = Invert::new().with_child(inner);
        assert_eq!(outer.run(), Status::Success);
    }

    #[test]
    fn transforms_pass_running_and_error_through() {
        for status in [Status::Running, Status::Error] {
            assert_eq!(Invert::new().with_child(leaf(status)).run(), status);
            assert_eq!(Succeed::new().with_child(leaf(status)).run(), status);
            assert_eq!(Fail::new().with_child(leaf(status)).run(), status);
        }
    }

    #[test]
    fn succeed_forces_success() {
        assert_eq!(Succeed::new().with_child(leaf(Status::Failure)).run(), Status::Success);
        assert_eq!(Succeed::new().with_child(leaf(Status::Success)).run(), Status::Success);
    }

    #[test]
    fn fail_forces_failure() {
        assert_eq!(Fail::new().with_child(leaf(Status::Success)).run(), Status::Failure);
        assert_eq!(Fail::new().with_child(leaf(Status::Failure)).run(), Status::Failure);
    }

    #[test]
    fn missing_child_is_an_error() {
        assert_eq!(Invert::new().run(), Status::Error);
        assert_eq!(Succeed::new().run(), Status::Error);
        assert_eq!(Fail::new().run(), Status::Error);
    }

    #[test]
    fn finished_child_is_not_rerun() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let child = Action::new("count", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Status::Failure
        });
        let mut succeed = Succeed::new().with_child(child.boxed());

        succeed.run();
        succeed.run();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(succeed.child().map(|child| child.last_status()), Some(Status::Failure));
    }
}
