//! The root decorator.
//!
//! [`Root`] sits at the top of every [`Tree`](crate::Tree) and turns a single
//! tree run into as many child visits as it takes to reach a terminal status.

use crate::decorator::{ChildSlot, Decorator};
use crate::node::{Node, NodeState};
use crate::Status;

/// Entry point of a [`Tree`](crate::Tree).
///
/// Re-visits its child until the child reports a terminal status, so one run
/// of the root is one full tick-to-terminal cycle. This is the engine's only
/// busy loop; progress across iterations comes from the completion cache and
/// from [`Async`](crate::Async) nodes polling their background work.
///
/// The root is run directly by the tree and is never marked completed.
pub struct Root {
    state: NodeState,
    child: ChildSlot,
}

impl Root {
    pub fn new() -> Self {
        Self {
            state: NodeState::new("Root"),
            child: ChildSlot::default(),
        }
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Root {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        loop {
            let status = self.child.visit(self.state.name());
            if status.is_terminal() {
                return status;
            }
        }
    }

    fn reset(&mut self) {
        self.state.clear();
        self.child.reset();
    }
}

impl Decorator for Root {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}
