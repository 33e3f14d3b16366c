//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of an ordered list of children.
//! This module provides the two fundamental building blocks: [`Sequence`]
//! (AND logic) and [`Select`] (OR logic). Both visit children strictly left to
//! right through [`visit`], so children that already finished on an earlier
//! tick contribute their cached status instead of running again.

use crate::node::{Node, NodeState, visit};
use crate::Status;

/// Ordered, exclusively owned children of a composite.
struct Children(Vec<Box<dyn Node>>);

impl Children {
    fn reset(&mut self) {
        for child in &mut self.0 {
            child.reset();
        }
    }
}

/// Executes child behaviors in order until one does not succeed.
///
/// # Semantics
///
/// - `Failure` or `Error` from a child stops the sequence, which returns it
/// - `Running` from a child stops the sequence, which returns `Running`
/// - `Success` moves on to the next child
/// - If all children succeed (or there are none), the sequence succeeds
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence {
    state: NodeState,
    children: Children,
}

impl Sequence {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// An empty sequence is allowed and succeeds (vacuous AND).
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self {
            state: NodeState::new("Sequence"),
            children: Children(children),
        }
    }

    /// Appends a child; it is evaluated after the existing ones.
    pub fn add_child(&mut self, child: Box<dyn Node>) {
        self.children.0.push(child);
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = Box<dyn Node>>) {
        self.children.0.extend(children);
    }

    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children.0
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Node for Sequence {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        for child in &mut self.children.0 {
            match visit(child.as_mut()) {
                Status::Success => continue,
                other => return other,
            }
        }
        Status::Success
    }

    fn reset(&mut self) {
        self.state.clear();
        self.children.reset();
    }
}

/// Executes child behaviors in order until one succeeds.
///
/// # Semantics
///
/// - `Success` or `Error` from a child stops the select, which returns it
/// - `Running` from a child is remembered, and the remaining children are
///   still visited
/// - `Failure` moves on to the next child
/// - When the scan ends: `Running` if any child was running, otherwise
///   `Failure` (including when there are no children, vacuous OR)
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Select {
    state: NodeState,
    children: Children,
}

impl Select {
    /// Creates a new select with the given child behaviors.
    ///
    /// An empty select is allowed and fails (vacuous OR).
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self {
            state: NodeState::new("Select"),
            children: Children(children),
        }
    }

    pub fn add_child(&mut self, child: Box<dyn Node>) {
        self.children.0.push(child);
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = Box<dyn Node>>) {
        self.children.0.extend(children);
    }

    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children.0
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Node for Select {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        let mut has_running_child = false;
        for child in &mut self.children.0 {
            match visit(child.as_mut()) {
                status @ (Status::Success | Status::Error) => return status,
                Status::Running => has_running_child = true,
                _ => continue,
            }
        }

        if has_running_child {
            Status::Running
        } else {
            Status::Failure
        }
    }

    fn reset(&mut self) {
        self.state.clear();
        self.children.reset();
    }
}
