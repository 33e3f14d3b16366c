//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result, repeat it,
//! or change how it is executed. The child is attached after construction with
//! [`Decorator::set_child`] (or [`Decorator::with_child`] when building
//! inline). Visiting a decorator whose slot is still empty yields `Error`.

mod async_run;
mod repeat;
mod root;
mod sleep;
mod transform;

pub use async_run::{Async, AsyncConfig};
pub use repeat::{Repeat, RepeatUntil};
pub use root::Root;
pub use sleep::Sleep;
pub use transform::{Fail, Invert, Succeed};

use crate::node::{Node, visit};
use crate::Status;

/// The single, exclusively owned child of a decorator.
#[derive(Default)]
pub struct ChildSlot(Option<Box<dyn Node>>);

impl ChildSlot {
    /// Installs `child`, dropping any previous one together with its subtree.
    pub fn attach(&mut self, child: Box<dyn Node>) {
        self.0 = Some(child);
    }

    pub fn get(&self) -> Option<&dyn Node> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Visits the child through the completion cache. `owner` names the
    /// decorator in diagnostics.
    pub(crate) fn visit(&mut self, owner: &str) -> Status {
        match self.0.as_deref_mut() {
            Some(child) => visit(child),
            None => {
                tracing::warn!(decorator = owner, "decorator visited without a child");
                Status::Error
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        if let Some(child) = self.0.as_deref_mut() {
            child.reset();
        }
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn Node>> {
        self.0.take()
    }

    /// Puts a child back unless another one was attached in the meantime.
    pub(crate) fn restore(&mut self, child: Box<dyn Node>) {
        if self.0.is_none() {
            self.0 = Some(child);
        }
    }
}

/// A node owning exactly one child.
pub trait Decorator: Node {
    fn slot(&self) -> &ChildSlot;

    fn slot_mut(&mut self) -> &mut ChildSlot;

    /// Attaches the decorated child, replacing any previous one.
    fn set_child(&mut self, child: Box<dyn Node>) {
        self.slot_mut().attach(child);
    }

    /// Builder-style [`Decorator::set_child`].
    fn with_child(mut self, child: Box<dyn Node>) -> Self
    where
        Self: Sized,
    {
        self.set_child(child);
        self
    }

    fn child(&self) -> Option<&dyn Node> {
        self.slot().get()
    }
}
