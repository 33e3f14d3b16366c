//! The tree entry point.
//!
//! [`Tree`] owns the [`Root`] decorator and exposes the run / reset cycle to
//! callers; everything below the root is an ordinary node.

use crate::decorator::{Decorator, Root};
use crate::error::TreeError;
use crate::node::Node;
use crate::Status;

/// A behavior tree: a [`Root`] and the subtree hanging below it.
///
/// [`Tree::run`] ticks the tree until it reaches a terminal status. Finished
/// subtrees stay cached, so running a finished tree again returns its cached
/// result; call [`Tree::reset`] to re-execute from scratch.
#[derive(Default)]
pub struct Tree {
    root: Root,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_child(child: Box<dyn Node>) -> Self {
        let mut tree = Self::new();
        tree.set_root_child(child);
        tree
    }

    pub fn set_root_child(&mut self, child: Box<dyn Node>) {
        self.root.set_child(child);
    }

    /// Runs the tree to a terminal status. Never returns `Running` or
    /// `NotRun`; a tree without a root child reports `Error`.
    pub fn run(&mut self) -> Status {
        let status = self.root.run();
        tracing::debug!(%status, "tree finished");
        status
    }

    /// Like [`Tree::run`], but reports a missing root child as a typed
    /// error instead of the `Error` status.
    pub fn try_run(&mut self) -> Result<Status, TreeError> {
        if self.root.child().is_none() {
            return Err(TreeError::MissingRootChild);
        }
        Ok(self.run())
    }

    /// Clears every completion cache in the tree.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn root(&self) -> &Root {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::node::NodeExt;
    use crate::{Action, Sequence};

    fn counting(status: Status, calls: &Arc<AtomicUsize>) -> Box<dyn Node> {
        let calls = Arc::clone(calls);
        Action::new("counting", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            status
        })
        .boxed()
    }

    #[test]
    fn empty_tree_is_an_error() {
        let mut tree = Tree::new();
        assert_eq!(tree.run(), Status::Error);
        assert_eq!(tree.try_run(), Err(TreeError::MissingRootChild));
    }

    #[test]
    fn run_loops_until_terminal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut tree = Tree::with_root_child(
            Action::new("eventually", move || {
                if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                    Status::Running
                } else {
                    Status::Success
                }
            })
            .boxed(),
        );

        assert_eq!(tree.try_run(), Ok(Status::Success));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn finished_tree_returns_cached_status() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut tree = Tree::with_root_child(counting(Status::Failure, &calls));

        assert_eq!(tree.run(), Status::Failure);
        assert_eq!(tree.run(), Status::Failure);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_re_executes_the_tree() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut tree = Tree::with_root_child(
            Sequence::new(vec![
                counting(Status::Success, &calls),
                counting(Status::Success, &calls),
            ])
            .boxed(),
        );

        assert_eq!(tree.run(), Status::Success);
        tree.reset();
        assert_eq!(tree.root().last_status(), Status::NotRun);
        assert_eq!(tree.run(), Status::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
