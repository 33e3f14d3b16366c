//! Core node trait and the completion cache.
//!
//! Every node in a tree implements [`Node`]. Parents never call a child's
//! [`Node::run`] directly; they go through [`visit`], which consults the
//! child's completion cache so that a tree ticked several times resumes where
//! it left off instead of restarting finished subtrees.

use std::borrow::Cow;

use crate::Status;

/// Bookkeeping shared by every node: display name, skip policy and the
/// completion cache.
#[derive(Debug, Clone)]
pub struct NodeState {
    name: Cow<'static, str>,
    dont_skip: bool,
    completed: bool,
    last_status: Status,
}

impl NodeState {
    /// Creates the state of a node that participates in completion caching.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            dont_skip: false,
            completed: false,
            last_status: Status::NotRun,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if the node must be re-run on every visit, ignoring the cache.
    pub fn dont_skip(&self) -> bool {
        self.dont_skip
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn last_status(&self) -> Status {
        self.last_status
    }

    /// Forgets the cached outcome so the node runs again on its next visit.
    pub fn clear(&mut self) {
        self.completed = false;
        self.last_status = Status::NotRun;
    }

    pub(crate) fn rename(&mut self, name: Cow<'static, str>) {
        self.name = name;
    }

    pub(crate) fn set_dont_skip(&mut self) {
        self.dont_skip = true;
    }

    fn record(&mut self, status: Status) {
        self.last_status = status;
    }

    fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// A behavior tree node.
///
/// Implementors provide [`Node::tick`], the node's own behaviour, and expose
/// their [`NodeState`]. The remaining methods are provided and should not be
/// overridden: [`Node::run`] records the status produced by `tick`, and the
/// accessors read the shared state.
///
/// Nodes are `Send` because an [`Async`](crate::Async) ancestor may move a
/// subtree onto a worker thread.
pub trait Node: Send {
    fn state(&self) -> &NodeState;

    fn state_mut(&mut self) -> &mut NodeState;

    /// Performs the node's behaviour for the current tick.
    fn tick(&mut self) -> Status;

    /// Clears the completion cache of this node and of its whole subtree.
    ///
    /// Composites and decorators override this to recurse into children.
    fn reset(&mut self) {
        self.state_mut().clear();
    }

    /// Runs the node once and records the produced status as
    /// [`Node::last_status`].
    ///
    /// A behaviour reporting `NotRun` breaks the node contract and is
    /// recorded as `Error`.
    fn run(&mut self) -> Status {
        let mut status = self.tick();
        if status == Status::NotRun {
            tracing::warn!(node = self.name(), "node reported NOT_RUN, treating as ERROR");
            status = Status::Error;
        }
        self.state_mut().record(status);
        status
    }

    fn name(&self) -> &str {
        self.state().name()
    }

    fn dont_skip(&self) -> bool {
        self.state().dont_skip()
    }

    fn is_completed(&self) -> bool {
        self.state().is_completed()
    }

    fn last_status(&self) -> Status {
        self.state().last_status()
    }
}

/// Visits a child node on behalf of its parent.
///
/// - `dont_skip` children are always run.
/// - Completed children are not run; their cached status is returned.
/// - Otherwise the child runs, and a terminal status marks it completed.
pub fn visit(child: &mut dyn Node) -> Status {
    if child.dont_skip() {
        let status = child.run();
        tracing::trace!(node = child.name(), %status, "visited (never skipped)");
        return status;
    }

    if child.is_completed() {
        let status = child.last_status();
        tracing::trace!(node = child.name(), %status, "visited (cached)");
        return status;
    }

    let status = child.run();
    if status.is_terminal() {
        child.state_mut().mark_completed();
    }
    tracing::trace!(node = child.name(), %status, "visited");
    status
}

/// Construction helpers available on every concrete node.
pub trait NodeExt: Node + Sized + 'static {
    /// Replaces the node's display name.
    fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.state_mut().rename(name.into());
        self
    }

    /// Makes the node bypass the completion cache: it is re-run on every
    /// visit.
    fn never_skip(mut self) -> Self {
        self.state_mut().set_dont_skip();
        self
    }

    fn boxed(self) -> Box<dyn Node> {
        Box::new(self)
    }
}

impl<N: Node + 'static> NodeExt for N {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        state: NodeState,
        script: Vec<Status>,
        calls: usize,
    }

    impl Scripted {
        fn new(script: Vec<Status>) -> Self {
            Self {
                state: NodeState::new("Scripted"),
                script,
                calls: 0,
            }
        }
    }

    impl Node for Scripted {
        fn state(&self) -> &NodeState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut NodeState {
            &mut self.state
        }

        fn tick(&mut self) -> Status {
            let status = self.script[self.calls.min(self.script.len() - 1)];
            self.calls += 1;
            status
        }
    }

    #[test]
    fn fresh_node_has_not_run() {
        let node = Scripted::new(vec![Status::Success]);
        assert!(!node.is_completed());
        assert_eq!(node.last_status(), Status::NotRun);
        assert_eq!(node.name(), "Scripted");
    }

    #[test]
    fn completed_node_is_never_run_again() {
        let mut node = Scripted::new(vec![Status::Failure, Status::Success]);

        assert_eq!(visit(&mut node), Status::Failure);
        assert!(node.is_completed());

        for _ in 0..3 {
            assert_eq!(visit(&mut node), Status::Failure);
        }
        assert_eq!(node.calls, 1);
    }

    #[test]
    fn running_node_is_revisited() {
        let mut node = Scripted::new(vec![Status::Running, Status::Running, Status::Success]);

        assert_eq!(visit(&mut node), Status::Running);
        assert!(!node.is_completed());
        assert_eq!(visit(&mut node), Status::Running);
        assert_eq!(visit(&mut node), Status::Success);
        assert!(node.is_completed());
        assert_eq!(node.calls, 3);
    }

    #[test]
    fn never_skip_node_ignores_the_cache() {
        let mut node = Scripted::new(vec![Status::Success, Status::Failure]).never_skip();

        assert_eq!(visit(&mut node), Status::Success);
        assert_eq!(visit(&mut node), Status::Failure);
        assert_eq!(visit(&mut node), Status::Failure);
        assert_eq!(node.calls, 3);
        assert!(!node.is_completed());
        assert_eq!(node.last_status(), Status::Failure);
    }

    #[test]
    fn not_run_from_behaviour_becomes_error() {
        let mut node = Scripted::new(vec![Status::NotRun]);
        assert_eq!(visit(&mut node), Status::Error);
        assert_eq!(node.last_status(), Status::Error);
    }

    #[test]
    fn reset_clears_the_cache() {
        let mut node = Scripted::new(vec![Status::Success]).named("probe");
        visit(&mut node);
        node.reset();

        assert_eq!(node.name(), "probe");
        assert!(!node.is_completed());
        assert_eq!(node.last_status(), Status::NotRun);
        visit(&mut node);
        assert_eq!(node.calls, 2);
    }
}
