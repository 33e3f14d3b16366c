//! Repeating decorators.
//!
//! Both decorators count the iterations in which their child reached a
//! terminal status. When the child reports `Running`, the decorator reports
//! `Running` too and the next tick resumes the same iteration; every new
//! iteration starts from a reset child so that the completion cache does not
//! replay the previous iteration's outcome.

use crate::decorator::{ChildSlot, Decorator};
use crate::error::TreeError;
use crate::node::{Node, NodeState};
use crate::Status;

#[derive(Debug, Default)]
struct Progress {
    completed: u32,
    in_progress: bool,
}

impl Progress {
    /// Forgets the count unless an iteration is waiting to be resumed.
    fn begin(&mut self) {
        if !self.in_progress {
            self.completed = 0;
        }
    }

    fn iterate(&mut self, child: &mut ChildSlot, owner: &str) -> Status {
        if !self.in_progress {
            child.reset();
        }
        let status = child.visit(owner);
        self.in_progress = status.is_running();
        if status.is_terminal() {
            self.completed = self.completed.saturating_add(1);
        }
        status
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Re-runs its child a fixed number of times, or forever.
///
/// # Semantics
///
/// - `Error` or `Running` from the child stops the loop and is returned
/// - With a limit of `n`, after `n` iterations the child's last status is
///   returned
/// - A limit of zero is a configuration error: the node returns `Error`
///   without running the child. [`Repeat::try_times`] rejects it up front
/// - Without a limit, the loop only ends on `Error` or `Running`, so the child
///   itself must guarantee termination
pub struct Repeat {
    state: NodeState,
    child: ChildSlot,
    limit: Option<u32>,
    progress: Progress,
}

impl Repeat {
    /// `None` repeats until the child errors or suspends.
    pub fn new(limit: Option<u32>) -> Self {
        Self {
            state: NodeState::new("Repeat"),
            child: ChildSlot::default(),
            limit,
            progress: Progress::default(),
        }
    }

    pub fn times(limit: u32) -> Self {
        Self::new(Some(limit))
    }

    pub fn try_times(limit: u32) -> Result<Self, TreeError> {
        if limit == 0 {
            Err(TreeError::ZeroRepetitions)
        } else {
            Ok(Self::times(limit))
        }
    }

    pub fn forever() -> Self {
        Self::new(None)
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Iterations finished during the current (or last) run.
    pub fn iterations(&self) -> u32 {
        self.progress.completed
    }
}

impl Node for Repeat {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        if self.limit == Some(0) {
            tracing::warn!(node = self.state.name(), "repeat limit must be at least one");
            return Status::Error;
        }

        self.progress.begin();

        let mut status = Status::Error;
        while self
            .limit
            .is_none_or(|limit| self.progress.completed < limit)
        {
            status = self.progress.iterate(&mut self.child, self.state.name());
            if status.is_running() || status.is_error() {
                break;
            }
        }
        status
    }

    fn reset(&mut self) {
        self.state.clear();
        self.progress.clear();
        self.child.reset();
    }
}

impl Decorator for Repeat {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}

/// Re-runs its child until it returns the expected exit status.
///
/// # Semantics
///
/// Returns the first of: the exit status, `Error`, or `Running`. The exit
/// status must be `Success` or `Failure`; any other exit status makes the
/// node return `Error` without running the child. Use
/// [`RepeatUntil::try_new`] to reject such a configuration up front.
pub struct RepeatUntil {
    state: NodeState,
    child: ChildSlot,
    exit: Status,
    progress: Progress,
}

impl RepeatUntil {
    pub fn new(exit: Status) -> Self {
        Self {
            state: NodeState::new("RepeatUntil"),
            child: ChildSlot::default(),
            exit,
            progress: Progress::default(),
        }
    }

    pub fn try_new(exit: Status) -> Result<Self, TreeError> {
        if is_valid_exit(exit) {
            Ok(Self::new(exit))
        } else {
            Err(TreeError::InvalidExitStatus(exit))
        }
    }

    pub fn exit_status(&self) -> Status {
        self.exit
    }

    pub fn iterations(&self) -> u32 {
        self.progress.completed
    }
}

fn is_valid_exit(exit: Status) -> bool {
    matches!(exit, Status::Success | Status::Failure)
}

impl Node for RepeatUntil {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        if !is_valid_exit(self.exit) {
            tracing::warn!(
                node = self.state.name(),
                exit = %self.exit,
                "exit status must be SUCCESS or FAILURE"
            );
            return Status::Error;
        }

        self.progress.begin();
        loop {
            let status = self.progress.iterate(&mut self.child, self.state.name());
            if status == self.exit || status.is_running() || status.is_error() {
                return status;
            }
        }
    }

    fn reset(&mut self) {
        self.state.clear();
        self.progress.clear();
        self.child.reset();
    }
}

impl Decorator for RepeatUntil {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}
