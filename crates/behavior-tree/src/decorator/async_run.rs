//! Background execution of a subtree.
//!
//! [`Async`] moves its child onto a worker thread and waits for the outcome
//! for at most one poll interval per tick. The receiving end of the worker's
//! channel is kept in the node between ticks, so a slow child is polled on
//! every visit but launched only once.

use std::any::Any;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::decorator::{ChildSlot, Decorator};
use crate::node::{Node, NodeState, visit};
use crate::Status;

/// Settings of an [`Async`] decorator.
#[derive(Debug, Clone)]
pub struct AsyncConfig {
    /// Longest time a single tick waits for the background child.
    pub poll_interval: Duration,
    /// Name given to worker threads.
    pub thread_name: String,
}

impl Default for AsyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            thread_name: "bt-async".to_string(),
        }
    }
}

/// The child travels to the worker and comes back with its status.
type Outcome = (Box<dyn Node>, Status);

/// A launched background run that has not been collected yet.
struct InFlight {
    result: Receiver<Outcome>,
    worker: JoinHandle<()>,
}

impl InFlight {
    /// Joins the worker, returning its panic payload if it faulted.
    fn join(self) -> Option<Box<dyn Any + Send>> {
        self.worker.join().err()
    }
}

/// Runs its child on a worker thread, reporting `Running` until it finishes.
///
/// # Semantics
///
/// - A completed (non `dont_skip`) child returns its cached status
/// - Otherwise the child is launched in the background, unless a previous
///   launch is still pending, and the tick waits up to the poll interval
/// - The child's status is returned if it arrives in time, `Running` if not
/// - A worker that panics (or cannot be spawned) yields `Error`; the child is
///   lost with it
///
/// No tick waits longer than one poll interval, [`Node::reset`] included:
/// resetting while a run is pending marks that run stale. Its outcome is
/// discarded when it arrives, and the child is reset and launched again.
///
/// There is no cancellation. Dropping an `Async` node while its child is
/// running leaves the worker thread to finish on its own, holding whatever
/// the child holds until then.
pub struct Async {
    state: NodeState,
    child: ChildSlot,
    config: AsyncConfig,
    in_flight: Option<InFlight>,
    stale: bool,
}

impl Async {
    pub fn new() -> Self {
        Self::with_config(AsyncConfig::default())
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self::with_config(AsyncConfig {
            poll_interval,
            ..AsyncConfig::default()
        })
    }

    pub fn with_config(config: AsyncConfig) -> Self {
        Self {
            state: NodeState::new("Async"),
            child: ChildSlot::default(),
            config,
            in_flight: None,
            stale: false,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval
    }

    /// `true` while a background run of the child has not been collected.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    fn launch(&self, mut child: Box<dyn Node>) -> io::Result<InFlight> {
        let (sender, result) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || {
                let status = visit(child.as_mut());
                // A dropped receiver means the decorator is gone; the child
                // is dropped here instead.
                let _ = sender.send((child, status));
            })?;
        Ok(InFlight { result, worker })
    }

    /// Starts a background run, or answers from the child's cache.
    fn start(&mut self) -> Option<Status> {
        let Some(child) = self.child.take() else {
            tracing::warn!(
                decorator = self.state.name(),
                "decorator visited without a child"
            );
            return Some(Status::Error);
        };

        if !child.dont_skip() && child.is_completed() {
            let status = child.last_status();
            self.child.restore(child);
            return Some(status);
        }

        let child_name = child.name().to_string();
        match self.launch(child) {
            Ok(in_flight) => {
                tracing::debug!(
                    node = self.state.name(),
                    child = %child_name,
                    "launched background child"
                );
                self.in_flight = Some(in_flight);
                None
            }
            Err(err) => {
                tracing::error!(
                    node = self.state.name(),
                    child = %child_name,
                    error = %err,
                    "failed to spawn worker"
                );
                Some(Status::Error)
            }
        }
    }

    /// Waits for the pending run until `deadline`. `None` means the run is
    /// still going.
    fn collect(&mut self, deadline: Instant) -> Option<Outcome> {
        let in_flight = self.in_flight.as_ref()?;
        let wait = deadline.saturating_duration_since(Instant::now());

        match in_flight.result.recv_timeout(wait) {
            Ok(outcome) => {
                if let Some(in_flight) = self.in_flight.take() {
                    in_flight.join();
                }
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                let panic = self.in_flight.take().and_then(InFlight::join);
                tracing::error!(
                    node = self.state.name(),
                    panic = panic.as_deref().map(panic_message),
                    "background child faulted"
                );
                None
            }
        }
    }

    fn poll(&mut self, deadline: Instant) -> Status {
        match self.collect(deadline) {
            Some((child, status)) => {
                tracing::debug!(
                    node = self.state.name(),
                    child = child.name(),
                    %status,
                    "background child finished"
                );
                self.child.restore(child);
                status
            }
            None if self.in_flight.is_some() => Status::Running,
            None => Status::Error,
        }
    }

    /// Collects a run started before the last reset and rearms the child.
    /// Returns the status to report if the stale run is not over yet.
    fn retire_stale(&mut self, deadline: Instant) -> Option<Status> {
        match self.collect(deadline) {
            Some((child, discarded)) => {
                tracing::debug!(
                    node = self.state.name(),
                    child = child.name(),
                    %discarded,
                    "discarded stale background result"
                );
                self.stale = false;
                self.child.restore(child);
                self.child.reset();
                None
            }
            None if self.in_flight.is_some() => Some(Status::Running),
            None => {
                self.stale = false;
                Some(Status::Error)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

impl Default for Async {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Async {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        let deadline = Instant::now() + self.config.poll_interval;

        if self.stale
            && let Some(status) = self.retire_stale(deadline)
        {
            return status;
        }

        if self.in_flight.is_none()
            && let Some(status) = self.start()
        {
            return status;
        }

        self.poll(deadline)
    }

    /// Resets the subtree without waiting. A pending run is left to finish
    /// and becomes stale; the child is reset once it comes back.
    fn reset(&mut self) {
        self.state.clear();
        if self.in_flight.is_some() {
            tracing::debug!(node = self.state.name(), "reset marks background child stale");
            self.stale = true;
        } else {
            self.child.reset();
        }
    }
}

impl Decorator for Async {
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

    fn slow_child(delay: Duration, calls: &Arc<AtomicUsize>) -> Box<dyn Node> {
        let calls = Arc::clone(calls);
        Action::new("slow", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(delay);
            Status::Success
        })
        .boxed()
    }

    #[test]
    fn instant_child_finishes_on_first_tick() {
        let mut node = Async::with_poll_interval(Duration::from_millis(200))
            .with_child(Action::new("instant", || Status::Failure).boxed());

        assert_eq!(node.run(), Status::Failure);
        assert!(!node.is_pending());
        assert!(node.child().is_some_and(|child| child.is_completed()));
    }

    #[test]
    fn slow_child_reports_running_within_poll_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut node = Async::with_poll_interval(Duration::from_millis(10))
            .with_child(slow_child(Duration::from_millis(300), &calls));

        let started = Instant::now();
        assert_eq!(node.run(), Status::Running);
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(node.is_pending());
        assert!(node.child().is_none());
    }

    #[test]
    fn pending_child_is_polled_not_relaunched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut node = Async::with_poll_interval(Duration::from_millis(5))
            .with_child(slow_child(Duration::from_millis(100), &calls));

        let mut ticks = 0;
        let status = loop {
            ticks += 1;
            match node.run() {
                Status::Running => continue,
                other => break other,
            }
        };

        assert_eq!(status, Status::Success);
        assert!(ticks > 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(node.child().is_some());
    }

    #[test]
    fn completed_child_returns_cached_status() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut node = Async::with_poll_interval(Duration::from_millis(500))
            .with_child(slow_child(Duration::ZERO, &calls));

        assert_eq!(node.run(), Status::Success);
        assert_eq!(node.run(), Status::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn never_skip_child_is_relaunched_after_finishing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let child = {
            let calls = Arc::clone(&calls);
            Action::new("again", move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Status::Success
            })
            .never_skip()
        };
        let mut node =
            Async::with_poll_interval(Duration::from_millis(500)).with_child(child.boxed());

        node.run();
        node.run();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_child_is_an_error() {
        let mut node = Async::with_poll_interval(Duration::from_millis(500))
            .with_child(Action::new("boom", || panic!("boom")).boxed());

        assert_eq!(node.run(), Status::Error);
        assert!(!node.is_pending());
        assert!(node.child().is_none());
        // Without a child every further visit is an error too.
        assert_eq!(node.run(), Status::Error);
    }

    #[test]
    fn missing_child_is_an_error() {
        assert_eq!(Async::new().run(), Status::Error);
    }

    #[test]
    fn reset_does_not_wait_for_pending_child() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut node = Async::with_poll_interval(Duration::from_millis(1))
            .with_child(slow_child(Duration::from_millis(150), &calls));

        assert_eq!(node.run(), Status::Running);
        let started = Instant::now();
        node.reset();

        assert!(started.elapsed() < Duration::from_millis(50));
        assert!(node.is_pending());
        assert_eq!(node.last_status(), Status::NotRun);
    }

    #[test]
    fn stale_run_is_discarded_and_child_relaunched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let child = {
            let calls = Arc::clone(&calls);
            Action::new("flip", move || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(100));
                if call == 0 { Status::Failure } else { Status::Success }
            })
        };
        let mut node =
            Async::with_poll_interval(Duration::from_millis(2)).with_child(child.boxed());

        assert_eq!(node.run(), Status::Running);
        node.reset();

        let status = loop {
            let started = Instant::now();
            let status = node.run();
            assert!(started.elapsed() < Duration::from_millis(60));
            if status != Status::Running {
                break status;
            }
        };

        assert_eq!(status, Status::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!node.is_pending());
    }
}
