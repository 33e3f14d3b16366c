//! Fixed delays inside a tree.

use std::thread;
use std::time::Duration;

use crate::decorator::{ChildSlot, Decorator};
use crate::node::{Node, NodeState};
use crate::Status;

/// Blocks the ticking thread for a fixed delay, then succeeds.
///
/// The child slot exists for uniformity with the other decorators but is
/// never consulted.
pub struct Sleep {
    state: NodeState,
    child: ChildSlot,
    delay: Duration,
}

impl Sleep {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1);

    pub fn new(delay: Duration) -> Self {
        Self {
            state: NodeState::new("Sleep"),
            child: ChildSlot::default(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for Sleep {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl Node for Sleep {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn tick(&mut self) -> Status {
        thread::sleep(self.delay);
        Status::Success
    }

    fn reset(&mut self) {
        self.state.clear();
        self.child.reset();
    }
}

impl Decorator for Sleep {
    fn slot(&self) -> &ChildSlot {
        &self.child
    }

    fn slot_mut(&mut self) -> &mut ChildSlot {
        &mut self.child
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn sleeps_then_succeeds_without_a_child() {
        let mut sleep = Sleep::new(Duration::from_millis(20));
        let started = Instant::now();

        assert_eq!(sleep.run(), Status::Success);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn default_delay_is_one_millisecond() {
        assert_eq!(Sleep::default().delay(), Duration::from_millis(1));
    }
}
