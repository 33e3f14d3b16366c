//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing `Box::new(Invert::new().with_child(...))`, trees can be
//! spelled out with short functions that return ready boxed nodes:
//!
//! ```rust
//! use behavior_tree::builder::{action, invert, select, sequence};
//! use behavior_tree::{Status, Tree};
//!
//! let mut tree = Tree::with_root_child(sequence(vec![
//!     action("Walk to door", || Status::Success),
//!     select(vec![
//!         action("Open door", || Status::Failure),
//!         action("Smash door", || Status::Success),
//!     ]),
//!     invert(action("Door is locked", || Status::Failure)),
//! ]));
//! assert_eq!(tree.run(), Status::Success);
//! ```

use std::borrow::Cow;
use std::time::Duration;

use crate::{
    Action, Async, Condition, Decorator, Fail, Invert, Node, Repeat, RepeatUntil, Select,
    Sequence, Sleep, Status, Succeed,
};

/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence(children: Vec<Box<dyn Node>>) -> Box<dyn Node> {
    Box::new(Sequence::new(children))
}

/// Shorthand for `Box::new(Select::new(children))`.
#[inline]
pub fn select(children: Vec<Box<dyn Node>>) -> Box<dyn Node> {
    Box::new(Select::new(children))
}

#[inline]
pub fn invert(child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(Invert::new().with_child(child))
}

#[inline]
pub fn succeed(child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(Succeed::new().with_child(child))
}

#[inline]
pub fn fail(child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(Fail::new().with_child(child))
}

/// Repeats `child` `times` times.
#[inline]
pub fn repeat(times: u32, child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(Repeat::times(times).with_child(child))
}

#[inline]
pub fn repeat_forever(child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(Repeat::forever().with_child(child))
}

/// Repeats `child` until it returns `exit`.
///
/// An `exit` other than `Success` or `Failure` builds a node that always
/// reports `Error`; see [`RepeatUntil::try_new`].
#[inline]
pub fn repeat_until(exit: Status, child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(RepeatUntil::new(exit).with_child(child))
}

/// Runs `child` in the background with the default poll interval.
#[inline]
pub fn run_async(child: Box<dyn Node>) -> Box<dyn Node> {
    Box::new(Async::new().with_child(child))
}

#[inline]
pub fn sleep(delay: Duration) -> Box<dyn Node> {
    Box::new(Sleep::new(delay))
}

#[inline]
pub fn action<F>(name: impl Into<Cow<'static, str>>, behaviour: F) -> Box<dyn Node>
where
    F: FnMut() -> Status + Send + 'static,
{
    Box::new(Action::new(name, behaviour))
}

#[inline]
pub fn condition<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Box<dyn Node>
where
    F: FnMut() -> bool + Send + 'static,
{
    Box::new(Condition::new(name, predicate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose_a_tree() {
        let mut root = sequence(vec![
            succeed(action("fails", || Status::Failure)),
            invert(fail(condition("true", || true))),
            repeat(2, action("ok", || Status::Success)),
            repeat_until(Status::Success, action("ok", || Status::Success)),
        ]);

        assert_eq!(root.run(), Status::Success);
        assert_eq!(root.name(), "Sequence");
    }

    #[test]
    fn select_and_sleep() {
        let mut root = select(vec![
            action("no", || Status::Failure),
            sleep(Duration::ZERO),
        ]);
        assert_eq!(root.run(), Status::Success);
    }

    #[test]
    fn run_async_reports_child_status() {
        let mut node = run_async(action("quick", || Status::Failure));
        let status = loop {
            match node.run() {
                Status::Running => continue,
                other => break other,
            }
        };
        assert_eq!(status, Status::Failure);
    }
}
