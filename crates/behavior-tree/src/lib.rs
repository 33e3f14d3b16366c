//! Behavior tree engine with completion caching and background subtrees.
//!
//! A tree is ticked until it reaches a terminal status. Nodes that already
//! finished are not run again on later ticks: their cached status is replayed,
//! so a tree that is waiting on slow work resumes where it left off. The
//! [`Async`] decorator is the only suspension point; it runs its subtree on a
//! worker thread and reports `Running` until the subtree is done.
//!
//! # Architecture
//!
//! - [`Node`]: core trait for all nodes, [`visit`] applies the completion cache
//! - [`Status`]: `Error`, `Failure`, `Success`, `Running`, `NotRun`
//! - Composite nodes: [`Sequence`], [`Select`]
//! - Decorator nodes: [`Invert`], [`Succeed`], [`Fail`], [`Repeat`],
//!   [`RepeatUntil`], [`Async`], [`Sleep`], [`Root`]
//! - Leaves: [`Action`], [`Condition`] and the blackboard leaves in [`memory`]
//! - [`Tree`]: owns the root and drives a run to completion
//!
//! # Example
//!
//! ```rust
//! use behavior_tree::builder::{action, repeat_until, sequence};
//! use behavior_tree::{Status, Tree};
//!
//! let mut attempts = 0;
//! let mut tree = Tree::with_root_child(sequence(vec![
//!     action("Walk to door", || Status::Success),
//!     repeat_until(
//!         Status::Success,
//!         action("Unlock door", move || {
//!             attempts += 1;
//!             if attempts < 3 { Status::Failure } else { Status::Success }
//!         }),
//!     ),
//! ]));
//!
//! assert_eq!(tree.run(), Status::Success);
//! ```

pub mod builder;
pub mod composite;
pub mod container;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod memory;
pub mod node;
pub mod status;
pub mod tree;

pub use composite::{Select, Sequence};
pub use container::{BlockingContainer, BoundedContainer, ContainerConfig, Discipline};
pub use decorator::{
    Async, AsyncConfig, ChildSlot, Decorator, Fail, Invert, Repeat, RepeatUntil, Root, Sleep,
    Succeed,
};
pub use error::{ContainerError, TreeError};
pub use leaf::{Action, Condition};
pub use memory::{
    AssignContainer, ContainerIsEmpty, IsNull, PopFromContainer, PushToContainer, SetVariable,
    Slot,
};
pub use node::{Node, NodeExt, NodeState, visit};
pub use status::Status;
pub use tree::Tree;
