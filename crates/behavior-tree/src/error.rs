//! Error types surfaced to Rust callers.
//!
//! Faults that happen while a tree is ticking are reported through the
//! `Error` status, never through these types. They cover construction-time
//! mistakes and the blocking container operations, where a caller can react.

use thiserror::Error;

use crate::Status;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("tree has no root child")]
    MissingRootChild,

    #[error("repeat limit must be at least one")]
    ZeroRepetitions,

    #[error("repeat-until exit status must be SUCCESS or FAILURE, got {0}")]
    InvalidExitStatus(Status),
}

/// Errors raised by [`BoundedContainer`](crate::BoundedContainer) operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("container is full (capacity {capacity})")]
    Full { capacity: usize },

    #[error("container is empty")]
    Empty,

    #[error("{len} items do not fit in a container of capacity {capacity}")]
    Overflow { len: usize, capacity: usize },
}
