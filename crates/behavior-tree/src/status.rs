//! Status returned by behavior nodes.

/// The result of running a behavior node.
///
/// `Running` is the only non-terminal status. Every other variant is final
/// for the node that produced it: once a (non `dont_skip`) node reports a
/// terminal status, its parent caches it and never runs the node again.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Status {
    /// Something exceptional happened: a leaf faulted or a decorator
    /// invariant was violated. Propagates upward immediately.
    Error,

    /// The behavior did not succeed. An expected, recoverable outcome.
    Failure,

    /// The behavior completed successfully.
    Success,

    /// The behavior has not finished yet and must be revisited.
    Running,

    /// The node has never produced a status.
    #[default]
    NotRun,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` if this status is `Error`.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Status::Error)
    }

    /// Returns `true` for every status except `Running`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Swaps `Success` and `Failure`; every other status passes through.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }
}
