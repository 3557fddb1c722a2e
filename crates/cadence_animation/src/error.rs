//! Animation error types

use thiserror::Error;

/// Errors raised by steps, groups, sequences and the driver.
///
/// Every variant is a caller bug or invalid input detected synchronously at
/// the offending call. Nothing here is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A timed step was built with a zero, negative or non-finite duration
    #[error("Invalid duration: {0} (must be > 0)")]
    InvalidDuration(f32),

    /// `update()` was called before `start()` captured the initial state
    #[error("Step updated before start()")]
    NotStarted,

    /// `start()` was called on a group that is still running
    #[error("Step already started and still running")]
    AlreadyStarted,

    /// `update()` was called on a sequence that already finished
    #[error("Sequence already finished")]
    AlreadyFinished,

    /// A sequence with no steps was started or updated
    #[error("Sequence has no steps")]
    EmptySequence,

    /// A group's finish state was queried with no children
    #[error("Group has no steps")]
    EmptyGroup,

    /// A finish policy name did not match `first`, `any` or `all`
    #[error("Unknown finish policy: {0}")]
    UnknownFinishPolicy(String),

    /// An easing name did not match any preset
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Validate a step duration.
pub(crate) fn check_duration(duration: f32) -> Result<f32> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(AnimationError::InvalidDuration(duration))
    }
}
