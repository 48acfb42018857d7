//! Error Module - Collector Error Types
//!
//! Defines all error types used in msgc.
//!
//! # Error Categories
//!
//! ## Handle Errors
//! - `UntrackedObject` - Handle is not owned by this collector
//! - `StaleHandle` - Handle refers to an object destroyed by a sweep
//! - `AlreadyTracked` - Object is already owned by this collector
//!
//! ## Root Set Errors
//! - `RootedObject` - Object is still a root and cannot leave the arena
//!
//! ## Phase Errors
//! - `SweepWithoutMark` - Sweep not preceded by a mark phase
//! - `StaleMark` - Graph mutated between mark and sweep
//!
//! ## Configuration Errors
//! - `Configuration` - Invalid configuration
//! - `Internal` - Invariant violation

use crate::config::ConfigError;
use crate::object::ObjectHandle;
use thiserror::Error;

/// Main error type for all collector operations
///
/// # Examples
///
/// ```rust
/// use msgc::GcError;
///
/// fn describe(err: &GcError) -> &'static str {
///     match err {
///         GcError::RootedObject { .. } => "remove the root first",
///         GcError::SweepWithoutMark => "run a mark phase first",
///         _ => "other",
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum GcError {
    /// Handle is not tracked by this collector
    ///
    /// **When returned:** the handle was never tracked here, or it was handed
    /// back to the caller through `remove_allocation`.
    ///
    /// **Recovery strategy:** track (or restore) the object first
    #[error("Object {handle} is not tracked by this collector")]
    UntrackedObject { handle: ObjectHandle },

    /// Handle refers to an object that has been collected
    ///
    /// **When returned:** a sweep destroyed the object. Handles are never
    /// reused, so a collected handle stays stale forever.
    ///
    /// **Recovery strategy:** none, the object is gone
    #[error("Object {handle} was collected")]
    StaleHandle { handle: ObjectHandle },

    /// Object is already tracked
    ///
    /// **When returned:** `restore_allocation` called with an object whose
    /// handle is currently tracked.
    #[error("Object {handle} is already tracked")]
    AlreadyTracked { handle: ObjectHandle },

    /// Object is still in the root set
    ///
    /// **When returned:** `remove_allocation` called on a root. Releasing it
    /// would leave a dangling root behind.
    ///
    /// **Recovery strategy:** call `remove_root` first
    #[error("Object {handle} is still a root; remove the root before releasing it")]
    RootedObject { handle: ObjectHandle },

    /// Sweep requested without a preceding mark phase
    ///
    /// **When returned:** `sweep` called before any `mark_all`, or twice in a
    /// row. Sweeping without marks would destroy every object.
    #[error("Sweep requested without a preceding mark phase")]
    SweepWithoutMark,

    /// Graph mutated after the mark phase
    ///
    /// **When returned:** the object graph or root set changed between
    /// `mark_all` and `sweep`. Objects added after the mark would be
    /// unmarked and wrongly destroyed.
    ///
    /// **Recovery strategy:** run `mark_all` again
    #[error("Mark results are stale: marked at epoch {marked_epoch}, graph is at epoch {current_epoch}")]
    StaleMark {
        marked_epoch: u64,
        current_epoch: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error - indicates a bug in msgc
    ///
    /// **When returned:** invariant violation, e.g. the handle table points at
    /// an empty slot
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GcError {
    /// Check if this error is recoverable by the caller
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GcError::RootedObject { .. }
                | GcError::SweepWithoutMark
                | GcError::StaleMark { .. }
                | GcError::AlreadyTracked { .. }
        )
    }

    /// Check if this error indicates a bug in the code
    pub fn is_bug(&self) -> bool {
        matches!(self, GcError::Internal(_))
    }

    /// Handle involved in the error, if any
    pub fn handle(&self) -> Option<ObjectHandle> {
        match self {
            GcError::UntrackedObject { handle }
            | GcError::StaleHandle { handle }
            | GcError::AlreadyTracked { handle }
            | GcError::RootedObject { handle } => Some(*handle),
            _ => None,
        }
    }
}

impl From<ConfigError> for GcError {
    fn from(err: ConfigError) -> Self {
        GcError::Configuration(err.to_string())
    }
}

/// Result type alias for collector operations
pub type Result<T> = std::result::Result<T, GcError>;
