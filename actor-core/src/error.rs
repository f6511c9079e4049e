//! Fallible, non-fatal error paths.
//!
//! Resource exhaustion and allocator failure are deliberately *not*
//! represented here: both are treated as programming errors that abort
//! the process via `assert!`/`panic!`, not recoverable `Result`s.

use crate::handle::Handle;
use thiserror::Error;

/// Returned by [`crate::runtime::ActorRuntime::send`].
///
/// Corresponds to the C contract's `-1` return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// `target` does not name a live actor.
    #[error("unknown target handle {0}")]
    UnknownTarget(Handle),
}

/// Returned by [`crate::runtime::ActorRuntime::release`].
///
/// Corresponds to the C contract's `-1` return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReleaseError {
    /// `handle` does not name a live actor.
    #[error("unknown handle {0}")]
    UnknownHandle(Handle),
}

/// Returned by [`crate::runtime::ActorRuntime::create`].
///
/// Corresponds to the C contract's `0` return (handle 0 is never valid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreateError {
    /// `exit()` has already been called; no further actors may be created.
    #[error("runtime is shutting down, cannot create new actors")]
    ShuttingDown,
}
