//! Debug assertion macros for the runtime's core invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds.

/// At most one worker thread executes an actor's callback at a time.
///
/// Checked with a thread-local reentrancy guard around callback invocation.
macro_rules! debug_assert_single_execution {
    ($already_running:expr) => {
        debug_assert!(
            !$already_running,
            "actor callback invoked while already running on another thread"
        )
    };
}

/// `is_ready` is true iff the actor is enqueued or being dispatched.
///
/// Checked at enqueue time: an actor already marked ready must not be
/// enqueued a second time.
macro_rules! debug_assert_not_already_ready {
    ($is_ready:expr) => {
        debug_assert!(!$is_ready, "actor enqueued while already ready")
    };
}

/// Release destroys the actor after exactly one `RELEASE` callback.
macro_rules! debug_assert_release_before_destroy {
    ($is_release:expr) => {
        debug_assert!(
            $is_release,
            "actor destroyed without its release flag set"
        )
    };
}

/// The slot being cleared on remove must still hold the actor being
/// removed.
macro_rules! debug_assert_slot_matches {
    ($slot_handle:expr, $expected_handle:expr) => {
        debug_assert!(
            $slot_handle == $expected_handle,
            "registry invariant violated: slot holds handle {} while removing handle {}",
            $slot_handle,
            $expected_handle
        )
    };
}

pub(crate) use debug_assert_not_already_ready;
pub(crate) use debug_assert_release_before_destroy;
pub(crate) use debug_assert_single_execution;
pub(crate) use debug_assert_slot_matches;
