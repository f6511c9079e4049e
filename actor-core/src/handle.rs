//! The 32-bit actor handle and its reserved system sentinel.

/// Opaque 32-bit identifier for an actor.
///
/// Handles are allocated monotonically by [`crate::registry::Registry`]
/// and are not reused unless the allocator's counter wraps past 2^32.
pub type Handle = u32;

/// Sentinel source used for runtime-generated lifecycle messages
/// (`CREATE`, `RELEASE`). Never allocated to a real actor: the registry's
/// handle counter starts at 1, so slot 0 is structurally unreachable.
pub const SYS_HANDLE: Handle = 0;
