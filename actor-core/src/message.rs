//! The message record delivered to actor callbacks.

use crate::handle::Handle;

/// Reserved message-type tag for an actor's first message.
///
/// Chosen at the high end of the `u32` range so ordinary user-defined
/// type tags (typically small, densely-assigned integers) never collide
/// with it by accident.
pub const CREATE: u32 = u32::MAX;

/// Reserved message-type tag for an actor's last message.
pub const RELEASE: u32 = u32::MAX - 1;

/// A single message delivered through a mailbox.
///
/// Payloads are copied at send time: the sender's buffer is never
/// aliased by the mailbox.
#[derive(Debug, Clone)]
pub struct Message {
    /// The actor that sent this message, or [`crate::handle::SYS_HANDLE`]
    /// for runtime-generated `CREATE`/`RELEASE` messages.
    pub source: Handle,
    /// Integer tag identifying the message kind. [`CREATE`] and
    /// [`RELEASE`] are reserved; all other values are user-defined.
    pub msg_type: u32,
    /// Opaque correlation id, untouched by the runtime.
    pub session: u64,
    /// Owned copy of the payload bytes. Empty for `RELEASE` and for
    /// sends with no data.
    pub payload: Box<[u8]>,
}

impl Message {
    /// Builds a user message, copying `payload` into an owned buffer.
    pub fn user(source: Handle, msg_type: u32, session: u64, payload: &[u8]) -> Self {
        debug_assert!(
            msg_type != CREATE && msg_type != RELEASE,
            "user-defined message types must not collide with the reserved CREATE/RELEASE tags"
        );
        Self {
            source,
            msg_type,
            session,
            payload: payload.into(),
        }
    }

    /// Builds the synthetic `CREATE` message an actor receives first.
    pub(crate) fn create(bootstrap_payload: &[u8]) -> Self {
        Self {
            source: crate::handle::SYS_HANDLE,
            msg_type: CREATE,
            session: 0,
            payload: bootstrap_payload.into(),
        }
    }

    /// Builds the synthetic `RELEASE` message an actor receives last.
    pub(crate) fn release() -> Self {
        Self {
            source: crate::handle::SYS_HANDLE,
            msg_type: RELEASE,
            session: 0,
            payload: Box::new([]),
        }
    }

    /// Number of payload bytes (mirrors the C API's separate `payload_size`).
    #[inline]
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }
}
