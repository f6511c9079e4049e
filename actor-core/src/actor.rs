//! The [`Actor`] trait and the per-actor record.
//!
//! The C contract passes a function pointer plus an opaque `user_data`
//! pointer to every callback invocation. The idiomatic replacement is a
//! trait object: the actor's private state lives inside the type that
//! implements `Actor`, so there is no separate pointer to keep in sync with
//! it. [`ActorContext`] takes the place of the callback's `self_handle`
//! parameter and additionally lets an actor send or release from within its
//! own handler, rather than leaving that as a side channel back into the
//! runtime.

use crate::error::{ReleaseError, SendError};
use crate::handle::Handle;
use crate::mailbox::Mailbox;
use crate::message::Message;
use crate::runtime::ActorRuntime;
use crate::spinlock::Spinlock;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// User-defined per-actor behavior.
///
/// `on_message` is invoked once per dispatch turn: at most once with a
/// synthetic `CREATE` message, any number of times with user messages, and
/// exactly once with a synthetic `RELEASE` message as the actor's last
/// invocation.
pub trait Actor: Send {
    fn on_message(&mut self, ctx: &ActorContext<'_>, msg: &Message);
}

/// Passed to [`Actor::on_message`] in place of the C callback's bare
/// `self_handle` parameter; also exposes the runtime so an actor can act
/// on its own behalf during its turn.
pub struct ActorContext<'a> {
    pub self_handle: Handle,
    runtime: &'a ActorRuntime,
}

impl<'a> ActorContext<'a> {
    pub(crate) fn new(self_handle: Handle, runtime: &'a ActorRuntime) -> Self {
        Self {
            self_handle,
            runtime,
        }
    }

    /// Sends a message from this actor to `target`. See
    /// [`ActorRuntime::send`].
    pub fn send(
        &self,
        target: Handle,
        msg_type: u32,
        session: u64,
        payload: &[u8],
    ) -> Result<(), SendError> {
        self.runtime.send(self.self_handle, target, msg_type, session, payload)
    }

    /// Requests release of any actor, including this one. See
    /// [`ActorRuntime::release`].
    pub fn release(&self, target: Handle) -> Result<(), ReleaseError> {
        self.runtime.release(target)
    }
}

/// `is_ready`/`is_release`, guarded together by the per-actor spinlock:
/// both are read-modify-written as a pair at enqueue and release-request
/// time, so one lock covers both.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorFlags {
    pub is_ready: bool,
    pub is_release: bool,
}

/// The live state behind a [`Handle`].
pub struct ActorRecord {
    pub name: Option<String>,
    pub handle: Handle,
    pub mailbox: Mailbox,
    flags: Spinlock<ActorFlags>,
    /// Reentrancy guard backing `debug_assert_single_execution!`.
    running: AtomicBool,
    actor: UnsafeCell<Box<dyn Actor>>,
}

// SAFETY: `actor` is only ever dereferenced from `dispatch_message`, whose
// caller must guarantee no concurrent callers for the same record (the
// ready-queue protocol in `runtime.rs` is the sole caller and does).
// `flags` and `mailbox` manage their own synchronization.
unsafe impl Send for ActorRecord {}
unsafe impl Sync for ActorRecord {}

impl ActorRecord {
    pub fn new(handle: Handle, name: Option<String>, actor: Box<dyn Actor>) -> Self {
        Self {
            name,
            handle,
            mailbox: Mailbox::new(),
            flags: Spinlock::new(ActorFlags::default()),
            running: AtomicBool::new(false),
            actor: UnsafeCell::new(actor),
        }
    }

    pub fn flags(&self) -> &Spinlock<ActorFlags> {
        &self.flags
    }

    /// Invokes the actor's callback for `msg`.
    ///
    /// # Safety
    ///
    /// The caller must guarantee no other thread is concurrently calling
    /// this for the same record. The ready-queue dispatch protocol in
    /// `runtime.rs` upholds this by construction; this method additionally
    /// checks it with a debug assertion.
    pub(crate) unsafe fn dispatch_message(&self, ctx: &ActorContext<'_>, msg: &Message) {
        let already_running = self.running.swap(true, Ordering::AcqRel);
        crate::invariants::debug_assert_single_execution!(already_running);
        unsafe {
            (*self.actor.get()).on_message(ctx, msg);
        }
        self.running.store(false, Ordering::Release);
    }
}
