//! External interface: `init`/`exit`/`free`/`create`/`release`/`send`/`dispatch`.
//!
//! The worker-thread loop that calls `dispatch()` in a loop is deliberately
//! *not* provided here — idle backoff and thread ownership belong to the
//! host program, not the core. `actor-demo` shows the pattern: a small loop
//! around `dispatch()` using the crate's own [`crate::backoff::Backoff`].

use crate::actor::{Actor, ActorContext, ActorRecord};
use crate::config::RuntimeConfig;
use crate::error::{CreateError, ReleaseError, SendError};
use crate::handle::Handle;
use crate::invariants::{debug_assert_not_already_ready, debug_assert_release_before_destroy};
use crate::message::Message;
use crate::ready_queue::ReadyQueue;
use crate::registry::Registry;
use std::sync::Arc;

/// Result of one [`ActorRuntime::dispatch`] turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The ready queue was empty; nothing to do.
    Idle,
    /// One message was delivered and the actor is still live.
    Dispatched,
    /// The actor received its `RELEASE` message and was destroyed.
    Released,
}

/// The process-wide actor runtime: an explicit, constructible object
/// threaded through the API rather than module-level statics.
pub struct ActorRuntime {
    registry: Registry,
    ready_queue: ReadyQueue,
}

impl ActorRuntime {
    /// One-time initialization.
    pub fn init(config: RuntimeConfig) -> Arc<Self> {
        Arc::new(Self {
            registry: Registry::new(&config),
            ready_queue: ReadyQueue::new(config.ready_queue_capacity()),
        })
    }

    /// Registers a new actor and enqueues its synthetic `CREATE` message
    /// as the first entry in its mailbox.
    ///
    /// Returns [`CreateError::ShuttingDown`] once [`Self::exit`] has been
    /// called. The exiting check and the insert happen under the
    /// registry's single write-lock acquisition, so this can never race a
    /// concurrent `exit()`'s release sweep: either this call is rejected,
    /// or it completes first and the new actor is included in the sweep.
    pub fn create(
        &self,
        name: Option<String>,
        actor: Box<dyn Actor>,
        bootstrap_payload: &[u8],
    ) -> Result<Handle, CreateError> {
        let handle = self
            .registry
            .insert_unless_exiting(move |handle| Arc::new(ActorRecord::new(handle, name, actor)))
            .ok_or(CreateError::ShuttingDown)?;
        let record = self
            .registry
            .lookup(handle)
            .expect("handle was just inserted under this lock-protected registry");
        record.mailbox.push(Message::create(bootstrap_payload));
        self.enqueue(handle, &record);
        Ok(handle)
    }

    /// Marks `handle` for release. Idempotent while the actor lives:
    /// calling it twice just re-asserts `is_release`.
    pub fn release(&self, handle: Handle) -> Result<(), ReleaseError> {
        let record = self
            .registry
            .lookup(handle)
            .ok_or(ReleaseError::UnknownHandle(handle))?;
        {
            let mut flags = record.flags().lock();
            flags.is_release = true;
        }
        self.enqueue(handle, &record);
        Ok(())
    }

    /// Enqueues a message addressed to `target`. The payload is copied
    /// into the mailbox; the caller keeps ownership of its own buffer.
    pub fn send(
        &self,
        source: Handle,
        target: Handle,
        msg_type: u32,
        session: u64,
        payload: &[u8],
    ) -> Result<(), SendError> {
        let record = self
            .registry
            .lookup(target)
            .ok_or(SendError::UnknownTarget(target))?;
        record
            .mailbox
            .push(Message::user(source, msg_type, session, payload));
        self.enqueue(target, &record);
        Ok(())
    }

    /// One dispatcher turn: dequeue an actor, drain one message, re-enqueue
    /// or destroy.
    pub fn dispatch(&self) -> DispatchOutcome {
        let handle = match self.ready_queue.pop() {
            Some(handle) => handle,
            None => return DispatchOutcome::Idle,
        };
        // The ready queue only ever holds handles of records not yet
        // destroyed: destruction happens only after this same dispatch
        // path observes `is_release`, by which point the handle has
        // already been popped and cannot be re-enqueued.
        let record = self
            .registry
            .lookup(handle)
            .expect("ready queue held a handle with no matching registry entry");

        let ctx = ActorContext::new(handle, self);

        if let Some(msg) = record.mailbox.pop() {
            // SAFETY: this handle was claimed from the ready queue by
            // exactly this call (CAS in `ReadyQueue::pop`), and `is_ready`
            // guarantees no other worker can be dispatching it concurrently.
            unsafe {
                record.dispatch_message(&ctx, &msg);
            }
        }

        let is_release = record.flags().lock().is_release;
        if is_release {
            let release_msg = Message::release();
            unsafe {
                record.dispatch_message(&ctx, &release_msg);
            }
            debug_assert_release_before_destroy!(record.flags().lock().is_release);
            // Drain and discard whatever user messages never made it
            // through: once is_release is set, no further delivery is
            // guaranteed.
            while record.mailbox.pop().is_some() {}
            self.registry.remove(handle);
            return DispatchOutcome::Released;
        }

        // Clear is_ready *before* checking mailbox length: a producer
        // racing in after the clear either wins the spinlock and
        // re-enqueues, or loses it to this re-enqueue — both keep the
        // ready flag consistent with whether the actor is actually queued.
        {
            let mut flags = record.flags().lock();
            flags.is_ready = false;
        }
        if record.mailbox.len() > 0 {
            self.enqueue(handle, &record);
        }
        DispatchOutcome::Dispatched
    }

    /// Signals shutdown and releases every currently registered actor.
    /// Workers should keep calling `dispatch()` until it returns `Idle`
    /// with no actors left.
    ///
    /// Marking the registry as exiting and snapshotting its current
    /// occupants happen under one write-lock acquisition in the registry,
    /// so a `create` racing this call either completes first (and is
    /// included in the snapshot below) or is rejected outright — never
    /// both admitted and missed.
    pub fn exit(&self) {
        let records = self.registry.begin_exit_and_snapshot();
        tracing::info!(pending = records.len(), "runtime exit: releasing all registered actors");
        for record in records {
            {
                let mut flags = record.flags().lock();
                flags.is_release = true;
            }
            self.enqueue(record.handle, &record);
        }
    }

    /// Final teardown, to be called once `dispatch()` has drained every
    /// actor after `exit()`.
    pub fn free(&self) {
        debug_assert!(
            self.registry.is_empty(),
            "free() called while actors remain registered"
        );
    }

    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    /// Enqueue: set `is_ready` under the per-actor spinlock (no-op if
    /// already set) then publish to the ready queue.
    fn enqueue(&self, handle: Handle, record: &ActorRecord) {
        {
            let mut flags = record.flags().lock();
            if flags.is_ready {
                return;
            }
            debug_assert_not_already_ready!(flags.is_ready);
            flags.is_ready = true;
        }
        let pushed = self.ready_queue.push(handle);
        if !pushed {
            tracing::error!(
                capacity = self.ready_queue.capacity(),
                "ready queue overflow"
            );
        }
        assert!(
            pushed,
            "ready queue overflow: capacity {} exceeded",
            self.ready_queue.capacity()
        );
    }
}
