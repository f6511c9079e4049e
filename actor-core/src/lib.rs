//! An in-process actor runtime.
//!
//! Actors are addressable units of private state that communicate only
//! through typed, asynchronous messages routed by a 32-bit [`Handle`].
//! Four pieces cooperate: a [`mailbox`] per actor, a [`registry`] mapping
//! handles to actor records, a process-wide [`ready_queue`] of actors with
//! pending work, and a [`runtime`] that dispatches one message per actor
//! per turn without holding any global lock while user code runs.
//!
//! ```
//! use actor_core::{Actor, ActorContext, ActorRuntime, Message, RuntimeConfig};
//!
//! struct Echo;
//! impl Actor for Echo {
//!     fn on_message(&mut self, _ctx: &ActorContext<'_>, _msg: &Message) {}
//! }
//!
//! let runtime = ActorRuntime::init(RuntimeConfig::default());
//! let handle = runtime.create(None, Box::new(Echo), b"hello").unwrap();
//! assert_eq!(handle, 1);
//! runtime.dispatch(); // delivers CREATE
//! ```

mod actor;
mod backoff;
mod config;
mod error;
mod handle;
pub(crate) mod invariants;
mod mailbox;
mod message;
mod ready_queue;
mod registry;
mod runtime;
mod spinlock;

pub use actor::{Actor, ActorContext};
pub use config::RuntimeConfig;
pub use error::{CreateError, ReleaseError, SendError};
pub use handle::{Handle, SYS_HANDLE};
pub use message::{Message, CREATE, RELEASE};
pub use runtime::{ActorRuntime, DispatchOutcome};
