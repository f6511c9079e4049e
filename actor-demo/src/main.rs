//! A small worker-pool harness around `actor-core`: two actors bounce a
//! fixed number of pings back and forth, then release themselves once the
//! exchange is done. The runtime itself never owns threads (`actor-core`
//! is explicit that idle backoff and thread ownership are a host concern,
//! not the core's) — this binary is that host.

use actor_core::{Actor, ActorContext, ActorRuntime, DispatchOutcome, Message, RuntimeConfig};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const ROUNDS: u32 = 20;
const WORKER_COUNT: usize = 4;

struct Ping {
    target: Option<actor_core::Handle>,
    rounds_left: u32,
}

impl Actor for Ping {
    fn on_message(&mut self, ctx: &ActorContext<'_>, msg: &Message) {
        match msg.msg_type {
            actor_core::CREATE => {
                tracing::info!(self_handle = ctx.self_handle, "ping created, waiting for pong's handle");
            }
            BOOTSTRAP_PONG_HANDLE => {
                let target = u32::from_le_bytes(msg.payload[..4].try_into().unwrap());
                self.target = Some(target);
                ctx.send(target, PING, 0, &self.rounds_left.to_le_bytes()).unwrap();
            }
            PONG => {
                self.rounds_left = self.rounds_left.saturating_sub(1);
                tracing::info!(rounds_left = self.rounds_left, "ping received pong");
                if self.rounds_left == 0 {
                    ctx.release(ctx.self_handle).unwrap();
                    if let Some(target) = self.target {
                        ctx.release(target).unwrap();
                    }
                } else {
                    ctx.send(self.target.unwrap(), PING, 0, &self.rounds_left.to_le_bytes())
                        .unwrap();
                }
            }
            actor_core::RELEASE => {
                tracing::info!(self_handle = ctx.self_handle, "ping released");
            }
            other => tracing::warn!(msg_type = other, "ping got an unexpected message"),
        }
    }
}

struct Pong;

impl Actor for Pong {
    fn on_message(&mut self, ctx: &ActorContext<'_>, msg: &Message) {
        match msg.msg_type {
            actor_core::CREATE => {
                tracing::info!(self_handle = ctx.self_handle, "pong created");
            }
            PING => {
                ctx.send(msg.source, PONG, msg.session, &[]).unwrap();
            }
            actor_core::RELEASE => {
                tracing::info!(self_handle = ctx.self_handle, "pong released");
            }
            other => tracing::warn!(msg_type = other, "pong got an unexpected message"),
        }
    }
}

const PING: u32 = 1;
const PONG: u32 = 2;
const BOOTSTRAP_PONG_HANDLE: u32 = 3;

fn main() {
    tracing_subscriber::fmt::init();

    let runtime = ActorRuntime::init(RuntimeConfig::default());

    let pong = runtime
        .create(Some("pong".into()), Box::new(Pong), &[])
        .expect("runtime is not shutting down");
    let ping = runtime
        .create(
            Some("ping".into()),
            Box::new(Ping {
                target: None,
                rounds_left: ROUNDS,
            }),
            &[],
        )
        .expect("runtime is not shutting down");

    let pool = WorkerPool::spawn(Arc::clone(&runtime), WORKER_COUNT);

    // Tell ping where pong lives once both are registered, then let the
    // pool drive the rest through dispatch().
    runtime
        .send(
            actor_core::SYS_HANDLE,
            ping,
            BOOTSTRAP_PONG_HANDLE,
            0,
            &pong.to_le_bytes(),
        )
        .expect("ping is alive");

    pool.join_until_idle();
    runtime.free();
    tracing::info!("demo complete");
}

/// A minimal worker pool: each thread loops calling `dispatch()`, backing
/// off when idle, and catching a panicking actor callback at the dispatch
/// boundary so one bad actor doesn't take the process down. This is a
/// policy choice of the demo, not a supervision mechanism — the actor that
/// panicked is simply abandoned (its turn is dropped; no retry, no
/// restart).
struct WorkerPool {
    runtime: Arc<ActorRuntime>,
    threads: Vec<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl WorkerPool {
    fn spawn(runtime: Arc<ActorRuntime>, worker_count: usize) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let barrier = Arc::new(Barrier::new(worker_count));
        let mut threads = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let runtime = Arc::clone(&runtime);
            let shutdown = Arc::clone(&shutdown);
            let barrier = Arc::clone(&barrier);
            threads.push(thread::spawn(move || {
                barrier.wait();
                let mut backoff = Backoff::new();
                while !shutdown.load(Ordering::Acquire) {
                    let outcome = catch_unwind(AssertUnwindSafe(|| runtime.dispatch()));
                    match outcome {
                        Ok(DispatchOutcome::Idle) => backoff.snooze(),
                        Ok(_) => backoff.reset(),
                        Err(panic) => {
                            tracing::error!(worker = id, ?panic, "actor callback panicked; turn dropped");
                        }
                    }
                }
            }));
        }
        Self {
            runtime,
            threads,
            shutdown,
        }
    }

    /// Polls until every actor has been destroyed, then signals the pool
    /// to stop and joins every worker thread.
    fn join_until_idle(self) {
        while self.runtime.registered_count() > 0 {
            thread::sleep(Duration::from_millis(2));
        }
        self.shutdown.store(true, Ordering::Release);
        for t in self.threads {
            let _ = t.join();
        }
    }
}

/// Local mirror of `actor_core`'s internal backoff so the demo doesn't
/// need that type exported from the core's public API.
struct Backoff {
    step: u32,
}

impl Backoff {
    fn new() -> Self {
        Self { step: 0 }
    }

    fn snooze(&mut self) {
        if self.step < 10 {
            self.step += 1;
        }
        thread::yield_now();
    }

    fn reset(&mut self) {
        self.step = 0;
    }
}
