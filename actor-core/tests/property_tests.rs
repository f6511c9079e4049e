//! Property-based tests for the runtime's core invariants.

use actor_core::{Actor, ActorContext, ActorRuntime, DispatchOutcome, Message, RuntimeConfig, CREATE, RELEASE};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<u32>>>;

struct TypeRecorder {
    log: Log,
}

impl Actor for TypeRecorder {
    fn on_message(&mut self, _ctx: &ActorContext<'_>, msg: &Message) {
        self.log.lock().unwrap().push(msg.msg_type);
    }
}

fn type_recorder() -> (Box<dyn Actor>, Log) {
    let log = Arc::new(Mutex::new(Vec::new()));
    (Box::new(TypeRecorder { log: Arc::clone(&log) }), log)
}

fn drain_all(runtime: &ActorRuntime) {
    loop {
        if runtime.dispatch() == DispatchOutcome::Idle {
            break;
        }
    }
}

proptest! {
    /// Every actor receives CREATE exactly once as its first message, and
    /// (if released) RELEASE exactly once as its last.
    #[test]
    fn create_and_release_bookend_every_actors_messages(
        actor_count in 1usize..20,
        release_mask in prop::collection::vec(prop::bool::ANY, 1..20),
    ) {
        let runtime = ActorRuntime::init(RuntimeConfig::default());
        let mut logs = Vec::new();
        for _ in 0..actor_count {
            let (actor, log) = type_recorder();
            runtime.create(None, actor, &[]).unwrap();
            logs.push(log);
        }
        drain_all(&runtime);
        for (i, log) in logs.iter().enumerate() {
            prop_assert_eq!(log.lock().unwrap().first().copied(), Some(CREATE));
            if *release_mask.get(i).unwrap_or(&false) {
                runtime.release((i + 1) as u32).unwrap();
            }
        }
        drain_all(&runtime);
        for (i, log) in logs.iter().enumerate() {
            let log = log.lock().unwrap();
            prop_assert_eq!(log[0], CREATE);
            if *release_mask.get(i).unwrap_or(&false) {
                prop_assert_eq!(*log.last().unwrap(), RELEASE);
            }
        }
    }
}

proptest! {
    /// Messages from a fixed source to a fixed target arrive in push order.
    #[test]
    fn fifo_per_source_target_pair(
        type_sequence in prop::collection::vec(0u32..1000, 0..200),
    ) {
        let runtime = ActorRuntime::init(RuntimeConfig::default());
        let (actor_a, _) = type_recorder();
        let (actor_b, log_b) = type_recorder();
        let a = runtime.create(None, actor_a, &[]).unwrap();
        let b = runtime.create(None, actor_b, &[]).unwrap();
        drain_all(&runtime);

        for t in &type_sequence {
            runtime.send(a, b, *t, 0, &[]).unwrap();
        }
        drain_all(&runtime);

        let log = log_b.lock().unwrap();
        // log[0] is CREATE; the rest must match push order exactly.
        prop_assert_eq!(&log[1..], type_sequence.as_slice());
    }
}

proptest! {
    /// Creating far more actors than the initial capacity grows the
    /// registry through several doublings; every handle stays resolvable.
    #[test]
    fn growth_preserves_resolvability(initial_bits_actors in 1usize..5) {
        let initial_size = 1usize << initial_bits_actors.min(4);
        let n = initial_size * 10;
        let runtime = ActorRuntime::init(RuntimeConfig::new(16, initial_size));
        let mut handles = Vec::new();
        for _ in 0..n {
            let (actor, _) = type_recorder();
            handles.push(runtime.create(None, actor, &[]).unwrap());
        }
        prop_assert_eq!(handles, (1..=n as u32).collect::<Vec<_>>());
    }
}

proptest! {
    /// Repeated create/release cycles reach a steady registered count (no
    /// per-cycle leak).
    #[test]
    fn create_release_cycles_do_not_leak(cycles in 1usize..50) {
        let runtime = ActorRuntime::init(RuntimeConfig::default());
        for _ in 0..cycles {
            let (actor, _) = type_recorder();
            let h = runtime.create(None, actor, &[]).unwrap();
            runtime.release(h).unwrap();
            drain_all(&runtime);
        }
        prop_assert_eq!(runtime.registered_count(), 0);
    }
}
