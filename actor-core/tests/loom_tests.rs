//! Loom-based concurrency tests for the ready queue's publish/claim protocol.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom can't model the crate's actual atomics (it needs its own
//! `loom::sync::atomic` types), so this rebuilds a minimal version of the
//! protocol under test and exhaustively explores its interleavings.

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use loom::sync::Arc;
use loom::thread;
use std::cell::UnsafeCell;

/// Mirrors `ReadyQueue`'s reserve-then-publish enqueue and CAS-claim dequeue.
struct LoomReadyQueue {
    tail: AtomicU64,
    head: AtomicU64,
    flags: [AtomicBool; 4],
    slots: UnsafeCell<[u64; 4]>,
}

unsafe impl Send for LoomReadyQueue {}
unsafe impl Sync for LoomReadyQueue {}

impl LoomReadyQueue {
    fn new() -> Self {
        Self {
            tail: AtomicU64::new(0),
            head: AtomicU64::new(0),
            flags: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            slots: UnsafeCell::new([0; 4]),
        }
    }

    fn push(&self, value: u64) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail.wrapping_sub(head) as usize >= 4 {
            return false;
        }
        if self
            .tail
            .compare_exchange(tail, tail + 1, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }
        let idx = (tail as usize) & 3;
        unsafe {
            (*self.slots.get())[idx] = value;
        }
        self.flags[idx].store(true, Ordering::Release);
        true
    }

    fn pop(&self) -> Option<u64> {
        loop {
            let head = self.head.load(Ordering::Relaxed);
            let tail = self.tail.load(Ordering::Acquire);
            if head == tail {
                return None;
            }
            let idx = (head as usize) & 3;
            if !self.flags[idx].load(Ordering::Acquire) {
                return None;
            }
            if self
                .head
                .compare_exchange(head, head + 1, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                return None;
            }
            let value = unsafe { (*self.slots.get())[idx] };
            self.flags[idx].store(false, Ordering::Release);
            return Some(value);
        }
    }
}

/// Two concurrent consumers racing the same publish flag never both
/// observe the same slot as claimed.
#[test]
fn loom_two_consumers_never_claim_same_slot() {
    loom::model(|| {
        let queue = Arc::new(LoomReadyQueue::new());
        assert!(queue.push(42));

        let q1 = Arc::clone(&queue);
        let q2 = Arc::clone(&queue);
        let c1 = thread::spawn(move || q1.pop());
        let c2 = thread::spawn(move || q2.pop());

        let r1 = c1.join().unwrap();
        let r2 = c2.join().unwrap();

        // Exactly one of the two racing consumers gets the value; never both.
        let wins = [r1, r2].into_iter().filter(|r| *r == Some(42)).count();
        assert_eq!(wins, 1, "both or neither consumer claimed the published slot");
    });
}

/// A producer that reserves a slot but hasn't published yet must never be
/// visible to a racing consumer.
#[test]
fn loom_unpublished_slot_is_invisible_to_consumer() {
    loom::model(|| {
        let queue = Arc::new(LoomReadyQueue::new());

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                queue.push(7);
            })
        };
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };

        producer.join().unwrap();
        let popped = consumer.join().unwrap();

        // Either the consumer saw nothing (raced ahead of publication) or
        // it saw exactly the value the producer published — never garbage.
        if let Some(v) = popped {
            assert_eq!(v, 7);
        }
    });
}
