//! The global MPMC ready queue.
//!
//! Every worker thread and every actor callback can enqueue, and every
//! worker thread dequeues, so a single producer/consumer cursor-caching
//! ring doesn't fit here: unbounded `u64` sequence counters masked down to
//! a slot index (no ABA from wraparound), 128-byte-aligned hot fields, and
//! an adaptive [`crate::backoff::Backoff`] for the spin/retry loops.
//!
//! Enqueue reserves a slot with a CAS loop on `tail` and publishes the
//! write through a parallel `flags` array. Dequeue claims a slot with a
//! CAS on `head` so that two consumers racing for the same published slot
//! don't both win.

use crate::backoff::Backoff;
use crate::handle::Handle;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[repr(align(128))]
struct CacheAligned<T> {
    value: T,
}

impl<T> CacheAligned<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> std::ops::Deref for CacheAligned<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}

/// Bounded, multi-producer multi-consumer queue of ready [`Handle`]s.
///
/// Capacity must be a power of two; this is enforced by
/// [`crate::config::RuntimeConfig`], the only constructor path.
pub struct ReadyQueue {
    tail: CacheAligned<AtomicU64>,
    head: CacheAligned<AtomicU64>,
    /// Per-slot publish flag: true once a reserved slot's handle has been
    /// written and is safe for a consumer to read.
    flags: Box<[AtomicBool]>,
    slots: UnsafeCell<Box<[MaybeUninit<Handle>]>>,
    mask: usize,
}

unsafe impl Send for ReadyQueue {}
unsafe impl Sync for ReadyQueue {}

impl ReadyQueue {
    /// `capacity` must be a nonzero power of two.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity.is_power_of_two(),
            "ready queue capacity must be a nonzero power of two"
        );
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, MaybeUninit::uninit);
        let mut flags = Vec::with_capacity(capacity);
        flags.resize_with(capacity, || AtomicBool::new(false));

        Self {
            tail: CacheAligned::new(AtomicU64::new(0)),
            head: CacheAligned::new(AtomicU64::new(0)),
            flags: flags.into_boxed_slice(),
            slots: UnsafeCell::new(slots.into_boxed_slice()),
            mask: capacity - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Enqueues `handle`. Returns `false` if the queue is full — the
    /// caller (the dispatcher's re-enqueue path, or a producer woken by
    /// `send`) should treat this as a transient backpressure signal, not
    /// an error: the queue is bounded but must never silently drop a
    /// ready actor.
    pub fn push(&self, handle: Handle) -> bool {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let head = self.head.load(Ordering::Acquire);
            if tail.wrapping_sub(head) as usize >= self.capacity() {
                return false;
            }
            if self
                .tail
                .compare_exchange_weak(tail, tail.wrapping_add(1), Ordering::Relaxed, Ordering::Relaxed)
                .is_err()
            {
                continue;
            }
            let idx = (tail as usize) & self.mask;
            // SAFETY: this slot was just reserved exclusively by the
            // successful CAS above; no other producer can reserve it again
            // until a consumer clears its flag and advances head past it.
            unsafe {
                let slots = &mut *self.slots.get();
                slots[idx] = MaybeUninit::new(handle);
            }
            self.flags[idx].store(true, Ordering::Release);
            return true;
        }
    }

    /// Dequeues the oldest ready handle, if any.
    pub fn pop(&self) -> Option<Handle> {
        let mut backoff = Backoff::new();
        loop {
            let head = self.head.load(Ordering::Relaxed);
            let tail = self.tail.load(Ordering::Acquire);
            if head == tail {
                return None;
            }
            let idx = (head as usize) & self.mask;
            if !self.flags[idx].load(Ordering::Acquire) {
                // Reserved by a producer that hasn't published its write yet.
                backoff.snooze();
                continue;
            }
            if self
                .head
                .compare_exchange_weak(head, head.wrapping_add(1), Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                backoff.spin();
                continue;
            }
            // SAFETY: the CAS above gave this thread exclusive claim on
            // `idx`; the flag check above established the write is visible.
            let handle = unsafe {
                let slots = &*self.slots.get();
                slots[idx].assume_init()
            };
            self.flags[idx].store(false, Ordering::Release);
            return Some(handle);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Relaxed)
    }
}
