//! Per-actor FIFO mailbox.
//!
//! A mailbox has no fixed set of producers to pre-register — any live
//! actor handle, or the runtime itself, may push at any time. A dedicated
//! per-producer ring would mean allocating one ring per *sender* per
//! mailbox, which is unbounded and unknown up front, so a mailbox instead
//! uses a single internal lock to serialize pushers; the lone popper is
//! whichever worker thread is currently dispatching this actor's turn.

use crate::message::Message;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A bounded-by-nothing, growable FIFO of pending messages.
pub struct Mailbox {
    queue: Mutex<VecDeque<Message>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends `msg`. Never blocks the producer beyond the brief internal
    /// lock; may allocate if the backing deque must grow.
    pub fn push(&self, msg: Message) {
        self.queue.lock().push_back(msg);
    }

    /// Removes and returns the head message, if any.
    pub fn pop(&self) -> Option<Message> {
        self.queue.lock().pop_front()
    }

    /// Approximate pending-message count — a hint for the dispatcher's
    /// re-enqueue decision, not a synchronization point.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let mailbox = Mailbox::new();
        for i in 0..10u32 {
            mailbox.push(Message::user(1, i, 0, &[]));
        }
        for i in 0..10u32 {
            let msg = mailbox.pop().unwrap();
            assert_eq!(msg.msg_type, i);
        }
        assert!(mailbox.pop().is_none());
    }

    #[test]
    fn len_tracks_pending_count() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.len(), 0);
        mailbox.push(Message::user(1, 1, 0, b"x"));
        mailbox.push(Message::user(1, 2, 0, b"y"));
        assert_eq!(mailbox.len(), 2);
        mailbox.pop();
        assert_eq!(mailbox.len(), 1);
    }

    #[test]
    fn concurrent_pushers_preserve_per_source_order() {
        use std::sync::Arc;
        use std::thread;

        let mailbox = Arc::new(Mailbox::new());
        let mut handles = Vec::new();
        for source in 0..4u32 {
            let mailbox = Arc::clone(&mailbox);
            handles.push(thread::spawn(move || {
                for seq in 0..200u64 {
                    mailbox.push(Message::user(source, 0, seq, &[]));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let mut last_seq_per_source = [None; 4];
        let mut total = 0;
        while let Some(msg) = mailbox.pop() {
            let slot = &mut last_seq_per_source[msg.source as usize];
            if let Some(prev) = *slot {
                assert!(msg.session > prev, "per-source FIFO order violated");
            }
            *slot = Some(msg.session);
            total += 1;
        }
        assert_eq!(total, 800);
    }
}
