//! The handle registry.
//!
//! An open-addressing table keyed by `handle mod size`, `size` always a
//! power of two, grown by doubling and full rehash when a linear probe
//! exhausts `size` consecutive candidates, translated from raw pointer
//! slots to `Option<Arc<ActorRecord>>` and from a bespoke spinlock to
//! `parking_lot::RwLock`.
//!
//! The exit flag lives inside the same write-lock-guarded table as the
//! slots, not as a separate atomic, so a create racing an exit either
//! completes before the exit sweep captures it or is rejected outright —
//! never both inserted and missed by the sweep.

use crate::actor::ActorRecord;
use crate::config::RuntimeConfig;
use crate::handle::{Handle, SYS_HANDLE};
use crate::invariants::debug_assert_slot_matches;
use parking_lot::RwLock;
use std::sync::Arc;

struct Table {
    slots: Vec<Option<Arc<ActorRecord>>>,
    /// Monotonically growing allocator cursor. Starts at 1: handle 0 is
    /// [`SYS_HANDLE`] and must never be minted.
    handle_index: u64,
    exiting: bool,
}

impl Table {
    fn new(initial_size: usize) -> Self {
        Self {
            slots: (0..initial_size).map(|_| None).collect(),
            handle_index: 1,
            exiting: false,
        }
    }

    fn size(&self) -> usize {
        self.slots.len()
    }

    fn slot_for(&self, handle: Handle) -> usize {
        (handle as usize) & (self.size() - 1)
    }
}

/// Process-wide map from [`Handle`] to actor record.
pub struct Registry {
    table: RwLock<Table>,
}

impl Registry {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            table: RwLock::new(Table::new(config.registry_initial_size())),
        }
    }

    /// Inserts a record under a freshly minted handle, growing the table
    /// as needed. `make_record` is called exactly once, with the handle
    /// that was actually allocated for it. Returns `None` without calling
    /// `make_record` if shutdown has already been requested.
    ///
    /// The exiting check and the insert happen under the same write-lock
    /// acquisition, so a caller that observes "not exiting" is guaranteed
    /// to be captured by a release sweep started after this call returns.
    ///
    /// # Panics
    ///
    /// Panics (the core's documented fatal-abort path) if growth would
    /// exceed [`RuntimeConfig::MAX_REGISTRY_SIZE`].
    pub fn insert_unless_exiting(
        &self,
        make_record: impl FnOnce(Handle) -> Arc<ActorRecord>,
    ) -> Option<Handle> {
        let mut make_record = Some(make_record);
        loop {
            let mut table = self.table.write();
            if table.exiting {
                return None;
            }
            let size = table.size();
            let start = table.handle_index;

            for offset in 0..size as u64 {
                let candidate = start.wrapping_add(offset);
                let handle = candidate as Handle;
                if handle == SYS_HANDLE {
                    continue;
                }
                let slot = table.slot_for(handle);
                if table.slots[slot].is_none() {
                    let record = make_record.take().expect("insert called exactly once")(handle);
                    table.slots[slot] = Some(record);
                    table.handle_index = candidate.wrapping_add(1);
                    return Some(handle);
                }
            }

            // All `size` candidates collided: grow and retry.
            self.grow_locked(&mut table);
        }
    }

    fn grow_locked(&self, table: &mut Table) {
        let new_size = table.size() * 2;
        assert!(
            new_size <= RuntimeConfig::MAX_REGISTRY_SIZE,
            "registry growth would exceed the maximum of {} entries",
            RuntimeConfig::MAX_REGISTRY_SIZE
        );
        let mut new_slots: Vec<Option<Arc<ActorRecord>>> = (0..new_size).map(|_| None).collect();
        for occupant in table.slots.drain(..).flatten() {
            let slot = (occupant.handle as usize) & (new_size - 1);
            new_slots[slot] = Some(occupant);
        }
        table.slots = new_slots;
        tracing::debug!(new_size, "registry grew");
    }

    /// Looks up the live record for `handle`, if any.
    pub fn lookup(&self, handle: Handle) -> Option<Arc<ActorRecord>> {
        let table = self.table.read();
        let slot = table.slot_for(handle);
        table.slots[slot]
            .as_ref()
            .filter(|record| record.handle == handle)
            .cloned()
    }

    /// Clears the slot holding `handle`, returning the record that occupied
    /// it. No-op (`None`) if the handle is not currently registered.
    pub fn remove(&self, handle: Handle) -> Option<Arc<ActorRecord>> {
        let mut table = self.table.write();
        let slot = table.slot_for(handle);
        match &table.slots[slot] {
            Some(record) if record.handle == handle => {
                debug_assert_slot_matches!(record.handle, handle);
                table.slots[slot].take()
            }
            _ => None,
        }
    }

    /// Marks the registry as shutting down and returns a snapshot of every
    /// record registered at that instant, under one write-lock acquisition.
    /// Any `insert_unless_exiting` call that has not yet taken the lock at
    /// this point will see `exiting` and reject the create; any call
    /// already past the lock has its record included in this snapshot.
    pub fn begin_exit_and_snapshot(&self) -> Vec<Arc<ActorRecord>> {
        let mut table = self.table.write();
        table.exiting = true;
        table.slots.iter().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.table.read().slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
