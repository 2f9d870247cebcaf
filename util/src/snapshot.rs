//! # Snapshot cells
//!
//! A [`SnapshotCell`] holds the latest value of an input which is written by one producer and
//! read by any number of consumers. Writers replace the whole value in one step, so a reader only
//! ever sees a complete value, never a partially updated one.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use parking_lot::RwLock;
use std::sync::Arc;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single slot holding the most recent snapshot of a value.
///
/// The lock is only held for the duration of an `Arc` swap or clone, never while the value itself
/// is being built or used.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    slot: RwLock<Option<Arc<T>>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T> SnapshotCell<T> {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Replace the current snapshot with `value`.
    pub fn store(&self, value: T) {
        let new = Arc::new(value);
        *self.slot.write() = Some(new);
    }

    /// Get the latest snapshot, or `None` if nothing has been stored yet.
    pub fn load(&self) -> Option<Arc<T>> {
        self.slot.read().clone()
    }
}

impl<T: Copy> SnapshotCell<T> {
    /// Get a copy of the latest snapshot.
    pub fn load_copy(&self) -> Option<T> {
        self.slot.read().as_deref().copied()
    }
}

impl<T> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
