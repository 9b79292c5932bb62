//! Change application: the transactional boundary.
//!
//! Turns a computed change-set into exactly one batch write. No business
//! logic lives here; atomicity and stale-snapshot detection belong to
//! the store, and their errors propagate unchanged.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::ChangeSet;
use crate::store::{ScheduleStore, ScheduleVersion};

/// Persists change-sets through a store.
#[derive(Debug)]
pub struct ChangeApplier<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ScheduleStore + ?Sized> ChangeApplier<'a, S> {
    /// Creates an applier over a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Writes every update as one atomic batch.
    ///
    /// `expected` holds the versions read before the change-set was
    /// computed; the store rejects the batch if any has moved on.
    /// Returns the number of updates written. An empty change-set
    /// performs no write.
    pub fn apply(&self, changes: &ChangeSet, expected: &[ScheduleVersion]) -> Result<usize> {
        if changes.is_empty() {
            debug!("empty change-set, nothing to persist");
            return Ok(0);
        }

        self.store.persist_updates(changes.updates(), expected)?;
        info!(
            updates = changes.len(),
            max_shift_days = changes.max_shift_days(),
            "change-set persisted"
        );
        Ok(changes.len())
    }
}
