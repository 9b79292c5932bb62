//! Event date updates and change-sets.
//!
//! An [`EventUpdate`] is the unit of change the engine produces. A
//! [`ChangeSet`] collects them with unique event ids, so the write side
//! can apply them in any order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CycleId, EventId};

/// A single event re-dating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventUpdate {
    /// Event being moved.
    pub event_id: EventId,
    /// Owning cycle (denormalized for logging and summaries).
    pub cycle_id: CycleId,
    /// Date the event had in the snapshot the update was computed from.
    pub previous_date: NaiveDate,
    /// Date to persist.
    pub new_date: NaiveDate,
}

impl EventUpdate {
    /// Creates a new update.
    pub fn new(
        event_id: EventId,
        cycle_id: CycleId,
        previous_date: NaiveDate,
        new_date: NaiveDate,
    ) -> Self {
        Self {
            event_id,
            cycle_id,
            previous_date,
            new_date,
        }
    }

    /// Signed shift in days (positive = later).
    #[inline]
    pub fn shift_days(&self) -> i64 {
        (self.new_date - self.previous_date).num_days()
    }

    /// Whether the update leaves the date unchanged.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.new_date == self.previous_date
    }
}

/// An ordered list of updates with unique event ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeSet {
    updates: Vec<EventUpdate>,
}

impl ChangeSet {
    /// Creates an empty change-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an update.
    ///
    /// A second update for the same event keeps the first previous date
    /// and takes the newer target. Updates that end up as no-ops are
    /// removed.
    pub fn record(&mut self, update: EventUpdate) {
        if let Some(pos) = self
            .updates
            .iter()
            .position(|u| u.event_id == update.event_id)
        {
            self.updates[pos].new_date = update.new_date;
            if self.updates[pos].is_noop() {
                self.updates.remove(pos);
            }
            return;
        }
        if !update.is_noop() {
            self.updates.push(update);
        }
    }

    /// Appends every update of another change-set.
    pub fn extend(&mut self, other: ChangeSet) {
        for update in other.updates {
            self.record(update);
        }
    }

    /// Updates in recording order.
    pub fn updates(&self) -> &[EventUpdate] {
        &self.updates
    }

    /// Finds the update for an event.
    pub fn update_for(&self, event_id: EventId) -> Option<&EventUpdate> {
        self.updates.iter().find(|u| u.event_id == event_id)
    }

    /// Number of updates.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether there is nothing to persist.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Updates belonging to one cycle.
    pub fn for_cycle(&self, cycle_id: CycleId) -> Vec<&EventUpdate> {
        self.updates
            .iter()
            .filter(|u| u.cycle_id == cycle_id)
            .collect()
    }

    /// Largest absolute shift in days (0 when empty).
    pub fn max_shift_days(&self) -> i64 {
        self.updates
            .iter()
            .map(|u| u.shift_days().abs())
            .max()
            .unwrap_or(0)
    }
}

impl IntoIterator for ChangeSet {
    type Item = EventUpdate;
    type IntoIter = std::vec::IntoIter<EventUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}
