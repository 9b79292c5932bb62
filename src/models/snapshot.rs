//! Before/after snapshots and resolution results.
//!
//! A snapshot is a pure in-memory view of cycles with a change-set
//! projected onto them. Building one has no persistence side effect;
//! it exists so callers can log or display what a resolution does.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ChangeSet, Cycle, CycleId, Event, EventId, ScheduleType};

/// One cycle with its events sorted by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleSnapshot {
    /// Cycle identifier.
    pub cycle_id: CycleId,
    /// Earliest event date.
    pub start_date: Option<NaiveDate>,
    /// Latest event date.
    pub end_date: Option<NaiveDate>,
    /// Events sorted by (date, id).
    pub events: Vec<Event>,
}

impl CycleSnapshot {
    /// Snapshot of a cycle as-is.
    pub fn of(cycle: &Cycle) -> Self {
        let events = cycle.sorted_events();
        Self {
            cycle_id: cycle.id,
            start_date: events.first().map(|e| e.date),
            end_date: events.last().map(|e| e.date),
            events,
        }
    }

    /// Snapshot of a cycle with a change-set applied in memory.
    ///
    /// Events are re-sorted and the bounds recomputed from the new dates.
    pub fn projected(cycle: &Cycle, changes: &ChangeSet) -> Self {
        let moved = Cycle {
            events: cycle
                .events
                .iter()
                .map(|e| match changes.update_for(e.id) {
                    Some(u) => e.moved_to(u.new_date),
                    None => e.clone(),
                })
                .collect(),
            ..cycle.clone()
        };
        Self::of(&moved)
    }
}

/// Events sharing one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateCollision {
    /// The contested date.
    pub date: NaiveDate,
    /// Events dated on it (two or more).
    pub events: Vec<EventId>,
}

/// Before/after view of every cycle touched by a computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    /// Cycles as loaded.
    pub before: Vec<CycleSnapshot>,
    /// Cycles with the change-set applied.
    pub after: Vec<CycleSnapshot>,
}

impl ScheduleSnapshot {
    /// Projects a change-set over a list of cycles.
    pub fn project(cycles: &[Cycle], changes: &ChangeSet) -> Self {
        Self {
            before: cycles.iter().map(CycleSnapshot::of).collect(),
            after: cycles
                .iter()
                .map(|c| CycleSnapshot::projected(c, changes))
                .collect(),
        }
    }

    /// Same-date collisions among the projected events dated on or after `from`.
    pub fn collisions_from(&self, from: NaiveDate) -> Vec<DateCollision> {
        find_collisions(
            self.after
                .iter()
                .flat_map(|c| c.events.iter())
                .filter(|e| e.date >= from),
        )
    }

    /// The projected snapshot of one cycle.
    pub fn after_cycle(&self, cycle_id: CycleId) -> Option<&CycleSnapshot> {
        self.after.iter().find(|c| c.cycle_id == cycle_id)
    }
}

/// Groups events by date and returns every date held by more than one.
pub fn find_collisions<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<DateCollision> {
    let mut by_date: BTreeMap<NaiveDate, Vec<EventId>> = BTreeMap::new();
    for e in events {
        by_date.entry(e.date).or_default().push(e.id);
    }
    by_date
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(date, mut events)| {
            events.sort();
            DateCollision { date, events }
        })
        .collect()
}

/// A cycle whose projected changes were dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedCycle {
    /// The cycle left untouched.
    pub cycle_id: CycleId,
    /// Why its changes were discarded.
    pub reason: String,
}

/// Result of a holiday or manual-move computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    /// Schedule type the resolution applies to.
    pub schedule_type: ScheduleType,
    /// Updates to persist.
    pub changes: ChangeSet,
    /// Before/after view for diagnostics.
    pub snapshot: ScheduleSnapshot,
    /// Cycles whose changes were dropped.
    pub skipped: Vec<SkippedCycle>,
}

impl Resolution {
    /// Creates a resolution and derives its snapshot.
    pub fn new(schedule_type: ScheduleType, cycles: &[Cycle], changes: ChangeSet) -> Self {
        let snapshot = ScheduleSnapshot::project(cycles, &changes);
        Self {
            schedule_type,
            changes,
            snapshot,
            skipped: Vec::new(),
        }
    }

    /// Records skipped cycles.
    pub fn with_skipped(mut self, skipped: Vec<SkippedCycle>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Whether nothing needs persisting.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}
