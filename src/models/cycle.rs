//! Cycle model.
//!
//! A cycle is a contiguous run of events of one schedule type, e.g. one
//! full rotation of the cleaning roster. Its start and end dates are
//! derived from its events rather than stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CycleId, Event, EventId, ScheduleType};

/// A run of events of one schedule type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cycle {
    /// Unique cycle identifier.
    pub id: CycleId,
    /// Schedule type of every event in the cycle.
    pub schedule_type: ScheduleType,
    /// Events of this cycle.
    pub events: Vec<Event>,
}

impl Cycle {
    /// Creates an empty cycle.
    pub fn new(id: u64, schedule_type: ScheduleType) -> Self {
        Self {
            id: CycleId(id),
            schedule_type,
            events: Vec::new(),
        }
    }

    /// Adds an event.
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Adds several events.
    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// Earliest event date. `None` for an empty cycle.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.events.iter().map(|e| e.date).min()
    }

    /// Latest event date. `None` for an empty cycle.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.events.iter().map(|e| e.date).max()
    }

    /// Whether this cycle has any events.
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Finds an event by ID.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events sorted by (date, id).
    pub fn sorted_events(&self) -> Vec<Event> {
        let mut events = self.events.clone();
        events.sort_by_key(|e| (e.date, e.id));
        events
    }

    /// Whether any event of this cycle is dated on or after `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.date >= date)
    }
}
