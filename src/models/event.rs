//! Event model.
//!
//! An event is one dated slot of a cycle with the staff assigned to it.
//! The engine only ever changes an event's date; its staff list travels
//! with it untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EventId, StaffId};

/// A dated slot within a cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Calendar date of the slot.
    pub date: NaiveDate,
    /// Assigned staff, in assignment order.
    pub staff: Vec<StaffId>,
}

impl Event {
    /// Creates an event with no staff assigned.
    pub fn new(id: u64, date: NaiveDate) -> Self {
        Self {
            id: EventId(id),
            date,
            staff: Vec::new(),
        }
    }

    /// Sets the assigned staff.
    pub fn with_staff(mut self, staff: impl IntoIterator<Item = impl Into<StaffId>>) -> Self {
        self.staff = staff.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy moved to another date.
    pub fn moved_to(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }

    /// Staff ids sorted ascending, for order-insensitive pairing checks.
    pub fn sorted_staff(&self) -> Vec<StaffId> {
        let mut staff = self.staff.clone();
        staff.sort();
        staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let e = Event::new(1, date).with_staff([4u64, 2]);
        assert_eq!(e.id, EventId(1));
        assert_eq!(e.staff, vec![StaffId(4), StaffId(2)]);
        assert_eq!(e.sorted_staff(), vec![StaffId(2), StaffId(4)]);
    }

    #[test]
    fn test_moved_to_keeps_staff() {
        let e = Event::new(1, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()).with_staff([1u64, 2]);
        let later = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let moved = e.moved_to(later);
        assert_eq!(moved.date, later);
        assert_eq!(moved.staff, e.staff);
        assert_eq!(moved.id, e.id);
    }
}
