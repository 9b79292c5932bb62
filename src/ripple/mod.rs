//! Collision resolution by forward ripple.
//!
//! Both rescheduling triggers reduce to one primitive: walk the events
//! in a defined order, detect an event whose slot is invalid, advance
//! it via the cadence, and let the shift ripple into the events after
//! it. A [`RippleRule`] supplies the two points where the triggers
//! differ:
//!
//! - **ordering** (`compare`): how ties between events are broken;
//! - **invalidity** (`reassign`): what counts as a bad slot and where
//!   the event goes instead.
//!
//! | Rule | Trigger | Tie-break | Invalid when |
//! |------|---------|-----------|--------------|
//! | [`HolidayShift`] | holiday added | date, id | not the cadence successor of the previous event, or on a holiday |
//! | [`CollisionShift`] | manual move | date, target first, id | date already occupied |
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use u_rota::cadence::Cadence;
//! use u_rota::models::{CycleId, EventId, HolidayCalendar, ScheduleType};
//! use u_rota::ripple::{CollisionShift, Ripple, RippleContext, Slot};
//!
//! let cadence = Cadence::new();
//! let holidays = HolidayCalendar::new();
//! let context = RippleContext::new(ScheduleType::OpenTalk, &cadence, &holidays);
//! let jan = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
//!
//! let mut slots = vec![
//!     Slot::new(EventId(1), CycleId(1), jan(10)),
//!     Slot::new(EventId(2), CycleId(1), jan(10)).pinned(),
//! ];
//! let mut ripple = Ripple::new(CollisionShift::new(EventId(2)), context);
//! ripple.sort(&mut slots);
//! let changes = ripple.walk(&mut slots).unwrap();
//! assert_eq!(changes.update_for(EventId(1)).unwrap().new_date, jan(17));
//! ```

mod holiday;
mod manual;
mod walker;

pub use holiday::{verify_pairings, HolidayImpact, HolidayShift};
pub use manual::{CollisionShift, ManualMove};
pub use walker::Ripple;

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::cadence::Cadence;
use crate::error::Result;
use crate::models::{CycleId, EventId, HolidayCalendar, ScheduleType};

/// One event as seen by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Event being placed.
    pub event_id: EventId,
    /// Owning cycle.
    pub cycle_id: CycleId,
    /// Effective date (updated in place as the walk reassigns it).
    pub date: NaiveDate,
    /// Date as loaded, reported as the update's previous date.
    pub original_date: NaiveDate,
    /// Pinned slots keep their date and reserve it before the walk.
    pub pinned: bool,
}

impl Slot {
    /// Creates an unpinned slot at its loaded date.
    pub fn new(event_id: EventId, cycle_id: CycleId, date: NaiveDate) -> Self {
        Self {
            event_id,
            cycle_id,
            date,
            original_date: date,
            pinned: false,
        }
    }

    /// Marks the slot as pinned.
    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

/// Walk state visible to rules.
///
/// Tracks the effective date of the previously walked slot, both
/// globally and within the current cycle, the effective end of the
/// previous cycle, and every date already taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RippleCursor {
    previous: Option<NaiveDate>,
    previous_in_cycle: Option<NaiveDate>,
    previous_cycle_end: Option<NaiveDate>,
    current_cycle: Option<CycleId>,
    occupied: BTreeSet<NaiveDate>,
}

impl RippleCursor {
    /// Effective date of the last walked slot.
    pub fn previous(&self) -> Option<NaiveDate> {
        self.previous
    }

    /// Effective date of the last walked slot of the current cycle.
    /// `None` while placing a cycle's first slot.
    pub fn previous_in_cycle(&self) -> Option<NaiveDate> {
        self.previous_in_cycle
    }

    /// Effective end date of the cycle walked before the current one.
    pub fn previous_cycle_end(&self) -> Option<NaiveDate> {
        self.previous_cycle_end
    }

    /// Whether a date is already taken by a walked or pinned slot.
    pub fn is_occupied(&self, date: NaiveDate) -> bool {
        self.occupied.contains(&date)
    }

    fn enter(&mut self, cycle_id: CycleId) {
        if self.current_cycle == Some(cycle_id) {
            return;
        }
        if self.current_cycle.is_some() {
            self.previous_cycle_end = self.previous_in_cycle;
        }
        self.current_cycle = Some(cycle_id);
        self.previous_in_cycle = None;
    }

    fn advance(&mut self, date: NaiveDate) {
        self.previous = Some(date);
        self.previous_in_cycle = Some(date);
        self.occupied.insert(date);
    }

    fn reserve(&mut self, date: NaiveDate) {
        self.occupied.insert(date);
    }
}

/// Cadence inputs shared by every step of a walk.
#[derive(Debug, Clone, Copy)]
pub struct RippleContext<'a> {
    /// Schedule type being resolved.
    pub schedule_type: ScheduleType,
    /// Cadence rules.
    pub cadence: &'a Cadence,
    /// Holidays in effect for this computation.
    pub holidays: &'a HolidayCalendar,
}

impl<'a> RippleContext<'a> {
    /// Creates a context.
    pub fn new(
        schedule_type: ScheduleType,
        cadence: &'a Cadence,
        holidays: &'a HolidayCalendar,
    ) -> Self {
        Self {
            schedule_type,
            cadence,
            holidays,
        }
    }

    /// Next valid slot strictly after `from`.
    pub fn next_slot(&self, from: NaiveDate) -> Result<NaiveDate> {
        self.cadence
            .next_slot(self.schedule_type, from, self.holidays)
    }
}

/// Strategy for one kind of ripple resolution.
pub trait RippleRule: Debug {
    /// Rule name, used in logs.
    fn name(&self) -> &'static str;

    /// Walk order. Must be a total order; the sort is stable.
    fn compare(&self, a: &Slot, b: &Slot) -> Ordering;

    /// Decides whether `slot` must move given the walk so far.
    ///
    /// Returns the new date, or `None` to keep the current one.
    /// Never called for pinned slots.
    fn reassign(
        &self,
        slot: &Slot,
        cursor: &RippleCursor,
        context: &RippleContext<'_>,
    ) -> Result<Option<NaiveDate>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    #[test]
    fn test_cursor_tracks_cycle_boundaries() {
        let mut cursor = RippleCursor::default();
        cursor.enter(CycleId(1));
        assert_eq!(cursor.previous_in_cycle(), None);
        cursor.advance(d(5));
        cursor.advance(d(6));

        cursor.enter(CycleId(2));
        assert_eq!(cursor.previous_cycle_end(), Some(d(6)));
        assert_eq!(cursor.previous_in_cycle(), None);
        assert_eq!(cursor.previous(), Some(d(6)));
        assert!(cursor.is_occupied(d(5)));
        assert!(!cursor.is_occupied(d(7)));
    }

    #[test]
    fn test_reentering_same_cycle_keeps_state() {
        let mut cursor = RippleCursor::default();
        cursor.enter(CycleId(1));
        cursor.advance(d(5));
        cursor.enter(CycleId(1));
        assert_eq!(cursor.previous_in_cycle(), Some(d(5)));
        assert_eq!(cursor.previous_cycle_end(), None);
    }
}
