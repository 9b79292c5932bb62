//! Persistence collaborators.
//!
//! The engine reads a consistent snapshot through [`ScheduleStore`],
//! computes in memory, and writes one batch back. Implementations own
//! transactional behaviour: a batch is applied entirely or not at all,
//! and a batch computed from a stale snapshot is rejected with
//! [`EngineError::ConcurrentModification`](crate::error::EngineError::ConcurrentModification).
//!
//! Staleness is detected with a [`ScheduleVersion`] per schedule type.
//! The engine reads the version before anything else and hands it back
//! with the batch; any write to that schedule type in between (an
//! event edit or a new holiday) has bumped it.
//!
//! [`InMemoryStore`] is a reference implementation used by tests and
//! by callers that keep schedules in process.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Cycle, EventUpdate, HolidayCalendar, ScheduleType, Staff};

/// Data version of one schedule type as observed by a read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScheduleVersion {
    /// Schedule type the version belongs to.
    pub schedule_type: ScheduleType,
    /// Monotonic counter, bumped by every write touching the type.
    pub version: u64,
}

impl ScheduleVersion {
    /// Creates a version token.
    pub fn new(schedule_type: ScheduleType, version: u64) -> Self {
        Self {
            schedule_type,
            version,
        }
    }
}

/// Read/write access to cycles and holidays.
pub trait ScheduleStore {
    /// Current data version of `schedule_type`.
    fn schedule_version(&self, schedule_type: ScheduleType) -> Result<ScheduleVersion>;

    /// Cycles of `schedule_type` with at least one event on or after `as_of`.
    fn load_active_cycles(&self, schedule_type: ScheduleType, as_of: NaiveDate)
        -> Result<Vec<Cycle>>;

    /// The cycle of `schedule_type` with the latest end date, active or not.
    fn load_latest_cycle(&self, schedule_type: ScheduleType) -> Result<Option<Cycle>>;

    /// Every recorded holiday.
    fn load_holidays(&self) -> Result<HolidayCalendar>;

    /// Persists a batch atomically.
    ///
    /// Each update's `previous_date` is the date the engine read; an
    /// event whose stored date differs must fail the whole batch. So
    /// must any `expected` version that no longer matches.
    fn persist_updates(&self, updates: &[EventUpdate], expected: &[ScheduleVersion])
        -> Result<()>;
}

/// Source of staff eligible for rotation.
pub trait StaffRoster {
    /// Eligible staff for a schedule type, in rotation order.
    fn eligible_staff(&self, schedule_type: ScheduleType) -> Result<Vec<Staff>>;
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for &T {
    fn schedule_version(&self, schedule_type: ScheduleType) -> Result<ScheduleVersion> {
        (**self).schedule_version(schedule_type)
    }

    fn load_active_cycles(
        &self,
        schedule_type: ScheduleType,
        as_of: NaiveDate,
    ) -> Result<Vec<Cycle>> {
        (**self).load_active_cycles(schedule_type, as_of)
    }

    fn load_latest_cycle(&self, schedule_type: ScheduleType) -> Result<Option<Cycle>> {
        (**self).load_latest_cycle(schedule_type)
    }

    fn load_holidays(&self) -> Result<HolidayCalendar> {
        (**self).load_holidays()
    }

    fn persist_updates(&self, updates: &[EventUpdate], expected: &[ScheduleVersion]) -> Result<()> {
        (**self).persist_updates(updates, expected)
    }
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for Arc<T> {
    fn schedule_version(&self, schedule_type: ScheduleType) -> Result<ScheduleVersion> {
        (**self).schedule_version(schedule_type)
    }

    fn load_active_cycles(
        &self,
        schedule_type: ScheduleType,
        as_of: NaiveDate,
    ) -> Result<Vec<Cycle>> {
        (**self).load_active_cycles(schedule_type, as_of)
    }

    fn load_latest_cycle(&self, schedule_type: ScheduleType) -> Result<Option<Cycle>> {
        (**self).load_latest_cycle(schedule_type)
    }

    fn load_holidays(&self) -> Result<HolidayCalendar> {
        (**self).load_holidays()
    }

    fn persist_updates(&self, updates: &[EventUpdate], expected: &[ScheduleVersion]) -> Result<()> {
        (**self).persist_updates(updates, expected)
    }
}

impl<T: StaffRoster + ?Sized> StaffRoster for &T {
    fn eligible_staff(&self, schedule_type: ScheduleType) -> Result<Vec<Staff>> {
        (**self).eligible_staff(schedule_type)
    }
}

impl<T: StaffRoster + ?Sized> StaffRoster for Arc<T> {
    fn eligible_staff(&self, schedule_type: ScheduleType) -> Result<Vec<Staff>> {
        (**self).eligible_staff(schedule_type)
    }
}
