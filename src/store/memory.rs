//! In-memory schedule store.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{ScheduleStore, ScheduleVersion, StaffRoster};
use crate::error::{EngineError, Result};
use crate::models::{Cycle, Event, EventId, EventUpdate, HolidayCalendar, ScheduleType, Staff};

#[derive(Debug, Default)]
struct StoreState {
    cycles: Vec<Cycle>,
    holidays: HolidayCalendar,
    rosters: HashMap<ScheduleType, Vec<Staff>>,
    versions: HashMap<ScheduleType, u64>,
    batches_written: u64,
}

impl StoreState {
    fn event_mut(&mut self, id: EventId) -> Option<(ScheduleType, &mut Event)> {
        self.cycles.iter_mut().find_map(|c| {
            let schedule_type = c.schedule_type;
            c.events
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| (schedule_type, e))
        })
    }

    fn version(&self, schedule_type: ScheduleType) -> u64 {
        self.versions.get(&schedule_type).copied().unwrap_or(0)
    }

    fn bump(&mut self, schedule_type: ScheduleType) {
        *self.versions.entry(schedule_type).or_insert(0) += 1;
    }
}

/// A thread-safe store keeping everything in memory.
///
/// Writes take an exclusive lock and check every expected version and
/// date before changing anything, which gives batch atomicity and
/// optimistic concurrency detection. Every write bumps the version of
/// the schedule types it touches; a new holiday bumps all of them.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cycle.
    pub fn with_cycle(mut self, cycle: Cycle) -> Self {
        self.state_mut().cycles.push(cycle);
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.state_mut().holidays.insert(date);
        self
    }

    /// Sets the roster of a schedule type.
    pub fn with_roster(mut self, schedule_type: ScheduleType, roster: Vec<Staff>) -> Self {
        self.state_mut().rosters.insert(schedule_type, roster);
        self
    }

    /// Records a holiday. Returns `false` if it was already known.
    pub fn add_holiday(&self, date: NaiveDate) -> Result<bool> {
        let mut state = self.write()?;
        let inserted = state.holidays.insert(date);
        if inserted {
            for schedule_type in ScheduleType::ALL {
                state.bump(schedule_type);
            }
        }
        Ok(inserted)
    }

    /// Changes an event's date outside the engine, as a concurrent
    /// CRUD edit would.
    pub fn set_event_date(&self, event_id: EventId, date: NaiveDate) -> Result<()> {
        let mut state = self.write()?;
        let (schedule_type, event) = state
            .event_mut(event_id)
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;
        event.date = date;
        state.bump(schedule_type);
        Ok(())
    }

    /// Every stored cycle of a schedule type, active or not.
    pub fn cycles(&self, schedule_type: ScheduleType) -> Result<Vec<Cycle>> {
        Ok(self
            .read()?
            .cycles
            .iter()
            .filter(|c| c.schedule_type == schedule_type)
            .cloned()
            .collect())
    }

    /// Looks up an event by ID.
    pub fn event(&self, event_id: EventId) -> Result<Option<Event>> {
        Ok(self
            .read()?
            .cycles
            .iter()
            .flat_map(|c| c.events.iter())
            .find(|e| e.id == event_id)
            .cloned())
    }

    /// Number of batches committed so far.
    pub fn batches_written(&self) -> Result<u64> {
        Ok(self.read()?.batches_written)
    }

    fn state_mut(&mut self) -> &mut StoreState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| EngineError::Store("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| EngineError::Store("store lock poisoned".into()))
    }
}

impl ScheduleStore for InMemoryStore {
    fn schedule_version(&self, schedule_type: ScheduleType) -> Result<ScheduleVersion> {
        Ok(ScheduleVersion::new(
            schedule_type,
            self.read()?.version(schedule_type),
        ))
    }

    fn load_active_cycles(
        &self,
        schedule_type: ScheduleType,
        as_of: NaiveDate,
    ) -> Result<Vec<Cycle>> {
        Ok(self
            .read()?
            .cycles
            .iter()
            .filter(|c| c.schedule_type == schedule_type && c.is_active_on(as_of))
            .cloned()
            .collect())
    }

    fn load_latest_cycle(&self, schedule_type: ScheduleType) -> Result<Option<Cycle>> {
        Ok(self
            .read()?
            .cycles
            .iter()
            .filter(|c| c.schedule_type == schedule_type && c.has_events())
            .max_by_key(|c| (c.end_date(), c.id))
            .cloned())
    }

    fn load_holidays(&self) -> Result<HolidayCalendar> {
        Ok(self.read()?.holidays.clone())
    }

    fn persist_updates(&self, updates: &[EventUpdate], expected: &[ScheduleVersion]) -> Result<()> {
        let mut state = self.write()?;

        for read in expected {
            let current = state.version(read.schedule_type);
            if current != read.version {
                return Err(EngineError::ConcurrentModification(format!(
                    "{} changed since read (version {} → {})",
                    read.schedule_type, read.version, current
                )));
            }
        }

        for update in updates {
            let (_, event) = state
                .event_mut(update.event_id)
                .ok_or_else(|| EngineError::NotFound(format!("event {}", update.event_id)))?;
            if event.date != update.previous_date {
                return Err(EngineError::ConcurrentModification(format!(
                    "event {} is dated {} but {} was read",
                    update.event_id, event.date, update.previous_date
                )));
            }
        }

        let mut touched = Vec::new();
        for update in updates {
            if let Some((schedule_type, event)) = state.event_mut(update.event_id) {
                event.date = update.new_date;
                touched.push(schedule_type);
            }
        }
        touched.sort();
        touched.dedup();
        for schedule_type in touched {
            state.bump(schedule_type);
        }
        state.batches_written += 1;
        debug!(updates = updates.len(), "batch committed");
        Ok(())
    }
}

impl StaffRoster for InMemoryStore {
    fn eligible_staff(&self, schedule_type: ScheduleType) -> Result<Vec<Staff>> {
        Ok(self
            .read()?
            .rosters
            .get(&schedule_type)
            .cloned()
            .unwrap_or_default())
    }
}
