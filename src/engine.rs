//! The rescheduling engine: the operations callers invoke.
//!
//! Each operation is one read → compute → write sequence:
//!
//! 1. read the schedule version, then holidays and active cycles;
//! 2. validate the snapshot;
//! 3. compute a [`Resolution`] with a pure resolver;
//! 4. hand its change-set to the [`ChangeApplier`] as one batch, along
//!    with the version read in step 1.
//!
//! Nothing is cached between calls. On
//! [`EngineError::ConcurrentModification`] the caller retries the whole
//! operation; the engine never retries on its own.

use chrono::NaiveDate;
use tracing::warn;

use crate::applier::ChangeApplier;
use crate::cadence::Cadence;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::generator::{CycleGenerator, GeneratedSlot};
use crate::models::{
    ChangeSet, Cycle, DateRange, Event, EventId, HolidayCalendar, Resolution, ScheduleType, Staff,
};
use crate::ripple::{HolidayImpact, ManualMove};
use crate::store::{ScheduleStore, ScheduleVersion, StaffRoster};
use crate::validation::validate_cycles;

/// Recurring-event rescheduling engine over a store.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_rota::engine::RescheduleEngine;
/// use u_rota::models::{Cycle, Event, EventId, ScheduleType};
/// use u_rota::store::InMemoryStore;
///
/// let jan = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let store = InMemoryStore::new().with_cycle(
///     Cycle::new(1, ScheduleType::Cleaning)
///         .with_event(Event::new(1, jan(5)).with_staff([1u64, 2]))
///         .with_event(Event::new(2, jan(6)).with_staff([3u64, 4])),
/// );
///
/// let engine = RescheduleEngine::new(store);
/// let resolution = engine
///     .on_holiday_added(ScheduleType::Cleaning, jan(6), jan(1))
///     .unwrap();
/// assert_eq!(resolution.changes.update_for(EventId(2)).unwrap().new_date, jan(7));
/// ```
#[derive(Debug)]
pub struct RescheduleEngine<S> {
    store: S,
    config: EngineConfig,
    cadence: Cadence,
}

impl<S: ScheduleStore> RescheduleEngine<S> {
    /// Creates an engine with the default configuration.
    pub fn new(store: S) -> Self {
        let config = EngineConfig::default();
        Self {
            cadence: Cadence::from_config(&config),
            store,
            config,
        }
    }

    /// Creates an engine with a validated configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cadence: Cadence::from_config(&config),
            store,
            config,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cadence rules derived from the configuration.
    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    /// Re-dates events after `holiday` was declared.
    ///
    /// # Arguments
    /// * `schedule_type` - Schedule to repair.
    /// * `holiday` - The new holiday (need not be persisted yet).
    /// * `as_of` - Today. Earlier events are left alone.
    pub fn on_holiday_added(
        &self,
        schedule_type: ScheduleType,
        holiday: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<Resolution> {
        let version = self.store.schedule_version(schedule_type)?;
        let holidays = self.store.load_holidays()?;
        let resolution = self.compute_holiday(schedule_type, holiday, &holidays, as_of)?;
        ChangeApplier::new(&self.store).apply(&resolution.changes, &[version])?;
        Ok(resolution)
    }

    /// Re-dates every schedule type after `holiday`, in one batch.
    pub fn on_holiday_added_all(
        &self,
        holiday: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<Vec<Resolution>> {
        let versions = ScheduleType::ALL
            .iter()
            .map(|&schedule_type| self.store.schedule_version(schedule_type))
            .collect::<Result<Vec<ScheduleVersion>>>()?;
        let holidays = self.store.load_holidays()?;
        let resolutions = ScheduleType::ALL
            .iter()
            .map(|&schedule_type| self.compute_holiday(schedule_type, holiday, &holidays, as_of))
            .collect::<Result<Vec<_>>>()?;

        let mut combined = ChangeSet::new();
        for resolution in &resolutions {
            combined.extend(resolution.changes.clone());
        }
        ChangeApplier::new(&self.store).apply(&combined, &versions)?;
        Ok(resolutions)
    }

    /// Moves one event to `new_date` and pushes aside whatever it lands on.
    ///
    /// # Errors
    /// - [`EngineError::NotFound`] if the event is not in an active cycle
    ///   of `schedule_type`.
    /// - [`EngineError::InvalidInput`] if `new_date` is before `as_of`.
    ///
    /// Nothing is written in either case.
    pub fn on_event_moved(
        &self,
        schedule_type: ScheduleType,
        event_id: EventId,
        new_date: NaiveDate,
        as_of: NaiveDate,
    ) -> Result<Resolution> {
        let version = self.store.schedule_version(schedule_type)?;
        let holidays = self.store.load_holidays()?;
        let cycles = self.load_cycles(schedule_type, as_of)?;
        let resolution = ManualMove::new(schedule_type, &self.cadence).compute(
            event_id, new_date, &cycles, &holidays, as_of,
        )?;
        warn_on_collisions(&resolution, as_of);
        ChangeApplier::new(&self.store).apply(&resolution.changes, &[version])?;
        Ok(resolution)
    }

    /// Lays out a new cycle. Pure: nothing is read or written.
    pub fn generate_cycle(
        &self,
        schedule_type: ScheduleType,
        roster: &[Staff],
        previous: Option<&[Event]>,
        range: DateRange,
        holidays: &HolidayCalendar,
    ) -> Result<Vec<GeneratedSlot>> {
        self.generator(schedule_type)
            .generate(roster, previous, range, holidays)
    }

    fn generator(&self, schedule_type: ScheduleType) -> CycleGenerator {
        let generator = CycleGenerator::new(schedule_type)
            .with_cadence(self.cadence)
            .with_slot_size(self.config.slot_size(schedule_type));
        match self.config.rotation_seed {
            Some(seed) => generator.with_shuffle_seed(seed),
            None => generator,
        }
    }

    fn compute_holiday(
        &self,
        schedule_type: ScheduleType,
        holiday: NaiveDate,
        holidays: &HolidayCalendar,
        as_of: NaiveDate,
    ) -> Result<Resolution> {
        let cycles = self.load_cycles(schedule_type, as_of)?;
        let resolution = HolidayImpact::new(schedule_type, &self.cadence)
            .compute(holiday, &cycles, holidays, as_of)?;
        warn_on_collisions(&resolution, as_of);
        Ok(resolution)
    }

    fn load_cycles(&self, schedule_type: ScheduleType, as_of: NaiveDate) -> Result<Vec<Cycle>> {
        let cycles = self.store.load_active_cycles(schedule_type, as_of)?;
        validate_cycles(schedule_type, &cycles).map_err(EngineError::Validation)?;
        Ok(cycles)
    }
}

impl<S: ScheduleStore + StaffRoster> RescheduleEngine<S> {
    /// Lays out the cycle following the latest stored one, using the
    /// store's roster and holidays.
    ///
    /// The latest cycle drives the rotation and the start gap even when
    /// it ended before `as_of`. Slots before `as_of` are never produced.
    pub fn generate_next_cycle(
        &self,
        schedule_type: ScheduleType,
        range: DateRange,
        as_of: NaiveDate,
    ) -> Result<Vec<GeneratedSlot>> {
        let roster = self.store.eligible_staff(schedule_type)?;
        let holidays = self.store.load_holidays()?;
        let latest = self.store.load_latest_cycle(schedule_type)?;
        if let Some(cycle) = &latest {
            validate_cycles(schedule_type, std::slice::from_ref(cycle))
                .map_err(EngineError::Validation)?;
        }
        let range = DateRange::new(range.start.max(as_of), range.end);
        let previous = latest.as_ref().map(|c| c.events.as_slice());
        self.generate_cycle(schedule_type, &roster, previous, range, &holidays)
    }
}

fn warn_on_collisions(resolution: &Resolution, as_of: NaiveDate) {
    let collisions = resolution.snapshot.collisions_from(as_of);
    if !collisions.is_empty() {
        warn!(
            schedule_type = %resolution.schedule_type,
            collisions = collisions.len(),
            first = %collisions[0].date,
            "projected schedule still has same-date events"
        );
    }
}
