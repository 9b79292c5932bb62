//! New cycle generation.
//!
//! # Algorithm
//!
//! 1. Start at the first valid slot on or after the range start, but
//!    never before `next_slot(previous cycle end)`.
//! 2. Step one cadence slot at a time (holidays skipped) until the
//!    range end.
//! 3. Fill each slot with the next `slot_size` staff of the rotation,
//!    which resumes where the previous cycle stopped.
//!
//! # Complexity
//! O(s · n) where s = slots in range, n = slot size.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Rotation;
use crate::cadence::Cadence;
use crate::error::{EngineError, Result};
use crate::models::{DateRange, Event, HolidayCalendar, ScheduleType, Staff, StaffId};
use crate::validation::validate_roster;

/// One generated slot: a date and the staff assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedSlot {
    /// Slot date.
    pub date: NaiveDate,
    /// Assigned staff, in rotation order.
    pub staff: Vec<StaffId>,
}

/// Input container for cycle generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Eligible staff in rotation order.
    pub roster: Vec<Staff>,
    /// Events of the previous cycle (empty = first cycle).
    pub previous: Vec<Event>,
    /// Dates the new cycle may cover.
    pub range: DateRange,
    /// Non-working days.
    pub holidays: HolidayCalendar,
}

impl GenerationRequest {
    /// Creates a request with no history and no holidays.
    pub fn new(roster: Vec<Staff>, range: DateRange) -> Self {
        Self {
            roster,
            previous: Vec::new(),
            range,
            holidays: HolidayCalendar::new(),
        }
    }

    /// Sets the previous cycle's events.
    pub fn with_previous(mut self, previous: Vec<Event>) -> Self {
        self.previous = previous;
        self
    }

    /// Sets the holiday calendar.
    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = holidays;
        self
    }
}

/// Builds the event list of a new cycle.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_rota::generator::CycleGenerator;
/// use u_rota::models::{DateRange, HolidayCalendar, ScheduleType, Staff};
///
/// let roster: Vec<Staff> = (1..=4).map(Staff::new).collect();
/// let jan = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let slots = CycleGenerator::new(ScheduleType::Cleaning)
///     .generate(&roster, None, DateRange::new(jan(5), jan(9)), &HolidayCalendar::new())
///     .unwrap();
/// assert_eq!(slots.len(), 5);
/// assert_eq!(slots[0].staff.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CycleGenerator {
    schedule_type: ScheduleType,
    cadence: Cadence,
    slot_size: usize,
    shuffle_seed: Option<u64>,
}

impl CycleGenerator {
    /// Creates a generator with the type's default slot size.
    pub fn new(schedule_type: ScheduleType) -> Self {
        Self {
            schedule_type,
            cadence: Cadence::default(),
            slot_size: schedule_type.default_slot_size(),
            shuffle_seed: None,
        }
    }

    /// Sets the cadence rules.
    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// Sets staff per slot.
    pub fn with_slot_size(mut self, slot_size: usize) -> Self {
        self.slot_size = slot_size;
        self
    }

    /// Shuffles the first rotation when there is no history.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Generates the slots of a new cycle.
    ///
    /// # Errors
    /// - [`EngineError::InvalidInput`] for an empty roster or zero slot size.
    /// - [`EngineError::Validation`] for duplicate staff ids.
    /// - [`EngineError::ComputationUnbounded`] from the cadence.
    pub fn generate(
        &self,
        roster: &[Staff],
        previous: Option<&[Event]>,
        range: DateRange,
        holidays: &HolidayCalendar,
    ) -> Result<Vec<GeneratedSlot>> {
        if self.slot_size == 0 {
            return Err(EngineError::InvalidInput("slot size must be > 0".into()));
        }
        if roster.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "no eligible staff for {}",
                self.schedule_type
            )));
        }
        validate_roster(roster).map_err(EngineError::Validation)?;

        let order: Vec<StaffId> = roster.iter().map(|s| s.id).collect();
        let history = previous.unwrap_or(&[]);
        let mut rotation = match (history.is_empty(), self.shuffle_seed) {
            (false, _) => Rotation::new(order).resume_after(history),
            (true, Some(seed)) => Rotation::shuffled(order, seed),
            (true, None) => Rotation::new(order),
        };

        let mut start = range.start;
        if let Some(previous_end) = history.iter().map(|e| e.date).max() {
            let earliest = self
                .cadence
                .next_slot(self.schedule_type, previous_end, holidays)?;
            if start < earliest {
                debug!(requested = %start, %earliest, "generation start moved past previous cycle");
                start = earliest;
            }
        }

        let slots: Vec<GeneratedSlot> = self
            .cadence
            .slots_in_range(self.schedule_type, DateRange::new(start, range.end), holidays)?
            .into_iter()
            .map(|date| GeneratedSlot {
                date,
                staff: rotation.next_group(self.slot_size),
            })
            .collect();

        info!(
            schedule_type = %self.schedule_type,
            slots = slots.len(),
            roster = roster.len(),
            "cycle generated"
        );
        Ok(slots)
    }

    /// Generates from a request.
    pub fn generate_request(&self, request: &GenerationRequest) -> Result<Vec<GeneratedSlot>> {
        let previous = (!request.previous.is_empty()).then_some(request.previous.as_slice());
        self.generate(&request.roster, previous, request.range, &request.holidays)
    }
}
