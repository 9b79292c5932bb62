//! Holiday impact calculation.
//!
//! # Algorithm
//!
//! 1. Merge the new holiday into the holiday set.
//! 2. Walk active cycles by ascending start date. Within a cycle, walk
//!    events by ascending date:
//!    - the first event must not precede `next_slot(previous cycle end)`
//!      and must not sit on a holiday; otherwise it moves to the later
//!      of that minimum and `next_slot(its date)`;
//!    - every later event must sit exactly on `next_slot(previous event)`.
//! 3. Events dated before `as_of` are pinned: they are history.
//! 4. Each cycle's projection is checked for staff-pairing
//!    preservation. A cycle failing the check keeps its stored dates and
//!    is reported as skipped.
//!
//! Projections only re-date events, so on input that passed
//! [`validate_cycles`](crate::validation::validate_cycles) the pairing
//! check always holds. It fires for callers that hand `compute`
//! unvalidated cycles, such as one listing an event id twice with
//! different staff. The engine validates first and reports
//! [`EngineError::Validation`] instead.
//!
//! The walk is a fixed point: re-running it on its own output with the
//! same holiday set yields no updates.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{Ripple, RippleContext, RippleCursor, RippleRule, Slot};
use crate::cadence::Cadence;
use crate::error::{EngineError, Result};
use crate::models::{
    ChangeSet, Cycle, CycleSnapshot, EventId, HolidayCalendar, Resolution, ScheduleType,
    SkippedCycle, StaffId,
};

/// Ripple rule restoring cadence and the cross-cycle gap after a holiday.
#[derive(Debug, Clone, Copy, Default)]
pub struct HolidayShift;

impl RippleRule for HolidayShift {
    fn name(&self) -> &'static str {
        "holiday-shift"
    }

    fn compare(&self, a: &Slot, b: &Slot) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.event_id.cmp(&b.event_id))
    }

    fn reassign(
        &self,
        slot: &Slot,
        cursor: &RippleCursor,
        context: &RippleContext<'_>,
    ) -> Result<Option<NaiveDate>> {
        if let Some(previous) = cursor.previous_in_cycle() {
            let required = context.next_slot(previous)?;
            return Ok((required != slot.date).then_some(required));
        }

        // First event of a cycle.
        let minimum = cursor
            .previous_cycle_end()
            .map(|end| context.next_slot(end))
            .transpose()?;
        let off_holiday = if context.holidays.contains(slot.date) {
            Some(context.next_slot(slot.date)?)
        } else {
            None
        };

        let target = match (minimum, off_holiday) {
            (Some(min), Some(pushed)) => Some(min.max(pushed)),
            (Some(min), None) if slot.date < min => Some(min),
            (None, Some(pushed)) => Some(pushed),
            _ => None,
        };
        Ok(target.filter(|date| *date != slot.date))
    }
}

/// Computes the updates a new holiday requires.
#[derive(Debug, Clone, Copy)]
pub struct HolidayImpact<'a> {
    schedule_type: ScheduleType,
    cadence: &'a Cadence,
}

impl<'a> HolidayImpact<'a> {
    /// Creates a calculator for one schedule type.
    pub fn new(schedule_type: ScheduleType, cadence: &'a Cadence) -> Self {
        Self {
            schedule_type,
            cadence,
        }
    }

    /// Computes the resolution for `holiday`.
    ///
    /// # Arguments
    /// * `holiday` - The newly declared holiday.
    /// * `cycles` - Cycles of this schedule type; inactive ones are ignored.
    /// * `holidays` - Holidays known before this one.
    /// * `as_of` - Today. Events before it are never moved.
    pub fn compute(
        &self,
        holiday: NaiveDate,
        cycles: &[Cycle],
        holidays: &HolidayCalendar,
        as_of: NaiveDate,
    ) -> Result<Resolution> {
        let mut merged = holidays.clone();
        if !merged.insert(holiday) {
            debug!(%holiday, "holiday already known");
        }

        let mut active: Vec<Cycle> = cycles
            .iter()
            .filter(|c| c.schedule_type == self.schedule_type && c.is_active_on(as_of))
            .cloned()
            .collect();
        active.sort_by_key(|c| (c.start_date(), c.id));

        let context = RippleContext::new(self.schedule_type, self.cadence, &merged);
        let mut ripple = Ripple::new(HolidayShift, context);
        let mut changes = ChangeSet::new();
        let mut skipped = Vec::new();

        for cycle in &active {
            let mut slots: Vec<Slot> = cycle
                .events
                .iter()
                .map(|e| {
                    let slot = Slot::new(e.id, cycle.id, e.date);
                    if e.date < as_of {
                        slot.pinned()
                    } else {
                        slot
                    }
                })
                .collect();
            ripple.sort(&mut slots);
            let original = slots.clone();

            let checkpoint = ripple.checkpoint();
            let cycle_changes = ripple.walk(&mut slots)?;
            let projected = CycleSnapshot::projected(cycle, &cycle_changes);

            match verify_pairings(cycle, &projected) {
                Ok(()) => changes.extend(cycle_changes),
                Err(EngineError::InvariantViolation { cycle_id, message }) => {
                    warn!(%cycle_id, %message, "dropping cycle changes");
                    ripple.restore(checkpoint);
                    for slot in &original {
                        ripple.observe(slot);
                    }
                    skipped.push(SkippedCycle {
                        cycle_id,
                        reason: message,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            schedule_type = %self.schedule_type,
            %holiday,
            cycles = active.len(),
            updates = changes.len(),
            skipped = skipped.len(),
            "holiday impact computed"
        );

        Ok(Resolution::new(self.schedule_type, &active, changes).with_skipped(skipped))
    }
}

/// Checks that every event of a projection carries the same staff set
/// as the stored event with its id.
///
/// # Errors
/// [`EngineError::InvariantViolation`] naming the first mismatch.
pub fn verify_pairings(before: &Cycle, after: &CycleSnapshot) -> Result<()> {
    let violation = |message: String| EngineError::InvariantViolation {
        cycle_id: before.id,
        message,
    };

    if before.events.len() != after.events.len() {
        return Err(violation(format!(
            "event count changed from {} to {}",
            before.events.len(),
            after.events.len()
        )));
    }

    let mut stored: HashMap<EventId, Vec<StaffId>> = HashMap::new();
    for event in &before.events {
        let staff = event.sorted_staff();
        if let Some(existing) = stored.insert(event.id, staff.clone()) {
            if existing != staff {
                return Err(violation(format!(
                    "event {} appears with different staff",
                    event.id
                )));
            }
        }
    }

    for event in &after.events {
        match stored.get(&event.id) {
            Some(staff) if *staff == event.sorted_staff() => {}
            Some(_) => {
                return Err(violation(format!(
                    "staff of event {} changed during shift",
                    event.id
                )))
            }
            None => {
                return Err(violation(format!(
                    "event {} not present before shift",
                    event.id
                )))
            }
        }
    }
    Ok(())
}
