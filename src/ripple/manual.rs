//! Manual move resolution.
//!
//! # Algorithm
//!
//! 1. Flatten the events of every active cycle into one timeline.
//! 2. Move the target in memory and record that update first.
//! 3. Sort by (date, target first, event id) so the operator's choice
//!    owns the requested date.
//! 4. Walk forward. An event landing on a date already taken is pushed
//!    to the next free cadence slot, which may in turn displace a later
//!    event.
//!
//! The target and events before `as_of` are pinned. Their dates are
//! reserved before the walk, so a ripple can never displace them. A
//! target date before `as_of` is rejected: it could only collide with
//! history, which nothing may push aside.

use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::{info, warn};

use super::{Ripple, RippleContext, RippleCursor, RippleRule, Slot};
use crate::cadence::Cadence;
use crate::error::{EngineError, Result};
use crate::models::{ChangeSet, Cycle, EventId, EventUpdate, HolidayCalendar, Resolution, ScheduleType};

/// Ripple rule that pushes colliding events forward.
#[derive(Debug, Clone, Copy)]
pub struct CollisionShift {
    target: EventId,
}

impl CollisionShift {
    /// Creates a rule favouring `target` on ties.
    pub fn new(target: EventId) -> Self {
        Self { target }
    }
}

impl RippleRule for CollisionShift {
    fn name(&self) -> &'static str {
        "collision-shift"
    }

    fn compare(&self, a: &Slot, b: &Slot) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| (b.event_id == self.target).cmp(&(a.event_id == self.target)))
            .then_with(|| a.event_id.cmp(&b.event_id))
    }

    fn reassign(
        &self,
        slot: &Slot,
        cursor: &RippleCursor,
        context: &RippleContext<'_>,
    ) -> Result<Option<NaiveDate>> {
        if !cursor.is_occupied(slot.date) {
            return Ok(None);
        }
        let mut candidate = context.next_slot(slot.date)?;
        while cursor.is_occupied(candidate) {
            candidate = context.next_slot(candidate)?;
        }
        Ok(Some(candidate))
    }
}

/// Computes the updates an explicit event move requires.
#[derive(Debug, Clone, Copy)]
pub struct ManualMove<'a> {
    schedule_type: ScheduleType,
    cadence: &'a Cadence,
}

impl<'a> ManualMove<'a> {
    /// Creates a resolver for one schedule type.
    pub fn new(schedule_type: ScheduleType, cadence: &'a Cadence) -> Self {
        Self {
            schedule_type,
            cadence,
        }
    }

    /// Computes the resolution for moving `event_id` to `new_date`.
    ///
    /// # Errors
    /// - [`EngineError::InvalidInput`] if `new_date` is before `as_of`.
    /// - [`EngineError::NotFound`] if no active cycle holds the event.
    pub fn compute(
        &self,
        event_id: EventId,
        new_date: NaiveDate,
        cycles: &[Cycle],
        holidays: &HolidayCalendar,
        as_of: NaiveDate,
    ) -> Result<Resolution> {
        if new_date < as_of {
            return Err(EngineError::InvalidInput(format!(
                "cannot move event {event_id} to {new_date}, before {as_of}"
            )));
        }

        let active: Vec<Cycle> = cycles
            .iter()
            .filter(|c| c.schedule_type == self.schedule_type && c.is_active_on(as_of))
            .cloned()
            .collect();

        let mut slots: Vec<Slot> = active
            .iter()
            .flat_map(|c| c.events.iter().map(move |e| Slot::new(e.id, c.id, e.date)))
            .map(|s| {
                if s.event_id == event_id || s.date < as_of {
                    s.pinned()
                } else {
                    s
                }
            })
            .collect();

        let target = slots
            .iter_mut()
            .find(|s| s.event_id == event_id)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "event {event_id} in active {} cycles",
                    self.schedule_type
                ))
            })?;
        let mut changes = ChangeSet::new();
        changes.record(EventUpdate::new(
            target.event_id,
            target.cycle_id,
            target.original_date,
            new_date,
        ));
        target.date = new_date;

        if holidays.contains(new_date) {
            warn!(%event_id, %new_date, "event moved onto a holiday");
        }

        let context = RippleContext::new(self.schedule_type, self.cadence, holidays);
        let mut ripple = Ripple::new(CollisionShift::new(event_id), context);
        ripple.sort(&mut slots);
        changes.extend(ripple.walk(&mut slots)?);

        info!(
            schedule_type = %self.schedule_type,
            %event_id,
            %new_date,
            updates = changes.len(),
            "manual move resolved"
        );

        Ok(Resolution::new(self.schedule_type, &active, changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleId, Event};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn resolve(
        schedule_type: ScheduleType,
        cycles: &[Cycle],
        event_id: u64,
        new_date: NaiveDate,
    ) -> Result<Resolution> {
        let cadence = Cadence::new();
        ManualMove::new(schedule_type, &cadence).compute(
            EventId(event_id),
            new_date,
            cycles,
            &HolidayCalendar::new(),
            d(1, 1),
        )
    }

    #[test]
    fn test_opentalk_swap() {
        let cycles = vec![Cycle::new(1, ScheduleType::OpenTalk).with_events(vec![
            Event::new(1, d(1, 10)).with_staff([1u64]),
            Event::new(2, d(1, 17)).with_staff([2u64]),
        ])];
        let res = resolve(ScheduleType::OpenTalk, &cycles, 2, d(1, 10)).unwrap();

        assert_eq!(res.changes.len(), 2);
        assert_eq!(res.changes.updates()[0].event_id, EventId(2));
        assert_eq!(res.changes.update_for(EventId(2)).unwrap().new_date, d(1, 10));
        assert_eq!(res.changes.update_for(EventId(1)).unwrap().new_date, d(1, 17));
        assert_eq!(res.snapshot.after[0].events.len(), 2);
    }

    #[test]
    fn test_target_wins_tie_over_lower_id() {
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_events(vec![
            Event::new(1, d(1, 5)),
            Event::new(9, d(1, 7)),
        ])];
        let res = resolve(ScheduleType::Cleaning, &cycles, 9, d(1, 5)).unwrap();
        assert_eq!(res.changes.update_for(EventId(9)).unwrap().new_date, d(1, 5));
        assert_eq!(res.changes.update_for(EventId(1)).unwrap().new_date, d(1, 6));
    }

    #[test]
    fn test_collision_ripples_forward() {
        // Mon..Wed fully booked; moving Thu onto Mon pushes Mon→Tue→Wed→Thu.
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_events(vec![
            Event::new(1, d(1, 5)),
            Event::new(2, d(1, 6)),
            Event::new(3, d(1, 7)),
            Event::new(4, d(1, 8)),
        ])];
        let res = resolve(ScheduleType::Cleaning, &cycles, 4, d(1, 5)).unwrap();
        assert_eq!(res.changes.update_for(EventId(1)).unwrap().new_date, d(1, 6));
        assert_eq!(res.changes.update_for(EventId(2)).unwrap().new_date, d(1, 7));
        assert_eq!(res.changes.update_for(EventId(3)).unwrap().new_date, d(1, 8));
        assert!(res.snapshot.collisions_from(d(1, 1)).is_empty());
    }

    #[test]
    fn test_ripple_crosses_cycles() {
        let cycles = vec![
            Cycle::new(1, ScheduleType::Cleaning).with_event(Event::new(1, d(1, 8))),
            Cycle::new(2, ScheduleType::Cleaning).with_event(Event::new(2, d(1, 9))),
        ];
        let res = resolve(ScheduleType::Cleaning, &cycles, 1, d(1, 9)).unwrap();
        let pushed = res.changes.update_for(EventId(2)).unwrap();
        assert_eq!(pushed.cycle_id, CycleId(2));
        assert_eq!(pushed.new_date, d(1, 12)); // Fri → Mon
    }

    #[test]
    fn test_move_to_free_date_touches_nothing_else() {
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_events(vec![
            Event::new(1, d(1, 5)),
            Event::new(2, d(1, 6)),
        ])];
        let res = resolve(ScheduleType::Cleaning, &cycles, 2, d(1, 9)).unwrap();
        assert_eq!(res.changes.len(), 1);
        assert_eq!(res.snapshot.after[0].end_date, Some(d(1, 9)));
    }

    #[test]
    fn test_shift_never_lands_on_target() {
        // Event 1 collides with event 2 on the 5th; its next slot (6th)
        // is where the target is going, so it skips to the 7th.
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_events(vec![
            Event::new(1, d(1, 5)),
            Event::new(2, d(1, 5)),
            Event::new(3, d(1, 9)),
        ])];
        let res = resolve(ScheduleType::Cleaning, &cycles, 3, d(1, 6)).unwrap();
        assert_eq!(res.changes.update_for(EventId(3)).unwrap().new_date, d(1, 6));
        assert_eq!(res.changes.update_for(EventId(2)).unwrap().new_date, d(1, 7));
        assert!(res.changes.update_for(EventId(1)).is_none());
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_event(Event::new(1, d(1, 5)))];
        let err = resolve(ScheduleType::Cleaning, &cycles, 42, d(1, 6)).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_move_onto_past_date_rejected() {
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_events(vec![
            Event::new(1, d(1, 5)),
            Event::new(2, d(1, 8)),
            Event::new(3, d(1, 9)),
        ])];
        let cadence = Cadence::new();
        let err = ManualMove::new(ScheduleType::Cleaning, &cadence)
            .compute(EventId(3), d(1, 5), &cycles, &HolidayCalendar::new(), d(1, 7))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_past_events_stay_put() {
        // Moving onto today's slot pushes the current event, never the past one.
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_events(vec![
            Event::new(1, d(1, 5)),
            Event::new(2, d(1, 7)),
            Event::new(3, d(1, 9)),
        ])];
        let cadence = Cadence::new();
        let res = ManualMove::new(ScheduleType::Cleaning, &cadence)
            .compute(EventId(3), d(1, 7), &cycles, &HolidayCalendar::new(), d(1, 7))
            .unwrap();
        assert!(res.changes.update_for(EventId(1)).is_none());
        assert_eq!(res.changes.update_for(EventId(2)).unwrap().new_date, d(1, 8));
        assert!(res.snapshot.collisions_from(d(1, 1)).is_empty());
    }

    #[test]
    fn test_noop_move() {
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning).with_event(Event::new(1, d(1, 5)))];
        let res = resolve(ScheduleType::Cleaning, &cycles, 1, d(1, 5)).unwrap();
        assert!(res.is_noop());
    }

    #[test]
    fn test_tie_break_order() {
        let rule = CollisionShift::new(EventId(5));
        let target = Slot::new(EventId(5), CycleId(1), d(1, 5));
        let other = Slot::new(EventId(1), CycleId(1), d(1, 5));
        let earlier = Slot::new(EventId(9), CycleId(1), d(1, 2));
        assert_eq!(rule.compare(&target, &other), Ordering::Less);
        assert_eq!(rule.compare(&other, &target), Ordering::Greater);
        assert_eq!(rule.compare(&earlier, &target), Ordering::Less);
    }
}
