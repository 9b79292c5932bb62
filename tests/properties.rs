use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use std::collections::HashSet;

use u_rota::cadence::Cadence;
use u_rota::models::{find_collisions, ChangeSet, Cycle, Event, EventId, HolidayCalendar, ScheduleType};
use u_rota::ripple::{HolidayImpact, ManualMove};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn offset(days: u64) -> NaiveDate {
    base().checked_add_days(Days::new(days)).unwrap()
}

/// Lays out back-to-back cycles on consecutive cadence slots.
fn schedule(
    schedule_type: ScheduleType,
    sizes: &[usize],
    holidays: &HolidayCalendar,
) -> Vec<Cycle> {
    let cadence = Cadence::new();
    let mut date = cadence
        .first_slot_on_or_after(schedule_type, base(), holidays)
        .unwrap();
    let mut next_id = 1u64;
    let mut cycles = Vec::new();

    for (index, &size) in sizes.iter().enumerate() {
        let mut cycle = Cycle::new(index as u64 + 1, schedule_type);
        for _ in 0..size {
            cycle = cycle.with_event(Event::new(next_id, date).with_staff([next_id, next_id + 100]));
            next_id += 1;
            date = cadence.next_slot(schedule_type, date, holidays).unwrap();
        }
        cycles.push(cycle);
    }
    cycles
}

fn apply(cycles: &[Cycle], changes: &ChangeSet) -> Vec<Cycle> {
    cycles
        .iter()
        .map(|c| Cycle {
            events: c
                .events
                .iter()
                .map(|e| match changes.update_for(e.id) {
                    Some(u) => e.moved_to(u.new_date),
                    None => e.clone(),
                })
                .collect(),
            ..c.clone()
        })
        .collect()
}

fn schedule_type() -> impl Strategy<Value = ScheduleType> {
    prop_oneof![Just(ScheduleType::Cleaning), Just(ScheduleType::OpenTalk)]
}

proptest! {
    #[test]
    fn holiday_restores_cadence(
        schedule_type in schedule_type(),
        sizes in prop::collection::vec(1usize..6, 1..4),
        existing in prop::collection::vec(0u64..120, 0..4),
        holiday in 0u64..120,
    ) {
        let holidays: HolidayCalendar = existing.iter().map(|&o| offset(o)).collect();
        let cycles = schedule(schedule_type, &sizes, &holidays);
        let holiday = offset(holiday);
        let cadence = Cadence::new();

        let resolution = HolidayImpact::new(schedule_type, &cadence)
            .compute(holiday, &cycles, &holidays, as_of())
            .unwrap();
        prop_assert!(resolution.skipped.is_empty());

        let merged = holidays.clone().with_holiday(holiday);
        let after = apply(&cycles, &resolution.changes);

        let all: Vec<&Event> = after.iter().flat_map(|c| c.events.iter()).collect();
        prop_assert!(find_collisions(all.iter().copied()).is_empty());
        prop_assert!(all.iter().all(|e| !merged.contains(e.date)));

        let mut previous_end: Option<NaiveDate> = None;
        for cycle in &after {
            let events = cycle.sorted_events();
            if let (Some(end), Some(first)) = (previous_end, events.first()) {
                let minimum = cadence.next_slot(schedule_type, end, &merged).unwrap();
                prop_assert!(first.date >= minimum);
            }
            for pair in events.windows(2) {
                let expected = cadence.next_slot(schedule_type, pair[0].date, &merged).unwrap();
                prop_assert_eq!(pair[1].date, expected);
            }
            previous_end = cycle.end_date();
        }

        // Pairings travel with their events.
        for (before, moved) in cycles.iter().zip(&after) {
            for event in &before.events {
                let projected = moved.event(event.id).unwrap();
                prop_assert_eq!(projected.sorted_staff(), event.sorted_staff());
            }
        }
    }

    #[test]
    fn holiday_resolution_is_a_fixed_point(
        schedule_type in schedule_type(),
        sizes in prop::collection::vec(1usize..6, 1..4),
        holiday in 0u64..90,
    ) {
        let holidays = HolidayCalendar::new();
        let cycles = schedule(schedule_type, &sizes, &holidays);
        let holiday = offset(holiday);
        let cadence = Cadence::new();
        let impact = HolidayImpact::new(schedule_type, &cadence);

        let first = impact.compute(holiday, &cycles, &holidays, as_of()).unwrap();
        let after = apply(&cycles, &first.changes);
        let merged = holidays.with_holiday(holiday);
        let second = impact.compute(holiday, &after, &merged, as_of()).unwrap();

        prop_assert!(second.is_noop());
    }

    #[test]
    fn manual_move_leaves_no_collisions(
        schedule_type in schedule_type(),
        sizes in prop::collection::vec(1usize..6, 1..4),
        pick in any::<prop::sample::Index>(),
        target_offset in 0u64..60,
    ) {
        let holidays = HolidayCalendar::new();
        let cycles = schedule(schedule_type, &sizes, &holidays);
        let ids: Vec<EventId> = cycles
            .iter()
            .flat_map(|c| c.events.iter().map(|e| e.id))
            .collect();
        let target = ids[pick.index(ids.len())];
        let new_date = offset(target_offset);
        let cadence = Cadence::new();

        let resolution = ManualMove::new(schedule_type, &cadence)
            .compute(target, new_date, &cycles, &holidays, as_of())
            .unwrap();
        let after = apply(&cycles, &resolution.changes);

        let moved = after
            .iter()
            .find_map(|c| c.event(target))
            .unwrap();
        prop_assert_eq!(moved.date, new_date);
        prop_assert!(find_collisions(after.iter().flat_map(|c| c.events.iter())).is_empty());

        let before_count: usize = cycles.iter().map(Cycle::event_count).sum();
        let after_count: usize = after.iter().map(Cycle::event_count).sum();
        prop_assert_eq!(before_count, after_count);

        // Only the target or events pushed later change.
        for update in resolution.changes.updates() {
            prop_assert!(update.event_id == target || update.new_date > update.previous_date);
        }

        let unique: HashSet<EventId> = resolution.changes.updates().iter().map(|u| u.event_id).collect();
        prop_assert_eq!(unique.len(), resolution.changes.len());
    }
}
