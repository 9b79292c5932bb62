//! Input validation for loaded schedule data.
//!
//! Checks structural integrity of cycles and rosters before any
//! rescheduling computation. Detects:
//! - Duplicate cycle, event and staff IDs
//! - Empty cycles
//! - Cycles of the wrong schedule type
//! - The same staff member assigned twice to one event
//!
//! All problems are collected rather than stopping at the first one,
//! so a single report describes everything wrong with a snapshot.

use std::collections::HashSet;

use crate::models::{Cycle, ScheduleType, Staff};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two cycles share the same ID.
    DuplicateCycleId,
    /// Two events share the same ID.
    DuplicateEventId,
    /// Two roster entries share the same staff ID.
    DuplicateStaffId,
    /// A cycle has no events.
    EmptyCycle,
    /// A cycle belongs to another schedule type than requested.
    ScheduleTypeMismatch,
    /// An event lists the same staff member more than once.
    DuplicateAssignment,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the cycles loaded for one schedule type.
///
/// Checks:
/// 1. No duplicate cycle IDs
/// 2. No duplicate event IDs (across all cycles)
/// 3. Every cycle has at least one event
/// 4. Every cycle has the requested schedule type
/// 5. No event lists a staff member twice
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_cycles(schedule_type: ScheduleType, cycles: &[Cycle]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut cycle_ids = HashSet::new();
    let mut event_ids = HashSet::new();

    for cycle in cycles {
        if !cycle_ids.insert(cycle.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCycleId,
                format!("Duplicate cycle ID: {}", cycle.id),
            ));
        }

        if cycle.schedule_type != schedule_type {
            errors.push(ValidationError::new(
                ValidationErrorKind::ScheduleTypeMismatch,
                format!(
                    "Cycle {} is {} but {} was requested",
                    cycle.id, cycle.schedule_type, schedule_type
                ),
            ));
        }

        if !cycle.has_events() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCycle,
                format!("Cycle {} has no events", cycle.id),
            ));
        }

        for event in &cycle.events {
            if !event_ids.insert(event.id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateEventId,
                    format!("Duplicate event ID: {}", event.id),
                ));
            }

            let mut seen = HashSet::new();
            if let Some(dup) = event.staff.iter().find(|s| !seen.insert(**s)) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateAssignment,
                    format!("Event {} assigns staff {} twice", event.id, dup),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a staff roster (no duplicate IDs).
pub fn validate_roster(roster: &[Staff]) -> ValidationResult {
    let mut ids = HashSet::new();
    let errors: Vec<ValidationError> = roster
        .iter()
        .filter(|s| !ids.insert(s.id))
        .map(|s| {
            ValidationError::new(
                ValidationErrorKind::DuplicateStaffId,
                format!("Duplicate staff ID: {}", s.id),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn sample_cycles() -> Vec<Cycle> {
        vec![
            Cycle::new(1, ScheduleType::Cleaning)
                .with_event(Event::new(1, d(5)).with_staff([1u64, 2]))
                .with_event(Event::new(2, d(6)).with_staff([3u64, 4])),
            Cycle::new(2, ScheduleType::Cleaning)
                .with_event(Event::new(3, d(7)).with_staff([1u64, 2])),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_cycles(ScheduleType::Cleaning, &sample_cycles()).is_ok());
    }

    #[test]
    fn test_duplicate_cycle_id() {
        let mut cycles = sample_cycles();
        cycles[1].id = cycles[0].id;
        let errors = validate_cycles(ScheduleType::Cleaning, &cycles).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateCycleId));
    }

    #[test]
    fn test_duplicate_event_id_across_cycles() {
        let mut cycles = sample_cycles();
        cycles[1].events[0].id = cycles[0].events[0].id;
        let errors = validate_cycles(ScheduleType::Cleaning, &cycles).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateEventId));
    }

    #[test]
    fn test_empty_cycle() {
        let cycles = vec![Cycle::new(1, ScheduleType::OpenTalk)];
        let errors = validate_cycles(ScheduleType::OpenTalk, &cycles).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyCycle));
    }

    #[test]
    fn test_schedule_type_mismatch() {
        let errors = validate_cycles(ScheduleType::OpenTalk, &sample_cycles()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::ScheduleTypeMismatch));
    }

    #[test]
    fn test_duplicate_assignment() {
        let cycles = vec![Cycle::new(1, ScheduleType::Cleaning)
            .with_event(Event::new(1, d(5)).with_staff([2u64, 2]))];
        let errors = validate_cycles(ScheduleType::Cleaning, &cycles).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateAssignment
                && e.message.contains("staff 2")));
    }

    #[test]
    fn test_multiple_errors() {
        let cycles = vec![
            Cycle::new(1, ScheduleType::Cleaning),
            Cycle::new(1, ScheduleType::OpenTalk),
        ];
        let errors = validate_cycles(ScheduleType::Cleaning, &cycles).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_roster() {
        assert!(validate_roster(&[Staff::new(1), Staff::new(2)]).is_ok());
        let errors = validate_roster(&[Staff::new(1), Staff::new(1)]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateStaffId);
    }
}
