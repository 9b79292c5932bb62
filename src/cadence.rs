//! Cadence rules: which dates are valid slots for a schedule type.
//!
//! # Rules
//!
//! | Type | Valid slot | Next slot after `d` |
//! |------|-----------|---------------------|
//! | `CLEANING` | Mon–Fri, not a holiday | next business day after `d`, skipping holidays |
//! | `OPENTALK` | configured weekday (if any), not a holiday | `d + 7`, repeated while on a holiday |
//!
//! All functions are pure. Every search is bounded by
//! `max_search_days` and fails with
//! [`EngineError::ComputationUnbounded`] instead of looping on a
//! corrupt holiday set.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::config::{EngineConfig, DEFAULT_MAX_SEARCH_DAYS};
use crate::error::{EngineError, Result};
use crate::models::{DateRange, HolidayCalendar, ScheduleType};

/// Cadence rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    opentalk_weekday: Option<Weekday>,
    max_search_days: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            opentalk_weekday: None,
            max_search_days: DEFAULT_MAX_SEARCH_DAYS,
        }
    }
}

impl Cadence {
    /// Creates the default rule set (any presentation weekday, ~10 year bound).
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the rule set from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            opentalk_weekday: config.opentalk_weekday,
            max_search_days: config.max_search_days,
        }
    }

    /// Pins presentations to a weekday.
    pub fn with_opentalk_weekday(mut self, weekday: Weekday) -> Self {
        self.opentalk_weekday = Some(weekday);
        self
    }

    /// Sets the search bound.
    pub fn with_max_search_days(mut self, days: u32) -> Self {
        self.max_search_days = days;
        self
    }

    /// The next valid slot strictly after `from`.
    ///
    /// # Errors
    /// [`EngineError::ComputationUnbounded`] if no slot exists within
    /// `max_search_days` of `from`.
    pub fn next_slot(
        &self,
        schedule_type: ScheduleType,
        from: NaiveDate,
        holidays: &HolidayCalendar,
    ) -> Result<NaiveDate> {
        let mut candidate = from;
        loop {
            candidate = match schedule_type {
                ScheduleType::Cleaning => self.next_business_day(from, candidate)?,
                ScheduleType::OpenTalk => self.advance(from, candidate, 7)?,
            };
            if !holidays.contains(candidate) {
                return Ok(candidate);
            }
        }
    }

    /// Whether `date` already satisfies the cadence and is not a holiday.
    pub fn is_valid_slot(
        &self,
        schedule_type: ScheduleType,
        date: NaiveDate,
        holidays: &HolidayCalendar,
    ) -> bool {
        if holidays.contains(date) {
            return false;
        }
        match schedule_type {
            ScheduleType::Cleaning => is_business_day(date),
            ScheduleType::OpenTalk => match self.opentalk_weekday {
                Some(weekday) => date.weekday() == weekday,
                None => true,
            },
        }
    }

    /// `date` itself if it is a valid slot, otherwise the first valid slot after it.
    ///
    /// For presentations pinned to a weekday, the date is first aligned
    /// forward to that weekday.
    pub fn first_slot_on_or_after(
        &self,
        schedule_type: ScheduleType,
        date: NaiveDate,
        holidays: &HolidayCalendar,
    ) -> Result<NaiveDate> {
        let aligned = match (schedule_type, self.opentalk_weekday) {
            (ScheduleType::OpenTalk, Some(weekday)) => {
                let gap = (7 + weekday.num_days_from_monday()
                    - date.weekday().num_days_from_monday())
                    % 7;
                self.advance(date, date, u64::from(gap))?
            }
            _ => date,
        };
        if self.is_valid_slot(schedule_type, aligned, holidays) {
            Ok(aligned)
        } else {
            self.next_slot(schedule_type, aligned, holidays)
        }
    }

    /// Every valid slot inside `range`, ascending.
    pub fn slots_in_range(
        &self,
        schedule_type: ScheduleType,
        range: DateRange,
        holidays: &HolidayCalendar,
    ) -> Result<Vec<NaiveDate>> {
        let mut slots = Vec::new();
        if range.is_empty() {
            return Ok(slots);
        }
        let mut date = self.first_slot_on_or_after(schedule_type, range.start, holidays)?;
        while date <= range.end {
            slots.push(date);
            date = self.next_slot(schedule_type, date, holidays)?;
        }
        Ok(slots)
    }

    fn next_business_day(&self, origin: NaiveDate, date: NaiveDate) -> Result<NaiveDate> {
        let mut candidate = self.advance(origin, date, 1)?;
        while !is_business_day(candidate) {
            candidate = self.advance(origin, candidate, 1)?;
        }
        Ok(candidate)
    }

    fn advance(&self, origin: NaiveDate, date: NaiveDate, days: u64) -> Result<NaiveDate> {
        let unbounded = || EngineError::ComputationUnbounded {
            from: origin,
            limit_days: self.max_search_days,
        };
        let next = date.checked_add_days(Days::new(days)).ok_or_else(unbounded)?;
        if (next - origin).num_days() > i64::from(self.max_search_days) {
            return Err(unbounded());
        }
        Ok(next)
    }
}

/// Monday through Friday.
#[inline]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// [`Cadence::next_slot`] with the default rule set.
pub fn next_slot(
    schedule_type: ScheduleType,
    from: NaiveDate,
    holidays: &HolidayCalendar,
) -> Result<NaiveDate> {
    Cadence::default().next_slot(schedule_type, from, holidays)
}

/// [`Cadence::is_valid_slot`] with the default rule set.
pub fn is_valid_slot(schedule_type: ScheduleType, date: NaiveDate, holidays: &HolidayCalendar) -> bool {
    Cadence::default().is_valid_slot(schedule_type, date, holidays)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    #[test]
    fn test_cleaning_next_business_day() {
        let none = HolidayCalendar::new();
        // 2026-01-05 is a Monday
        assert_eq!(next_slot(ScheduleType::Cleaning, d(1, 5), &none).unwrap(), d(1, 6));
        // Friday → Monday
        assert_eq!(next_slot(ScheduleType::Cleaning, d(1, 9), &none).unwrap(), d(1, 12));
        // Saturday → Monday
        assert_eq!(next_slot(ScheduleType::Cleaning, d(1, 10), &none).unwrap(), d(1, 12));
    }

    #[test]
    fn test_cleaning_skips_holidays() {
        let holidays = HolidayCalendar::from_dates([d(1, 6), d(1, 7)]);
        assert_eq!(
            next_slot(ScheduleType::Cleaning, d(1, 5), &holidays).unwrap(),
            d(1, 8)
        );
        // Holiday on Monday after a weekend
        let holidays = HolidayCalendar::from_dates([d(1, 12)]);
        assert_eq!(
            next_slot(ScheduleType::Cleaning, d(1, 9), &holidays).unwrap(),
            d(1, 13)
        );
    }

    #[test]
    fn test_opentalk_weekly() {
        let none = HolidayCalendar::new();
        assert_eq!(next_slot(ScheduleType::OpenTalk, d(1, 10), &none).unwrap(), d(1, 17));

        let holidays = HolidayCalendar::from_dates([d(1, 17), d(1, 24)]);
        assert_eq!(
            next_slot(ScheduleType::OpenTalk, d(1, 10), &holidays).unwrap(),
            d(1, 31)
        );
    }

    #[test]
    fn test_is_valid_slot() {
        let holidays = HolidayCalendar::from_dates([d(1, 6)]);
        assert!(is_valid_slot(ScheduleType::Cleaning, d(1, 5), &holidays));
        assert!(!is_valid_slot(ScheduleType::Cleaning, d(1, 6), &holidays)); // holiday
        assert!(!is_valid_slot(ScheduleType::Cleaning, d(1, 10), &holidays)); // Saturday
        assert!(is_valid_slot(ScheduleType::OpenTalk, d(1, 10), &holidays)); // any weekday
    }

    #[test]
    fn test_opentalk_pinned_weekday() {
        let cadence = Cadence::new().with_opentalk_weekday(Weekday::Sat);
        let none = HolidayCalendar::new();
        assert!(cadence.is_valid_slot(ScheduleType::OpenTalk, d(1, 10), &none));
        assert!(!cadence.is_valid_slot(ScheduleType::OpenTalk, d(1, 9), &none));
        // Wednesday aligns forward to Saturday
        assert_eq!(
            cadence
                .first_slot_on_or_after(ScheduleType::OpenTalk, d(1, 7), &none)
                .unwrap(),
            d(1, 10)
        );
    }

    #[test]
    fn test_first_slot_on_or_after() {
        let holidays = HolidayCalendar::from_dates([d(1, 5)]);
        let cadence = Cadence::new();
        // Valid date is kept
        assert_eq!(
            cadence
                .first_slot_on_or_after(ScheduleType::Cleaning, d(1, 6), &holidays)
                .unwrap(),
            d(1, 6)
        );
        // Sunday before a Monday holiday → Tuesday
        assert_eq!(
            cadence
                .first_slot_on_or_after(ScheduleType::Cleaning, d(1, 4), &holidays)
                .unwrap(),
            d(1, 6)
        );
    }

    #[test]
    fn test_slots_in_range() {
        let holidays = HolidayCalendar::from_dates([d(1, 7)]);
        let slots = Cadence::new()
            .slots_in_range(
                ScheduleType::Cleaning,
                DateRange::new(d(1, 5), d(1, 11)),
                &holidays,
            )
            .unwrap();
        assert_eq!(slots, vec![d(1, 5), d(1, 6), d(1, 8), d(1, 9)]);
    }

    #[test]
    fn test_search_bound() {
        let holidays: HolidayCalendar = (6..=31).map(|day| d(1, day)).collect();
        let cadence = Cadence::new().with_max_search_days(14);
        let err = cadence
            .next_slot(ScheduleType::Cleaning, d(1, 5), &holidays)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::ComputationUnbounded { limit_days: 14, .. }
        ));
    }
}
