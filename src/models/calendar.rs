//! Holiday calendar and date range models.
//!
//! Dates are `chrono::NaiveDate`: calendar days with no time or zone,
//! so comparisons and arithmetic never drift across timezones.
//!
//! # Precedence
//! A holiday overrides the cadence. A date is a usable slot iff the
//! cadence accepts it AND it is not in the holiday set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An inclusive calendar-date range `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar days covered (0 if `end < start`).
    #[inline]
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }

    /// Whether the range covers no day.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether a date falls within this range.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether two ranges share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// The set of non-working days.
///
/// Append-only from the engine's point of view: holidays are added,
/// never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a calendar from a list of dates.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.dates.insert(date);
        self
    }

    /// Merges a holiday into the set. Returns `false` if it was already known.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    /// Whether a date is a holiday.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Number of recorded holidays.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether no holiday is recorded.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Holidays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Holidays falling inside a range, ascending.
    pub fn in_range(&self, range: DateRange) -> Vec<NaiveDate> {
        if range.is_empty() {
            return Vec::new();
        }
        self.dates.range(range.start..=range.end).copied().collect()
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self::from_dates(iter)
    }
}
