//! Calendar days and the immutable business calendar snapshot.

use crate::core::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar date and whether it counts as a business day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Calendar date
    pub date: NaiveDate,
    /// Business day flag
    pub is_business_day: bool,
}

impl CalendarDay {
    /// Create a new calendar day.
    pub fn new(date: NaiveDate, is_business_day: bool) -> Self {
        Self {
            date,
            is_business_day,
        }
    }
}

/// Date-indexed set of calendar days.
///
/// Built once per run and shared read-only between workers. Dates that are
/// not present are treated as non-business days.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    days: BTreeMap<NaiveDate, bool>,
}

impl BusinessCalendar {
    /// Build a calendar from day records, rejecting repeated dates.
    pub fn from_days(days: impl IntoIterator<Item = CalendarDay>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for day in days {
            if map.insert(day.date, day.is_business_day).is_some() {
                return Err(Error::DuplicateCalendarDate(day.date));
            }
        }
        Ok(Self { days: map })
    }

    /// Whether `date` is a known business day.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.days.get(&date).copied().unwrap_or(false)
    }

    /// Whether `date` has a record at all.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Business days within `[start, end]`, in date order.
    pub fn business_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        // BTreeMap::range panics on an inverted range
        let range = if start <= end {
            Some(self.days.range(start..=end))
        } else {
            None
        };
        range
            .into_iter()
            .flatten()
            .filter(|(_, business)| **business)
            .map(|(date, _)| *date)
    }

    /// Whether every date in `[start, end]` has a record.
    pub fn covers(&self, start: NaiveDate, end: NaiveDate) -> bool {
        if start > end {
            return true;
        }
        let expected = (end - start).num_days() + 1;
        self.days.range(start..=end).count() as i64 == expected
    }

    /// Earliest date in the calendar.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    /// Latest date in the calendar.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// Number of dates in the calendar.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the calendar has no dates.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of business days in the calendar.
    pub fn business_day_count(&self) -> usize {
        self.days.values().filter(|b| **b).count()
    }

    /// All days, ordered by date.
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.days
            .iter()
            .map(|(date, business)| CalendarDay::new(*date, *business))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> BusinessCalendar {
        BusinessCalendar::from_days(vec![
            CalendarDay::new(date(2025, 6, 6), true),  // Friday
            CalendarDay::new(date(2025, 6, 7), false), // Saturday
            CalendarDay::new(date(2025, 6, 8), false), // Sunday
            CalendarDay::new(date(2025, 6, 9), true),  // Monday
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let cal = sample();
        assert!(cal.is_business_day(date(2025, 6, 6)));
        assert!(!cal.is_business_day(date(2025, 6, 7)));
        // Outside the calendar
        assert!(!cal.is_business_day(date(2025, 6, 10)));
        assert!(!cal.contains(date(2025, 6, 10)));
    }

    #[test]
    fn test_business_days_between() {
        let cal = sample();
        let days: Vec<_> = cal
            .business_days_between(date(2025, 6, 6), date(2025, 6, 9))
            .collect();
        assert_eq!(days, vec![date(2025, 6, 6), date(2025, 6, 9)]);

        let none: Vec<_> = cal
            .business_days_between(date(2025, 6, 9), date(2025, 6, 6))
            .collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = BusinessCalendar::from_days(vec![
            CalendarDay::new(date(2025, 6, 6), true),
            CalendarDay::new(date(2025, 6, 6), false),
        ]);
        assert!(matches!(result, Err(Error::DuplicateCalendarDate(_))));
    }

    #[test]
    fn test_coverage() {
        let cal = sample();
        assert!(cal.covers(date(2025, 6, 6), date(2025, 6, 9)));
        assert!(!cal.covers(date(2025, 6, 5), date(2025, 6, 9)));
        assert_eq!(cal.first_date(), Some(date(2025, 6, 6)));
        assert_eq!(cal.last_date(), Some(date(2025, 6, 9)));
        assert_eq!(cal.business_day_count(), 2);
        assert_eq!(cal.len(), 4);
    }
}
