//! Calendar generation.

use crate::calendar::day::{BusinessCalendar, CalendarDay};
use crate::calendar::holidays::HolidaySource;
use crate::core::{Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

/// Produces one business-day record per date of a range.
pub trait CalendarProvider {
    /// Generate the days of `[start, end]` (inclusive), ordered by date.
    fn generate(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarDay>>;

    /// Generate and index the range as a calendar snapshot.
    fn build(&self, start: NaiveDate, end: NaiveDate) -> Result<BusinessCalendar> {
        BusinessCalendar::from_days(self.generate(start, end)?)
    }
}

/// Saturday/Sunday weekends plus a holiday source.
pub struct WeekendHolidayProvider<H: HolidaySource> {
    holidays: H,
}

impl<H: HolidaySource> WeekendHolidayProvider<H> {
    /// Create a provider over a holiday source.
    pub fn new(holidays: H) -> Self {
        Self { holidays }
    }

    /// Holiday source in use.
    pub fn holidays(&self) -> &H {
        &self.holidays
    }

    /// Business-day flag for a single date.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.holidays.is_holiday(date)
    }
}

impl<H: HolidaySource> CalendarProvider for WeekendHolidayProvider<H> {
    fn generate(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarDay>> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }

        let days: Vec<CalendarDay> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| CalendarDay::new(d, self.is_business_day(d)))
            .collect();

        debug!(
            %start,
            %end,
            days = days.len(),
            business_days = days.iter().filter(|d| d.is_business_day).count(),
            "generated calendar"
        );
        Ok(days)
    }
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
