//! Calendar Module
//!
//! Provides the business-day calendar:
//! - Calendar days and the read-only calendar snapshot
//! - Holiday sources
//! - Calendar generation and persistence

pub mod day;
pub mod holidays;
pub mod provider;
pub mod store;

pub use day::{BusinessCalendar, CalendarDay};
pub use holidays::{BrazilNationalHolidays, HolidayRegion, HolidaySet, HolidaySource};
pub use provider::{CalendarProvider, WeekendHolidayProvider};
