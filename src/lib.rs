//! # bizhours_sla - Business-hours SLA compliance
//!
//! Measures ticket resolution time across business hours only and judges it
//! against priority-based SLA thresholds:
//! - **Calendar**: business-day flags from weekends and holidays
//! - **SLA**: business-hours calculation and priority thresholds
//! - **Compliance**: per-ticket records, grouped summaries and exports
//! - **Pipeline**: configured batch runs over ticket tables
//!
//! ## Quick Start
//!
//! ```rust
//! use bizhours_sla::calendar::{CalendarProvider, HolidaySet, WeekendHolidayProvider};
//! use bizhours_sla::core::parse_instant;
//! use bizhours_sla::sla::{BusinessHoursCalculator, BusinessWindow, Priority, SlaPolicy};
//! use chrono::NaiveDate;
//!
//! let calendar = WeekendHolidayProvider::new(HolidaySet::new())
//!     .build(
//!         NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
//!     )
//!     .unwrap();
//!
//! let calc = BusinessHoursCalculator::new(&calendar, BusinessWindow::OFFICE_HOURS);
//! let hours = calc.compute(
//!     parse_instant("2025-06-02T09:00:00Z"),
//!     parse_instant("2025-06-03T09:00:00Z"),
//! );
//! assert_eq!(hours, 10.0);
//!
//! let policy = SlaPolicy::default();
//! let expected = policy.expected_hours(&Priority::High);
//! assert_eq!(SlaPolicy::evaluate(hours, expected), Some(true));
//! ```

pub mod calendar;
pub mod compliance;
pub mod core;
pub mod ingest;
pub mod monitoring;
pub mod pipeline;
pub mod sla;

#[cfg(feature = "python")]
pub mod python;

pub use crate::core::error::{Error, Result};
