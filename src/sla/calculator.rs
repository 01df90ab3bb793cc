//! Business-hours interval calculation.
//!
//! Elapsed time between two instants is the sum, over every business day
//! touched by `[created_at, resolved_at)`, of the overlap with that day's
//! business window.

use crate::calendar::BusinessCalendar;
use crate::core::{parse_instant, round_hours, Timestamp};
use crate::sla::window::BusinessWindow;
use tracing::trace;

/// Computes business hours against a shared calendar snapshot.
#[derive(Clone, Copy, Debug)]
pub struct BusinessHoursCalculator<'a> {
    calendar: &'a BusinessCalendar,
    window: BusinessWindow,
}

impl<'a> BusinessHoursCalculator<'a> {
    /// Create a calculator over a calendar and window.
    pub fn new(calendar: &'a BusinessCalendar, window: BusinessWindow) -> Self {
        Self { calendar, window }
    }

    /// Window in use.
    pub fn window(&self) -> BusinessWindow {
        self.window
    }

    /// Business hours between two instants, rounded to two decimals.
    ///
    /// Missing instants and `resolved_at <= created_at` yield `0.0`.
    pub fn compute(&self, created_at: Option<Timestamp>, resolved_at: Option<Timestamp>) -> f64 {
        let (Some(start), Some(end)) = (created_at, resolved_at) else {
            return 0.0;
        };
        if end <= start {
            return 0.0;
        }

        let mut total_seconds: i64 = 0;
        for date in self
            .calendar
            .business_days_between(start.date_naive(), end.date_naive())
        {
            let (business_start, business_end) = self.window.bounds(date);
            let interval_start = start.max(business_start);
            let interval_end = end.min(business_end);
            if interval_end > interval_start {
                total_seconds += (interval_end - interval_start).num_seconds();
            }
        }

        let hours = round_hours(total_seconds as f64 / 3600.0);
        trace!(%start, %end, hours, "computed business hours");
        hours
    }

    /// Like [`compute`](Self::compute), parsing ISO-8601 strings first.
    ///
    /// Unparseable values count as missing.
    pub fn compute_str(&self, created_at: Option<&str>, resolved_at: Option<&str>) -> f64 {
        self.compute(
            created_at.and_then(parse_instant),
            resolved_at.and_then(parse_instant),
        )
    }
}

/// Business hours between two instants.
pub fn business_hours(
    created_at: Option<Timestamp>,
    resolved_at: Option<Timestamp>,
    calendar: &BusinessCalendar,
    window: BusinessWindow,
) -> f64 {
    BusinessHoursCalculator::new(calendar, window).compute(created_at, resolved_at)
}
