//! Business window configuration.

use crate::core::{start_of_day, Error, Result, Timestamp};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hour-of-day span of a business day that counts toward SLA time.
///
/// Half-open `[start_hour, end_hour)` in UTC. `end_hour == 24` means
/// midnight of the following date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowHours", into = "WindowHours")]
pub struct BusinessWindow {
    start_hour: u32,
    end_hour: u32,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct WindowHours {
    start_hour: u32,
    end_hour: u32,
}

impl BusinessWindow {
    /// The whole day, `[0, 24)`.
    pub const WHOLE_DAY: BusinessWindow = BusinessWindow {
        start_hour: 0,
        end_hour: 24,
    };

    /// Office hours, `[8, 18)`.
    pub const OFFICE_HOURS: BusinessWindow = BusinessWindow {
        start_hour: 8,
        end_hour: 18,
    };

    /// Create a window, requiring `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(Error::InvalidWindow {
                start_hour,
                end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// First counted hour.
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// Hour at which counting stops.
    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Length of a full business day under this window.
    pub fn hours_per_day(&self) -> u32 {
        self.end_hour - self.start_hour
    }

    /// UTC bounds of the window on `date`.
    pub fn bounds(&self, date: NaiveDate) -> (Timestamp, Timestamp) {
        let midnight = start_of_day(date);
        (
            midnight + Duration::hours(i64::from(self.start_hour)),
            midnight + Duration::hours(i64::from(self.end_hour)),
        )
    }
}

impl Default for BusinessWindow {
    fn default() -> Self {
        Self::WHOLE_DAY
    }
}

impl std::fmt::Display for BusinessWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_hour, self.end_hour)
    }
}

impl FromStr for BusinessWindow {
    type Err = Error;

    /// Parse `START-END` (e.g. `8-18`) or the names `whole-day` / `office-hours`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "whole-day" => return Ok(Self::WHOLE_DAY),
            "office-hours" => return Ok(Self::OFFICE_HOURS),
            _ => {}
        }
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| Error::Config(format!("invalid window `{}`, expected START-END", s)))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| Error::Config(format!("invalid window hour `{}`", v)))
        };
        Self::new(parse(start)?, parse(end)?)
    }
}

impl TryFrom<WindowHours> for BusinessWindow {
    type Error = Error;

    fn try_from(raw: WindowHours) -> Result<Self> {
        Self::new(raw.start_hour, raw.end_hour)
    }
}

impl From<BusinessWindow> for WindowHours {
    fn from(window: BusinessWindow) -> Self {
        Self {
            start_hour: window.start_hour,
            end_hour: window.end_hour,
        }
    }
}
