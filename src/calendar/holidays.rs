//! Holiday sources.
//!
//! The calendar provider only needs to ask whether a date is a holiday; the
//! source behind that question is interchangeable.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Something that can tell whether a date is a public holiday.
pub trait HolidaySource: Send + Sync {
    /// Whether `date` is a holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// All holidays falling in `year`, ordered.
    fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate>;
}

/// Brazilian national holidays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrazilNationalHolidays;

/// Fixed-date national holidays as (month, day).
const BR_FIXED: &[(u32, u32)] = &[
    (1, 1),   // Confraternização Universal
    (4, 21),  // Tiradentes
    (5, 1),   // Dia do Trabalhador
    (9, 7),   // Independência
    (10, 12), // Nossa Senhora Aparecida
    (11, 2),  // Finados
    (11, 15), // Proclamação da República
    (12, 25), // Natal
];

/// First year Black Consciousness Day is a national holiday.
const BR_BLACK_CONSCIOUSNESS_SINCE: i32 = 2024;

impl HolidaySource for BrazilNationalHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        let (month, day) = (date.month(), date.day());
        if BR_FIXED.contains(&(month, day)) {
            return true;
        }
        if (month, day) == (11, 20) && date.year() >= BR_BLACK_CONSCIOUSNESS_SINCE {
            return true;
        }
        good_friday(date.year()) == Some(date)
    }

    fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate> {
        let mut days: BTreeSet<NaiveDate> = BR_FIXED
            .iter()
            .filter_map(|(m, d)| NaiveDate::from_ymd_opt(year, *m, *d))
            .collect();
        if year >= BR_BLACK_CONSCIOUSNESS_SINCE {
            days.extend(NaiveDate::from_ymd_opt(year, 11, 20));
        }
        days.extend(good_friday(year));
        days.into_iter().collect()
    }
}

/// Easter Sunday for a Gregorian year (anonymous computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Good Friday, two days before Easter Sunday.
pub fn good_friday(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|easter| easter - Duration::days(2))
}

/// Regional holiday calendar selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayRegion {
    /// No regional holidays
    #[default]
    None,
    /// Brazilian national holidays
    Br,
}

/// Configured holiday set: a regional calendar plus extra dates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySet {
    /// Regional calendar
    #[serde(default)]
    pub region: HolidayRegion,
    /// Additional holidays (company closures, local holidays)
    #[serde(default)]
    pub extra: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    /// Create an empty holiday set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a holiday set for a region.
    pub fn for_region(region: HolidayRegion) -> Self {
        Self {
            region,
            extra: BTreeSet::new(),
        }
    }

    /// Add an extra holiday.
    pub fn with_extra(mut self, date: NaiveDate) -> Self {
        self.extra.insert(date);
        self
    }
}

impl HolidaySource for HolidaySet {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.extra.contains(&date) {
            return true;
        }
        match self.region {
            HolidayRegion::None => false,
            HolidayRegion::Br => BrazilNationalHolidays.is_holiday(date),
        }
    }

    fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate> {
        let mut days: BTreeSet<NaiveDate> = match self.region {
            HolidayRegion::None => BTreeSet::new(),
            HolidayRegion::Br => BrazilNationalHolidays.holidays_in_year(year).into_iter().collect(),
        };
        days.extend(self.extra.iter().filter(|d| d.year() == year));
        days.into_iter().collect()
    }
}
