//! Calendar table persistence.
//!
//! Tables are JSON arrays of rows or simple CSV files. Both accept the
//! `is_business_day` column or its legacy name `business_day`, flag values
//! as booleans or `0`/`1`, and dates with an optional time-of-day part,
//! which is dropped.

use crate::calendar::day::{BusinessCalendar, CalendarDay};
use crate::core::{parse_date, Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const FLAG_COLUMNS: &[&str] = &["is_business_day", "business_day"];

#[derive(Debug, Deserialize)]
struct CalendarRow {
    date: String,
    #[serde(alias = "business_day")]
    is_business_day: FlagValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FlagValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            FlagValue::Int(i) => parse_flag(&i.to_string()),
            FlagValue::Float(f) => parse_flag(&f.to_string()),
            FlagValue::Text(s) => parse_flag(s),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

fn to_day(date: &str, flag: Option<bool>, line: usize) -> Result<CalendarDay> {
    let parsed = parse_date(date)
        .ok_or_else(|| Error::CalendarParse(format!("row {}: invalid date `{}`", line, date)))?;
    let flag = flag.ok_or_else(|| {
        Error::CalendarParse(format!("row {}: invalid business day flag", line))
    })?;
    Ok(CalendarDay::new(parsed, flag))
}

/// Parse a JSON calendar table.
pub fn from_json(data: &str) -> Result<BusinessCalendar> {
    let rows: Vec<CalendarRow> = serde_json::from_str(data)
        .map_err(|e| Error::CalendarParse(e.to_string()))?;
    let days = rows
        .iter()
        .enumerate()
        .map(|(i, row)| to_day(&row.date, row.is_business_day.as_bool(), i + 1))
        .collect::<Result<Vec<_>>>()?;
    BusinessCalendar::from_days(days)
}

/// Parse a CSV calendar table with a header row.
///
/// A leading UTF-8 byte order mark is ignored. Cells may be double-quoted,
/// with `""` standing for a literal quote; quoted cells may contain commas
/// but not line breaks.
pub fn from_csv(data: &str) -> Result<BusinessCalendar> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);
    let mut lines = data.lines().filter(|l| !l.trim().is_empty());
    let header = split_record(
        lines
            .next()
            .ok_or_else(|| Error::CalendarParse("empty calendar table".to_string()))?,
    );

    let date_idx = header
        .iter()
        .position(|h| h == "date")
        .ok_or_else(|| Error::CalendarParse("missing `date` column".to_string()))?;
    let flag_idx = header
        .iter()
        .position(|h| FLAG_COLUMNS.contains(&h.as_str()))
        .ok_or_else(|| Error::CalendarParse("missing `is_business_day` column".to_string()))?;

    let mut days = Vec::new();
    for (i, line) in lines.enumerate() {
        let cells = split_record(line);
        let date = cells.get(date_idx).map(String::as_str).unwrap_or_default();
        let flag = cells.get(flag_idx).and_then(|c| parse_flag(c));
        days.push(to_day(date, flag, i + 1)?);
    }
    BusinessCalendar::from_days(days)
}

/// Load a calendar table, choosing the format from the file extension.
pub fn load(path: &Path) -> Result<BusinessCalendar> {
    let data = std::fs::read_to_string(path)?;
    let calendar = if is_csv(path) {
        from_csv(&data)?
    } else {
        from_json(&data)?
    };
    info!(
        path = %path.display(),
        days = calendar.len(),
        business_days = calendar.business_day_count(),
        "loaded calendar"
    );
    Ok(calendar)
}

/// Render a calendar as a JSON table.
pub fn to_json(calendar: &BusinessCalendar) -> Result<Vec<u8>> {
    let days: Vec<CalendarDay> = calendar.days().collect();
    Ok(serde_json::to_vec_pretty(&days)?)
}

/// Render a calendar as CSV with a weekday column for readability.
pub fn to_csv(calendar: &BusinessCalendar) -> Vec<u8> {
    let mut output = String::new();
    output.push_str("date,day_of_week,is_business_day\n");
    for day in calendar.days() {
        output.push_str(&format!(
            "{},{},{}\n",
            day.date,
            day.date.format("%A"),
            u8::from(day.is_business_day)
        ));
    }
    output.into_bytes()
}

/// Save a calendar, choosing the format from the file extension.
pub fn save(calendar: &BusinessCalendar, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let bytes = if is_csv(path) {
        to_csv(calendar)
    } else {
        to_json(calendar)?
    };
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), days = calendar.len(), "saved calendar");
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Split one CSV line into trimmed cells, honoring double quotes.
fn split_record(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}
