//! Pipeline configuration.
//!
//! Every input the run needs is passed in here explicitly: calendar source,
//! holiday set, business window, thresholds, ticket source and outputs.

use crate::calendar::{HolidayRegion, HolidaySet};
use crate::compliance::ExportFormat;
use crate::core::{Error, Result};
use crate::sla::{BusinessWindow, SlaPolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Statuses counted as resolved by default.
pub const DEFAULT_RESOLVED_STATUSES: &[&str] = &["Done", "Resolved"];

/// Full pipeline configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where the business calendar comes from
    pub calendar: CalendarConfig,
    /// Counted portion of each business day
    pub window: BusinessWindow,
    /// Thresholds per priority
    pub policy: SlaPolicy,
    /// Ticket source and filtering
    pub tickets: TicketConfig,
    /// Output destination
    pub output: OutputConfig,
    /// Worker count for batch evaluation (default: available cores)
    pub parallelism: Option<usize>,
}

impl PipelineConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if let CalendarConfig::Generate {
            start,
            end: Some(end),
            ..
        } = &self.calendar
        {
            if start > end {
                return Err(Error::InvalidDateRange {
                    start: *start,
                    end: *end,
                });
            }
        }
        if self.parallelism == Some(0) {
            return Err(Error::Config("parallelism must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Effective worker count.
    pub fn workers(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Calendar source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CalendarConfig {
    /// Generate from weekends and a holiday set
    Generate {
        /// First date
        start: NaiveDate,
        /// Last date (default: today)
        #[serde(default)]
        end: Option<NaiveDate>,
        /// Holidays
        #[serde(default)]
        holidays: HolidaySet,
    },
    /// Load a precomputed calendar table
    File {
        /// Table path (JSON or CSV)
        path: PathBuf,
    },
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig::Generate {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN),
            end: None,
            holidays: HolidaySet::for_region(HolidayRegion::Br),
        }
    }
}

/// Ticket source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketConfig {
    /// Ticket table path
    pub path: Option<PathBuf>,
    /// Statuses to evaluate; empty means all
    pub resolved_statuses: Vec<String>,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            path: None,
            resolved_statuses: DEFAULT_RESOLVED_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Output destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the result tables
    pub dir: PathBuf,
    /// Table format
    pub format: ExportFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: ExportFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.window, BusinessWindow::WHOLE_DAY);
        assert_eq!(config.tickets.resolved_statuses, vec!["Done", "Resolved"]);
        assert_eq!(config.output.format, ExportFormat::Csv);
        assert!(config.validate().is_ok());
        assert!(matches!(config.calendar, CalendarConfig::Generate { end: None, .. }));
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "calendar": {"source": "generate", "start": "2025-01-01", "end": "2025-12-31",
                         "holidays": {"region": "br", "extra": ["2025-12-24"]}},
            "window": {"start_hour": 8, "end_hour": 18},
            "policy": {"high": 24, "medium": 72, "low": 120, "missing_timestamps": "undefined"},
            "tickets": {"path": "silver_issues.json", "resolved_statuses": []},
            "output": {"dir": "gold", "format": "json"},
            "parallelism": 4
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.window, BusinessWindow::OFFICE_HOURS);
        assert!(config.tickets.resolved_statuses.is_empty());
        assert_eq!(config.output.format, ExportFormat::Json);
        assert_eq!(config.workers(), 4);
    }

    #[test]
    fn test_file_calendar() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"calendar": {"source": "file", "path": "calendar.csv"}}"#)
                .unwrap();
        assert_eq!(
            config.calendar,
            CalendarConfig::File {
                path: PathBuf::from("calendar.csv")
            }
        );
    }

    #[test]
    fn test_validation() {
        let mut config = PipelineConfig::default();
        config.parallelism = Some(0);
        assert!(config.validate().is_err());

        let config: PipelineConfig = serde_json::from_str(
            r#"{"calendar": {"source": "generate", "start": "2025-02-01", "end": "2025-01-01"}}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(Error::InvalidDateRange { .. })));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let result: std::result::Result<PipelineConfig, _> =
            serde_json::from_str(r#"{"window": {"start_hour": 18, "end_hour": 8}}"#);
        assert!(result.is_err());
    }
}
