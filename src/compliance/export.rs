//! Table exports.
//!
//! Writes the compliance record table and the grouped summaries.

use crate::compliance::aggregate::SummaryTable;
use crate::compliance::record::ComplianceRecord;
use crate::core::{Result, Timestamp};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// CSV format
    #[default]
    Csv,
    /// JSON format
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

const RECORD_HEADER: &str = "issue_id,issue_type,assignee_name,priority,created_at,resolved_at,resolution_hours,sla_expected_hours,is_sla_met";

/// Render compliance records.
pub fn export_records(records: &[ComplianceRecord], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(records)?),
        ExportFormat::Csv => Ok(records_to_csv(records)),
    }
}

/// Render a summary table.
pub fn export_summary(table: &SummaryTable, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => {
            let column = table.dimension.column();
            let rows: Vec<serde_json::Value> = table
                .rows
                .iter()
                .map(|row| {
                    let mut obj = serde_json::Map::new();
                    obj.insert(column.to_string(), row.key.clone().into());
                    obj.insert("issue_count".to_string(), row.issue_count.into());
                    obj.insert("avg_sla_hours".to_string(), row.avg_sla_hours.into());
                    serde_json::Value::Object(obj)
                })
                .collect();
            Ok(serde_json::to_vec_pretty(&rows)?)
        }
        ExportFormat::Csv => Ok(summary_to_csv(table)),
    }
}

fn records_to_csv(records: &[ComplianceRecord]) -> Vec<u8> {
    let mut output = String::new();
    output.push_str(RECORD_HEADER);
    output.push('\n');

    for r in records {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            csv_field(&r.issue_id),
            csv_field(r.issue_type.as_deref().unwrap_or_default()),
            csv_field(r.assignee_name.as_deref().unwrap_or_default()),
            csv_field(r.priority.as_str()),
            format_instant(r.created_at),
            format_instant(r.resolved_at),
            csv_float(r.resolution_hours),
            r.sla_expected_hours.map(|h| h.to_string()).unwrap_or_default(),
            r.is_sla_met.map(|m| m.to_string()).unwrap_or_default(),
        ));
    }

    output.into_bytes()
}

fn summary_to_csv(table: &SummaryTable) -> Vec<u8> {
    let mut output = String::new();
    output.push_str(&format!(
        "{},issue_count,avg_sla_hours\n",
        table.dimension.column()
    ));
    for row in &table.rows {
        output.push_str(&format!(
            "{},{},{}\n",
            csv_field(&row.key),
            row.issue_count,
            csv_float(row.avg_sla_hours)
        ));
    }
    output.into_bytes()
}

fn format_instant(ts: Option<Timestamp>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// Hour figures always carry a decimal point (`10.0`, `0.33`).
fn csv_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Quote a CSV cell when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Paths written by [`write_tables`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenTables {
    pub records: PathBuf,
    pub by_assignee: PathBuf,
    pub by_issue_type: PathBuf,
}

/// Write the record table and both summaries into `dir`.
pub fn write_tables(
    dir: &Path,
    format: ExportFormat,
    records: &[ComplianceRecord],
    by_assignee: &SummaryTable,
    by_issue_type: &SummaryTable,
) -> Result<WrittenTables> {
    std::fs::create_dir_all(dir)?;
    let ext = format.extension();
    let written = WrittenTables {
        records: dir.join(format!("sla_issues.{}", ext)),
        by_assignee: dir.join(format!("sla_by_assignee.{}", ext)),
        by_issue_type: dir.join(format!("sla_by_issue_type.{}", ext)),
    };

    std::fs::write(&written.records, export_records(records, format)?)?;
    std::fs::write(&written.by_assignee, export_summary(by_assignee, format)?)?;
    std::fs::write(&written.by_issue_type, export_summary(by_issue_type, format)?)?;

    info!(
        dir = %dir.display(),
        format = ext,
        records = records.len(),
        "wrote compliance tables"
    );
    Ok(written)
}
