//! Compliance Module
//!
//! Turns tickets into compliance output:
//! - Per-ticket compliance records
//! - Grouped summaries by assignee and issue type
//! - CSV and JSON table exports

pub mod aggregate;
pub mod export;
pub mod record;

pub use aggregate::{
    summarize, summarize_by_assignee, summarize_by_issue_type, GroupDimension, GroupSummary,
    SummaryTable,
};
pub use export::{export_records, export_summary, write_tables, ExportFormat, WrittenTables};
pub use record::{ComplianceRecord, ComplianceRecordBuilder, ComplianceResult, Ticket};
