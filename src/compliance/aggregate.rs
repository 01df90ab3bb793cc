//! Grouped summaries of compliance records.

use crate::compliance::record::ComplianceRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dimension a summary is grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    /// Assignee display name
    Assignee,
    /// Ticket type
    IssueType,
}

impl GroupDimension {
    /// Column name of the group key in exported tables.
    pub fn column(&self) -> &'static str {
        match self {
            GroupDimension::Assignee => "assignee_name",
            GroupDimension::IssueType => "issue_type",
        }
    }

    fn key<'r>(&self, record: &'r ComplianceRecord) -> Option<&'r str> {
        match self {
            GroupDimension::Assignee => record.assignee_name.as_deref(),
            GroupDimension::IssueType => record.issue_type.as_deref(),
        }
    }
}

/// Count and mean resolution hours of one group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group key
    pub key: String,
    /// Number of records
    pub issue_count: usize,
    /// Mean of `resolution_hours`
    pub avg_sla_hours: f64,
}

/// Summaries for every group of a dimension, ordered by key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Grouping dimension
    pub dimension: GroupDimension,
    /// One row per group
    pub rows: Vec<GroupSummary>,
}

impl SummaryTable {
    /// Row for a key.
    pub fn get(&self, key: &str) -> Option<&GroupSummary> {
        self.rows.iter().find(|r| r.key == key)
    }
}

/// Group records by a dimension.
///
/// Records with no value for the dimension (no assignee, no issue type)
/// are left out.
pub fn summarize(records: &[ComplianceRecord], dimension: GroupDimension) -> SummaryTable {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in records {
        if let Some(key) = dimension.key(record) {
            let entry = groups.entry(key).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.resolution_hours;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, (count, total))| GroupSummary {
            key: key.to_string(),
            issue_count: count,
            avg_sla_hours: total / count as f64,
        })
        .collect();

    SummaryTable { dimension, rows }
}

/// Per-assignee summary.
pub fn summarize_by_assignee(records: &[ComplianceRecord]) -> SummaryTable {
    summarize(records, GroupDimension::Assignee)
}

/// Per-issue-type summary.
pub fn summarize_by_issue_type(records: &[ComplianceRecord]) -> SummaryTable {
    summarize(records, GroupDimension::IssueType)
}
