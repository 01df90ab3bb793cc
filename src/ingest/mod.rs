//! Ticket table ingestion.
//!
//! Accepts either a JSON array of flattened ticket rows or a document of
//! the form `{"issues": [...]}` whose issues carry `assignee` and
//! `timestamps` lists. Nested issues are flattened by exploding both lists.
//!
//! A file that cannot be read or parsed is a hard error. Individual bad
//! timestamps are not: they load as absent and are reported with `warn!`.

pub mod rows;

use crate::compliance::Ticket;
use crate::core::{Error, Result};
use crate::sla::Priority;
use rows::{instant, text, RawIssue, TicketRow, TimestampCell};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Parse a ticket table from JSON text.
pub fn from_json(data: &str) -> Result<Vec<Ticket>> {
    let document: Value =
        serde_json::from_str(data).map_err(|e| Error::TicketParse(e.to_string()))?;

    match document {
        Value::Array(_) => {
            let rows: Vec<TicketRow> = serde_json::from_value(document)
                .map_err(|e| Error::TicketParse(e.to_string()))?;
            Ok(rows.iter().map(ticket_from_row).collect())
        }
        Value::Object(mut map) => {
            let issues = map.remove("issues").ok_or_else(|| {
                Error::TicketParse("expected an array of rows or an `issues` list".to_string())
            })?;
            let issues: Vec<RawIssue> = serde_json::from_value(issues)
                .map_err(|e| Error::TicketParse(e.to_string()))?;
            Ok(flatten(&issues))
        }
        _ => Err(Error::TicketParse(
            "expected an array of rows or an `issues` list".to_string(),
        )),
    }
}

/// Load a ticket table file.
pub fn load(path: &Path) -> Result<Vec<Ticket>> {
    let data = std::fs::read_to_string(path)?;
    let tickets = from_json(&data)?;
    info!(path = %path.display(), tickets = tickets.len(), "loaded tickets");
    Ok(tickets)
}

/// Explode nested issues into one row per (assignee, timestamps) pair.
pub fn flatten(issues: &[RawIssue]) -> Vec<Ticket> {
    let mut tickets = Vec::new();
    for issue in issues {
        let assignees = issue.assignee.exploded();
        let stamps = issue.timestamps.exploded();
        for assignee in &assignees {
            for stamp in &stamps {
                let row = TicketRow {
                    issue_id: issue.issue_id.clone(),
                    issue_type: issue.issue_type.clone(),
                    status: issue.status.clone(),
                    priority: issue.priority.clone(),
                    assignee_name: assignee.name.clone(),
                    assignee_id: assignee.id.clone(),
                    assignee_email: assignee.email.clone(),
                    created_at: stamp.created_at.clone(),
                    resolved_at: stamp.resolved_at.clone(),
                };
                tickets.push(ticket_from_row(&row));
            }
        }
    }
    tickets
}

fn ticket_from_row(row: &TicketRow) -> Ticket {
    let issue_id = text(&row.issue_id).unwrap_or_default();
    let created_at = checked_instant(&issue_id, "created_at", &row.created_at);
    let resolved_at = checked_instant(&issue_id, "resolved_at", &row.resolved_at);

    Ticket {
        issue_type: text(&row.issue_type),
        status: text(&row.status).unwrap_or_default(),
        priority: Priority::from(text(&row.priority).unwrap_or_default()),
        assignee_name: text(&row.assignee_name),
        assignee_id: text(&row.assignee_id),
        assignee_email: text(&row.assignee_email),
        created_at,
        resolved_at,
        issue_id,
    }
}

fn checked_instant(
    issue_id: &str,
    field: &'static str,
    value: &Value,
) -> Option<crate::core::Timestamp> {
    let cell = instant(value);
    if cell == TimestampCell::Invalid {
        warn!(issue_id, field, value = %value, "unparseable timestamp, treating as absent");
    }
    cell.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_flat_rows() {
        let data = r#"[
            {"issue_id": "ISSUE-1", "issue_type": "Bug", "status": "Done", "priority": "High",
             "assignee_name": "Ana", "created_at": "2025-06-02T09:00:00Z",
             "resolved_at": "2025-06-03T09:00:00Z"},
            {"issue_id": 2, "priority": "Critical", "created_at": null, "resolved_at": "not_a_date"}
        ]"#;
        let tickets = from_json(data).unwrap();
        assert_eq!(tickets.len(), 2);

        assert_eq!(tickets[0].priority, Priority::High);
        assert_eq!(
            tickets[0].created_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
        );
        assert_eq!(tickets[1].issue_id, "2");
        assert_eq!(tickets[1].priority, Priority::from("Critical"));
        assert!(tickets[1].created_at.is_none());
        assert!(tickets[1].resolved_at.is_none());
    }

    #[test]
    fn test_nested_issues_explode() {
        let data = r#"{"issues": [
            {"id": "ISSUE-1", "issue_type": "Incident", "status": "Resolved", "priority": "Low",
             "assignee": [{"email": "ana@example.com", "id": "u1", "name": "Ana"},
                          {"email": "bruno@example.com", "id": "u2", "name": "Bruno"}],
             "timestamps": [{"created_at": "2025-06-02T09:00:00Z", "resolved_at": "2025-06-04T09:00:00Z"}]},
            {"id": "ISSUE-2", "issue_type": "Bug", "status": "Open", "priority": "Medium",
             "assignee": [], "timestamps": []}
        ]}"#;
        let tickets = from_json(data).unwrap();
        assert_eq!(tickets.len(), 3);

        assert_eq!(tickets[0].assignee_name.as_deref(), Some("Ana"));
        assert_eq!(tickets[1].assignee_email.as_deref(), Some("bruno@example.com"));
        assert_eq!(tickets[1].issue_id, "ISSUE-1");

        assert_eq!(tickets[2].issue_id, "ISSUE-2");
        assert!(tickets[2].assignee_name.is_none());
        assert!(!tickets[2].has_timestamps());
    }

    #[test]
    fn test_jira_timestamps_are_evaluated() {
        use crate::calendar::{CalendarProvider, HolidaySet, WeekendHolidayProvider};
        use crate::compliance::ComplianceRecordBuilder;
        use crate::sla::{BusinessHoursCalculator, BusinessWindow, SlaPolicy};
        use chrono::NaiveDate;

        let data = r#"[
            {"issue_id": "ISSUE-9", "issue_type": "Bug", "status": "Done", "priority": "High",
             "created_at": "2025-06-02T09:00:00.000+0000",
             "resolved_at": "2025-06-13T09:00:00.000+0000"}
        ]"#;
        let tickets = from_json(data).unwrap();
        assert_eq!(
            tickets[0].created_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap())
        );
        assert!(tickets[0].has_timestamps());

        let calendar = WeekendHolidayProvider::new(HolidaySet::new())
            .build(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            )
            .unwrap();
        let policy = SlaPolicy::default();
        let builder = ComplianceRecordBuilder::new(
            BusinessHoursCalculator::new(&calendar, BusinessWindow::OFFICE_HOURS),
            &policy,
        );
        let result = builder.evaluate(&tickets[0]);
        // Mon 9h, eight full days of 10h, Fri 1h
        assert_eq!(result.resolution_hours, 90.0);
        assert_eq!(result.is_sla_met, Some(false));
    }

    #[test]
    fn test_missing_issue_type_is_absent() {
        let tickets = from_json(r#"[{"issue_id": "ISSUE-1", "issue_type": ""}, {"issue_id": "ISSUE-2"}]"#)
            .unwrap();
        assert!(tickets.iter().all(|t| t.issue_type.is_none()));
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(from_json("{oops"), Err(Error::TicketParse(_))));
        assert!(matches!(from_json(r#"{"rows": []}"#), Err(Error::TicketParse(_))));
        assert!(matches!(from_json("42"), Err(Error::TicketParse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/definitely/not/here/tickets.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
