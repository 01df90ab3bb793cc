//! Per-ticket compliance records.

use crate::core::Timestamp;
use crate::sla::{BusinessHoursCalculator, Priority, SlaPolicy};
use serde::{Deserialize, Serialize};

/// A flattened ticket row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket ID
    pub issue_id: String,
    /// Ticket type
    pub issue_type: Option<String>,
    /// Workflow status
    pub status: String,
    /// Priority tier
    pub priority: Priority,
    /// Assignee display name
    pub assignee_name: Option<String>,
    /// Assignee ID
    pub assignee_id: Option<String>,
    /// Assignee e-mail
    pub assignee_email: Option<String>,
    /// Creation instant (UTC)
    pub created_at: Option<Timestamp>,
    /// Resolution instant (UTC)
    pub resolved_at: Option<Timestamp>,
}

impl Ticket {
    /// Create a ticket with no assignee.
    pub fn new(
        issue_id: &str,
        priority: Priority,
        created_at: Option<Timestamp>,
        resolved_at: Option<Timestamp>,
    ) -> Self {
        Self {
            issue_id: issue_id.to_string(),
            issue_type: None,
            status: String::new(),
            priority,
            assignee_name: None,
            assignee_id: None,
            assignee_email: None,
            created_at,
            resolved_at,
        }
    }

    /// Set issue type.
    pub fn with_type(mut self, issue_type: &str) -> Self {
        self.issue_type = Some(issue_type.to_string());
        self
    }

    /// Set status.
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    /// Set assignee name.
    pub fn with_assignee(mut self, name: &str) -> Self {
        self.assignee_name = Some(name.to_string());
        self
    }

    /// Whether both instants are present.
    pub fn has_timestamps(&self) -> bool {
        self.created_at.is_some() && self.resolved_at.is_some()
    }
}

/// Resolution time and verdict for one ticket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Business hours from creation to resolution
    pub resolution_hours: f64,
    /// Threshold for the ticket's priority
    pub expected_hours: Option<u32>,
    /// Compliance verdict
    pub is_sla_met: Option<bool>,
}

/// Output row of the compliance table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub issue_id: String,
    pub issue_type: Option<String>,
    pub assignee_name: Option<String>,
    pub priority: Priority,
    pub created_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_hours: f64,
    pub sla_expected_hours: Option<u32>,
    pub is_sla_met: Option<bool>,
}

/// Combines the calculator and the policy into compliance records.
#[derive(Clone, Copy, Debug)]
pub struct ComplianceRecordBuilder<'a> {
    calculator: BusinessHoursCalculator<'a>,
    policy: &'a SlaPolicy,
}

impl<'a> ComplianceRecordBuilder<'a> {
    /// Create a builder.
    pub fn new(calculator: BusinessHoursCalculator<'a>, policy: &'a SlaPolicy) -> Self {
        Self { calculator, policy }
    }

    /// Resolution hours and verdict for a ticket.
    pub fn evaluate(&self, ticket: &Ticket) -> ComplianceResult {
        let resolution_hours = self.calculator.compute(ticket.created_at, ticket.resolved_at);
        let expected_hours = self.policy.expected_hours(&ticket.priority);
        let is_sla_met =
            self.policy
                .verdict(resolution_hours, expected_hours, ticket.has_timestamps());
        ComplianceResult {
            resolution_hours,
            expected_hours,
            is_sla_met,
        }
    }

    /// Full output row for a ticket.
    pub fn build(&self, ticket: &Ticket) -> ComplianceRecord {
        let result = self.evaluate(ticket);
        ComplianceRecord {
            issue_id: ticket.issue_id.clone(),
            issue_type: ticket.issue_type.clone(),
            assignee_name: ticket.assignee_name.clone(),
            priority: ticket.priority.clone(),
            created_at: ticket.created_at,
            resolved_at: ticket.resolved_at,
            resolution_hours: result.resolution_hours,
            sla_expected_hours: result.expected_hours,
            is_sla_met: result.is_sla_met,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{BusinessCalendar, CalendarProvider, HolidaySet, WeekendHolidayProvider};
    use crate::sla::{BusinessWindow, MissingTimestampPolicy};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn ts(d: u32, h: u32) -> Option<Timestamp> {
        Some(Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap())
    }

    fn june() -> BusinessCalendar {
        WeekendHolidayProvider::new(HolidaySet::new())
            .build(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_high_priority_met() {
        let cal = june();
        let policy = SlaPolicy::default();
        let builder = ComplianceRecordBuilder::new(
            BusinessHoursCalculator::new(&cal, BusinessWindow::OFFICE_HOURS),
            &policy,
        );
        let ticket = Ticket::new("ISSUE-1", Priority::High, ts(2, 9), ts(3, 9))
            .with_type("Incident")
            .with_assignee("Ana");

        let record = builder.build(&ticket);
        assert_eq!(record.resolution_hours, 10.0);
        assert_eq!(record.sla_expected_hours, Some(24));
        assert_eq!(record.is_sla_met, Some(true));
        assert_eq!(record.assignee_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_exact_threshold_is_met() {
        let cal = june();
        let policy = SlaPolicy::default();
        let builder = ComplianceRecordBuilder::new(
            BusinessHoursCalculator::new(&cal, BusinessWindow::WHOLE_DAY),
            &policy,
        );
        let ticket = Ticket::new("ISSUE-2", Priority::High, ts(2, 0), ts(3, 0));
        let result = builder.evaluate(&ticket);
        assert_eq!(result.resolution_hours, 24.0);
        assert_eq!(result.is_sla_met, Some(true));

        let late = Ticket::new("ISSUE-3", Priority::High, ts(2, 0), ts(3, 1));
        assert_eq!(builder.evaluate(&late).is_sla_met, Some(false));
    }

    #[test]
    fn test_unrecognized_priority() {
        let cal = june();
        let policy = SlaPolicy::default();
        let builder = ComplianceRecordBuilder::new(
            BusinessHoursCalculator::new(&cal, BusinessWindow::WHOLE_DAY),
            &policy,
        );
        let ticket = Ticket::new("ISSUE-4", Priority::from("Critical"), ts(2, 0), ts(2, 6));
        let result = builder.evaluate(&ticket);
        assert_eq!(result.resolution_hours, 6.0);
        assert_eq!(result.expected_hours, None);
        assert_eq!(result.is_sla_met, None);
    }

    #[test]
    fn test_missing_resolved_at() {
        let cal = june();
        let zero = SlaPolicy::default();
        let undefined = SlaPolicy::default().with_missing_timestamps(MissingTimestampPolicy::Undefined);
        let calc = BusinessHoursCalculator::new(&cal, BusinessWindow::WHOLE_DAY);
        let ticket = Ticket::new("ISSUE-5", Priority::Low, ts(2, 0), None);

        let result = ComplianceRecordBuilder::new(calc, &zero).evaluate(&ticket);
        assert_eq!(result.resolution_hours, 0.0);
        assert_eq!(result.is_sla_met, Some(true));

        let result = ComplianceRecordBuilder::new(calc, &undefined).evaluate(&ticket);
        assert_eq!(result.resolution_hours, 0.0);
        assert_eq!(result.expected_hours, Some(120));
        assert_eq!(result.is_sla_met, None);
    }
}
