//! Pipeline Module
//!
//! Runs a full compliance batch:
//! - Build or load the calendar once
//! - Load and filter tickets
//! - Evaluate every ticket against the shared calendar
//! - Aggregate and write the result tables

pub mod config;

pub use config::{CalendarConfig, OutputConfig, PipelineConfig, TicketConfig};

use crate::calendar::{store, BusinessCalendar, CalendarProvider, WeekendHolidayProvider};
use crate::compliance::{
    summarize_by_assignee, summarize_by_issue_type, write_tables, ComplianceRecord,
    ComplianceRecordBuilder, Ticket, WrittenTables,
};
use crate::core::{now, Error, Result};
use crate::ingest;
use crate::sla::{BusinessHoursCalculator, BusinessWindow, SlaPolicy};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Evaluate tickets one after another.
pub fn evaluate_batch(
    tickets: &[Ticket],
    calendar: &BusinessCalendar,
    window: BusinessWindow,
    policy: &SlaPolicy,
) -> Vec<ComplianceRecord> {
    let builder = ComplianceRecordBuilder::new(BusinessHoursCalculator::new(calendar, window), policy);
    tickets.iter().map(|t| builder.build(t)).collect()
}

/// Evaluate tickets on blocking worker threads, preserving input order.
pub async fn evaluate_batch_parallel(
    tickets: Vec<Ticket>,
    calendar: Arc<BusinessCalendar>,
    window: BusinessWindow,
    policy: SlaPolicy,
    workers: usize,
) -> Result<Vec<ComplianceRecord>> {
    if tickets.is_empty() {
        return Ok(Vec::new());
    }
    let workers = workers.max(1);
    let chunk_size = (tickets.len() + workers - 1) / workers;

    let mut handles = Vec::new();
    let mut remaining = tickets.into_iter();
    loop {
        let chunk: Vec<Ticket> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let calendar = Arc::clone(&calendar);
        let policy = policy.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            evaluate_batch(&chunk, &calendar, window, &policy)
        }));
    }

    let chunks = futures::future::try_join_all(handles).await?;
    Ok(chunks.into_iter().flatten().collect())
}

/// Keep tickets whose status is listed; an empty list keeps everything.
pub fn filter_resolved(tickets: Vec<Ticket>, statuses: &[String]) -> Vec<Ticket> {
    if statuses.is_empty() {
        return tickets;
    }
    tickets
        .into_iter()
        .filter(|t| statuses.iter().any(|s| s == &t.status))
        .collect()
}

/// Counts from a finished run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,
    /// Tickets read from the source
    pub tickets_loaded: usize,
    /// Tickets evaluated after status filtering
    pub tickets_evaluated: usize,
    /// Verdict counts
    pub met: usize,
    pub breached: usize,
    pub undefined: usize,
    /// Window used
    pub window: BusinessWindow,
    /// Files written
    pub written: WrittenTables,
}

/// A configured compliance batch.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build or load the calendar snapshot.
    pub fn load_calendar(&self) -> Result<BusinessCalendar> {
        match &self.config.calendar {
            CalendarConfig::Generate {
                start,
                end,
                holidays,
            } => {
                let end = end.unwrap_or_else(|| now().date_naive());
                WeekendHolidayProvider::new(holidays.clone()).build(*start, end)
            }
            CalendarConfig::File { path } => store::load(path),
        }
    }

    /// Load tickets and apply the status filter.
    pub fn load_tickets(&self) -> Result<(usize, Vec<Ticket>)> {
        let path = self
            .config
            .tickets
            .path
            .as_deref()
            .ok_or_else(|| Error::Config("no ticket table configured".to_string()))?;
        let tickets = ingest::load(path)?;
        let loaded = tickets.len();
        let kept = filter_resolved(tickets, &self.config.tickets.resolved_statuses);
        Ok((loaded, kept))
    }

    /// Run the whole batch and write the output tables.
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_with_id(Uuid::new_v4()).await
    }

    #[instrument(name = "pipeline_run", skip_all, fields(run_id = %run_id))]
    async fn run_with_id(&self, run_id: Uuid) -> Result<RunSummary> {
        let window = self.config.window;
        info!(%window, "starting compliance run");

        let calendar = Arc::new(self.load_calendar()?);
        let (tickets_loaded, tickets) = self.load_tickets()?;
        warn_on_coverage_gaps(&calendar, &tickets);

        let tickets_evaluated = tickets.len();
        let records = evaluate_batch_parallel(
            tickets,
            Arc::clone(&calendar),
            window,
            self.config.policy.clone(),
            self.config.workers(),
        )
        .await?;

        let by_assignee = summarize_by_assignee(&records);
        let by_issue_type = summarize_by_issue_type(&records);
        let written = write_tables(
            &self.config.output.dir,
            self.config.output.format,
            &records,
            &by_assignee,
            &by_issue_type,
        )?;

        let met = records.iter().filter(|r| r.is_sla_met == Some(true)).count();
        let breached = records.iter().filter(|r| r.is_sla_met == Some(false)).count();
        let undefined = records.len() - met - breached;

        info!(
            tickets_loaded,
            tickets_evaluated, met, breached, undefined, "compliance run finished"
        );

        Ok(RunSummary {
            run_id,
            tickets_loaded,
            tickets_evaluated,
            met,
            breached,
            undefined,
            window,
            written,
        })
    }
}

/// Dates outside the calendar count as non-business; flag it when tickets reach there.
fn warn_on_coverage_gaps(calendar: &BusinessCalendar, tickets: &[Ticket]) {
    let dates = tickets
        .iter()
        .flat_map(|t| [t.created_at, t.resolved_at])
        .flatten()
        .map(|ts| ts.date_naive());
    let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) else {
        return;
    };
    if !calendar.covers(first, last) {
        warn!(
            %first,
            %last,
            calendar_first = ?calendar.first_date(),
            calendar_last = ?calendar.last_date(),
            "calendar does not cover every ticket date; missing dates count as non-business"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidaySet;
    use crate::sla::Priority;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn june() -> BusinessCalendar {
        WeekendHolidayProvider::new(HolidaySet::new())
            .build(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            )
            .unwrap()
    }

    fn tickets(n: usize) -> Vec<Ticket> {
        let base = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let priority = match i % 4 {
                    0 => Priority::High,
                    1 => Priority::Medium,
                    2 => Priority::Low,
                    _ => Priority::from("Critical"),
                };
                let created = base + Duration::hours(i as i64 % 48);
                let resolved = created + Duration::hours(3 + (i as i64 * 7) % 90);
                Ticket::new(&format!("ISSUE-{}", i), priority, Some(created), Some(resolved))
                    .with_status(if i % 5 == 0 { "Open" } else { "Done" })
            })
            .collect()
    }

    #[test]
    fn test_filter_resolved() {
        let statuses = vec!["Done".to_string(), "Resolved".to_string()];
        let kept = filter_resolved(tickets(10), &statuses);
        assert_eq!(kept.len(), 8);
        assert!(kept.iter().all(|t| t.status == "Done"));

        assert_eq!(filter_resolved(tickets(10), &[]).len(), 10);
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let cal = june();
        let policy = SlaPolicy::default();
        let input = tickets(37);

        let sequential = evaluate_batch(&input, &cal, BusinessWindow::OFFICE_HOURS, &policy);
        let parallel = evaluate_batch_parallel(
            input,
            Arc::new(cal),
            BusinessWindow::OFFICE_HOURS,
            policy,
            4,
        )
        .await
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel[0].issue_id, "ISSUE-0");
        assert_eq!(parallel[36].issue_id, "ISSUE-36");
    }

    #[test]
    fn test_parallel_empty_and_oversubscribed() {
        let cal = Arc::new(june());
        let empty = tokio_test::block_on(evaluate_batch_parallel(
            Vec::new(),
            Arc::clone(&cal),
            BusinessWindow::WHOLE_DAY,
            SlaPolicy::default(),
            8,
        ))
        .unwrap();
        assert!(empty.is_empty());

        let few = tokio_test::block_on(evaluate_batch_parallel(
            tickets(3),
            cal,
            BusinessWindow::WHOLE_DAY,
            SlaPolicy::default(),
            16,
        ))
        .unwrap();
        assert_eq!(few.len(), 3);
    }

    #[test]
    fn test_missing_ticket_path() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        assert!(matches!(pipeline.load_tickets(), Err(Error::Config(_))));
    }

    #[test]
    fn test_generated_calendar() {
        let mut config = PipelineConfig::default();
        config.calendar = CalendarConfig::Generate {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31),
            holidays: HolidaySet::new(),
        };
        let calendar = Pipeline::new(config).unwrap().load_calendar().unwrap();
        assert_eq!(calendar.len(), 365);
        // 2025 has 104 weekend days
        assert_eq!(calendar.business_day_count(), 261);
    }
}
