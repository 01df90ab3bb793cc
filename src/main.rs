//! Command-line entry point.
//!
//! `calendar` generates and saves a business calendar; `evaluate` runs the
//! compliance batch. Flags override values from `--config`.

use bizhours_sla::calendar::{store, CalendarProvider, HolidayRegion, HolidaySet, WeekendHolidayProvider};
use bizhours_sla::compliance::ExportFormat;
use bizhours_sla::core::now;
use bizhours_sla::monitoring::{init_logging, LogConfig, LogFormat, LogLevel};
use bizhours_sla::pipeline::{CalendarConfig, Pipeline, PipelineConfig};
use bizhours_sla::sla::{BusinessWindow, MissingTimestampPolicy};
use bizhours_sla::{Error, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "bizhours-sla", version, about = "Business-hours SLA compliance for ticket tables")]
struct Cli {
    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Single-line log output
    #[arg(long, global = true)]
    compact_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a business calendar table
    Calendar(CalendarArgs),
    /// Evaluate SLA compliance for a ticket table
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct CalendarArgs {
    /// First date (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Holiday region (none, br)
    #[arg(long, default_value = "br", value_parser = parse_region)]
    holidays: HolidayRegion,

    /// Additional holiday (repeatable)
    #[arg(long = "extra-holiday")]
    extra: Vec<NaiveDate>,

    /// Output path; `.csv` writes CSV, anything else JSON
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args)]
struct EvaluateArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticket table (JSON rows or `{"issues": [...]}`)
    #[arg(long)]
    tickets: Option<PathBuf>,

    /// Precomputed calendar table instead of generating one
    #[arg(long)]
    calendar: Option<PathBuf>,

    /// Business window: START-END, `whole-day` or `office-hours`
    #[arg(long)]
    window: Option<BusinessWindow>,

    /// Output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Evaluate every ticket regardless of status
    #[arg(long)]
    all_statuses: bool,

    /// Verdict for tickets missing a timestamp (zero_hours, undefined)
    #[arg(long, value_parser = parse_missing_policy)]
    missing_timestamps: Option<MissingTimestampPolicy>,

    /// Worker count
    #[arg(long)]
    workers: Option<usize>,
}

fn parse_region(raw: &str) -> std::result::Result<HolidayRegion, String> {
    match raw {
        "none" => Ok(HolidayRegion::None),
        "br" => Ok(HolidayRegion::Br),
        other => Err(format!("unknown holiday region `{}`", other)),
    }
}

fn parse_missing_policy(raw: &str) -> std::result::Result<MissingTimestampPolicy, String> {
    match raw {
        "zero_hours" => Ok(MissingTimestampPolicy::ZeroHours),
        "undefined" => Ok(MissingTimestampPolicy::Undefined),
        other => Err(format!("unknown missing-timestamp policy `{}`", other)),
    }
}

fn run_calendar(args: CalendarArgs) -> Result<()> {
    let end = args.end.unwrap_or_else(|| now().date_naive());
    let mut holidays = HolidaySet::for_region(args.holidays);
    holidays.extra.extend(args.extra);

    let calendar = WeekendHolidayProvider::new(holidays).build(args.start, end)?;
    store::save(&calendar, &args.out)?;
    println!(
        "{} days ({} business) written to {}",
        calendar.len(),
        calendar.business_day_count(),
        args.out.display()
    );
    Ok(())
}

fn evaluate_config(args: EvaluateArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(path) = args.tickets {
        config.tickets.path = Some(path);
    }
    if let Some(path) = args.calendar {
        config.calendar = CalendarConfig::File { path };
    }
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(dir) = args.out_dir {
        config.output.dir = dir;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.all_statuses {
        config.tickets.resolved_statuses.clear();
    }
    if let Some(policy) = args.missing_timestamps {
        config.policy.missing_timestamps = policy;
    }
    if args.workers.is_some() {
        config.parallelism = args.workers;
    }

    if config.tickets.path.is_none() {
        return Err(Error::Config(
            "a ticket table is required (--tickets or tickets.path)".to_string(),
        ));
    }
    config.validate()?;
    Ok(config)
}

async fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let pipeline = Pipeline::new(evaluate_config(args)?)?;
    let summary = pipeline.run().await?;

    println!(
        "run {}: {} tickets evaluated ({} loaded), window {}",
        summary.run_id, summary.tickets_evaluated, summary.tickets_loaded, summary.window
    );
    println!(
        "  met: {}  breached: {}  undefined: {}",
        summary.met, summary.breached, summary.undefined
    );
    println!("  records: {}", summary.written.records.display());
    println!("  by assignee: {}", summary.written.by_assignee.display());
    println!("  by issue type: {}", summary.written.by_issue_type.display());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.log_level,
        format: if cli.compact_logs {
            LogFormat::Compact
        } else {
            LogFormat::Text
        },
        ..Default::default()
    };
    if let Err(err) = init_logging(&log_config) {
        eprintln!("failed to initialize logging: {}", err);
    }

    let result = match cli.command {
        Command::Calendar(args) => run_calendar(args),
        Command::Evaluate(args) => run_evaluate(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
