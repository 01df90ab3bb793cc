//! SLA Module
//!
//! Provides business-hours SLA evaluation:
//! - Business window configuration
//! - Business-hours calculation over a calendar
//! - Priority thresholds and compliance verdicts

pub mod agreement;
pub mod calculator;
pub mod window;

pub use agreement::{MissingTimestampPolicy, Priority, SlaPolicy};
pub use calculator::{business_hours, BusinessHoursCalculator};
pub use window::BusinessWindow;
