//! SLA thresholds by priority.
//!
//! Maps a ticket priority to the business hours allowed for resolution and
//! derives the compliance verdict.

use serde::{Deserialize, Serialize};

/// Ticket priority tier.
///
/// Anything other than `High`, `Medium` or `Low` is kept verbatim as
/// [`Priority::Other`]; it has no threshold but is not an error.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Label as it appears in ticket tables.
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(label) => label,
        }
    }

    /// Whether this priority has a threshold.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Priority::Other(_))
    }
}

impl From<&str> for Priority {
    fn from(label: &str) -> Self {
        match label {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            other => Priority::Other(other.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        Priority::from(label.as_str())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How tickets without a usable created/resolved pair are judged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTimestampPolicy {
    /// Zero hours, compared against the threshold like any other value
    #[default]
    ZeroHours,
    /// Zero hours, but the verdict is left undefined
    Undefined,
}

/// Expected resolution hours per priority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaPolicy {
    /// Hours allowed for High priority
    pub high: u32,
    /// Hours allowed for Medium priority
    pub medium: u32,
    /// Hours allowed for Low priority
    pub low: u32,
    /// Treatment of missing timestamps
    pub missing_timestamps: MissingTimestampPolicy,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            high: 24,
            medium: 72,
            low: 120,
            missing_timestamps: MissingTimestampPolicy::ZeroHours,
        }
    }
}

impl SlaPolicy {
    /// Create the standard 24/72/120 policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the missing-timestamp treatment.
    pub fn with_missing_timestamps(mut self, policy: MissingTimestampPolicy) -> Self {
        self.missing_timestamps = policy;
        self
    }

    /// Threshold for a priority, `None` when unrecognized.
    pub fn expected_hours(&self, priority: &Priority) -> Option<u32> {
        match priority {
            Priority::High => Some(self.high),
            Priority::Medium => Some(self.medium),
            Priority::Low => Some(self.low),
            Priority::Other(_) => None,
        }
    }

    /// Verdict for a resolution time; equality with the threshold is compliant.
    pub fn evaluate(resolution_hours: f64, expected_hours: Option<u32>) -> Option<bool> {
        expected_hours.map(|expected| resolution_hours <= f64::from(expected))
    }

    /// Verdict honoring the missing-timestamp treatment.
    pub fn verdict(
        &self,
        resolution_hours: f64,
        expected_hours: Option<u32>,
        timestamps_complete: bool,
    ) -> Option<bool> {
        if !timestamps_complete && self.missing_timestamps == MissingTimestampPolicy::Undefined {
            return None;
        }
        Self::evaluate(resolution_hours, expected_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_hours() {
        let policy = SlaPolicy::default();
        assert_eq!(policy.expected_hours(&Priority::High), Some(24));
        assert_eq!(policy.expected_hours(&Priority::Medium), Some(72));
        assert_eq!(policy.expected_hours(&Priority::Low), Some(120));
        assert_eq!(policy.expected_hours(&Priority::from("Critical")), None);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::from("High"), Priority::High);
        // Case-sensitive like the source tables
        assert_eq!(Priority::from("high"), Priority::Other("high".to_string()));
        assert_eq!(Priority::from("Critical").to_string(), "Critical");
        assert!(!Priority::from("").is_recognized());
    }

    #[test]
    fn test_evaluate_boundary() {
        assert_eq!(SlaPolicy::evaluate(24.0, Some(24)), Some(true));
        assert_eq!(SlaPolicy::evaluate(24.01, Some(24)), Some(false));
        assert_eq!(SlaPolicy::evaluate(0.0, Some(24)), Some(true));
        assert_eq!(SlaPolicy::evaluate(5.0, None), None);
    }

    #[test]
    fn test_missing_timestamp_policies() {
        let zero = SlaPolicy::default();
        assert_eq!(zero.verdict(0.0, Some(24), false), Some(true));

        let undefined = SlaPolicy::default().with_missing_timestamps(MissingTimestampPolicy::Undefined);
        assert_eq!(undefined.verdict(0.0, Some(24), false), None);
        assert_eq!(undefined.verdict(30.0, Some(24), true), Some(false));
    }

    #[test]
    fn test_policy_serde() {
        let policy: SlaPolicy =
            serde_json::from_str(r#"{"high": 8, "missing_timestamps": "undefined"}"#).unwrap();
        assert_eq!(policy.high, 8);
        assert_eq!(policy.medium, 72);
        assert_eq!(policy.missing_timestamps, MissingTimestampPolicy::Undefined);

        let json = serde_json::to_string(&Priority::Other("Critical".to_string())).unwrap();
        assert_eq!(json, "\"Critical\"");
    }
}
