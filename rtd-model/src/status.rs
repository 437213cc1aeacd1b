use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a test execution as reported by the backend.
///
/// The known states form a closed set, but the backend may emit others
/// (e.g. `ERROR`). Those are kept verbatim in `Other` so rendering never
/// fails on an unrecognized value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Other(String),
}

impl ExecutionStatus {
    /// The verbatim wire string.
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Pending => "PENDING",
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Passed => "PASSED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Other(s) => s.as_str(),
        }
    }

    /// Badge style key: the status string lower-cased.
    pub fn badge_class(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// PASSED or FAILED.
    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionStatus::Passed | ExecutionStatus::Failed)
    }

    /// Parse user input (e.g. a filter selection). Known states match
    /// case-insensitively; anything else is kept as typed.
    pub fn parse_filter(input: &str) -> ExecutionStatus {
        let trimmed = input.trim();
        match trimmed.to_uppercase().as_str() {
            "PENDING" => ExecutionStatus::Pending,
            "RUNNING" => ExecutionStatus::Running,
            "PASSED" => ExecutionStatus::Passed,
            "FAILED" => ExecutionStatus::Failed,
            _ => ExecutionStatus::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => ExecutionStatus::Pending,
            "RUNNING" => ExecutionStatus::Running,
            "PASSED" => ExecutionStatus::Passed,
            "FAILED" => ExecutionStatus::Failed,
            _ => ExecutionStatus::Other(value),
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(value: ExecutionStatus) -> Self {
        match value {
            ExecutionStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
