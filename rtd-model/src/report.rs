use crate::status::ExecutionStatus;
use rtd_utils::dates::WireTime;
use serde::{Deserialize, Serialize};

/// A backend-built report over a set of executions.
///
/// `pass_rate` is already a percentage (0..100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default, with = "rtd_utils::dates::wire_opt")]
    pub generated_at: Option<WireTime>,
    #[serde(default)]
    pub test_suite: Option<String>,
    #[serde(default)]
    pub total_tests: u32,
    #[serde(default)]
    pub passed_tests: u32,
    #[serde(default)]
    pub failed_tests: u32,
    #[serde(default)]
    pub error_tests: Option<u32>,
    #[serde(default)]
    pub pass_rate: f64,
    #[serde(default)]
    pub total_duration_ms: Option<u64>,
    #[serde(default)]
    pub executions: Option<Vec<ExecutionSummary>>,
    /// Free-form statistics; shape varies by report kind.
    #[serde(default)]
    pub statistics: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub anomalies: Option<Vec<Anomaly>>,
}

impl TestReport {
    /// Anomalies, only when the backend sent a non-empty list.
    pub fn anomalies(&self) -> Option<&[Anomaly]> {
        self.anomalies.as_deref().filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    #[serde(default)]
    pub test_case_id: Option<String>,
    #[serde(default)]
    pub test_case_name: Option<String>,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A measurement flagged by the backend's anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub test_case_id: String,
    pub metric: String,
    pub value: f64,
    pub expected: f64,
    #[serde(default)]
    pub deviation: Option<f64>,
    /// LOW, MEDIUM, HIGH
    pub severity: String,
}

#[cfg(test)]
mod tests {
    use super::TestReport;

    #[test]
    fn test_empty_anomalies_are_hidden() {
        let report: TestReport = serde_json::from_str(
            r#"{"testSuite":"Weekly Report","totalTests":0,"passedTests":0,"failedTests":0,
                "passRate":0.0,"anomalies":[]}"#,
        )
        .unwrap();
        assert!(report.anomalies().is_none());

        let report: TestReport = serde_json::from_str(
            r#"{"testSuite":"Weekly Report","totalTests":2,"passedTests":1,"failedTests":1,
                "passRate":50.0,"generatedAt":"2024-01-15T10:30:00",
                "anomalies":[{"testCaseId":"TC-1","metric":"powerLevel","value":-3.1,
                "expected":-10.0,"deviation":3.4,"severity":"HIGH"}]}"#,
        )
        .unwrap();
        assert_eq!(report.anomalies().map(|a| a.len()), Some(1));
        assert!(report.generated_at.is_some());
    }
}
