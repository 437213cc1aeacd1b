use crate::status::ExecutionStatus;
use rtd_utils::dates::WireTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A single test execution as held by the backend.
///
/// Every measurement is optional: absent means "not yet measured",
/// never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: i64,
    #[serde(default)]
    pub test_case_id: Option<String>,
    #[serde(default)]
    pub test_case_name: Option<String>,
    /// Radio technology label (5G, LTE, W-CDMA, GSM, ...)
    #[serde(default)]
    pub technology: Option<String>,
    pub status: ExecutionStatus,
    #[serde(default, with = "rtd_utils::dates::wire_opt")]
    pub start_time: Option<WireTime>,
    #[serde(default, with = "rtd_utils::dates::wire_opt")]
    pub end_time: Option<WireTime>,
    /// Absent while the execution is still running.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub measurements: Vec<f64>,
    /// dBm
    #[serde(default)]
    pub power_level: Option<f64>,
    #[serde(default)]
    pub frequency_hz: Option<f64>,
    /// Error Vector Magnitude (%)
    #[serde(default)]
    pub evm: Option<f64>,
    /// Adjacent Channel Power Ratio (dB)
    #[serde(default)]
    pub acpr: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ExecutionRecord {
    /// A record with only the required fields set.
    pub fn new(id: i64, status: ExecutionStatus) -> Self {
        Self {
            id,
            test_case_id: None,
            test_case_name: None,
            technology: None,
            status,
            start_time: None,
            end_time: None,
            duration_ms: None,
            measurements: Vec::new(),
            power_level: None,
            frequency_hz: None,
            evm: None,
            acpr: None,
            error_message: None,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    Ok(Option::<Vec<f64>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BACKEND_JSON: &str = r#"[
        {"id":1,"testCaseId":"TC-5G-001","testCaseName":"5G NR Power","technology":"5G",
         "status":"PASSED","startTime":"2024-01-15T10:30:00","endTime":"2024-01-15T10:30:01.5",
         "durationMs":1500,"measurements":[-10.1,-9.9],"powerLevel":-10.0,"frequencyHz":3.5E9,
         "evm":1.2,"acpr":-45.3,"errorMessage":null,"testLog":"..."},
        {"id":2,"testCaseId":null,"status":"RUNNING","startTime":null,"measurements":null}
    ]"#;

    #[test]
    fn test_parse_backend_payload() {
        let records: Vec<ExecutionRecord> = serde_json::from_str(BACKEND_JSON).unwrap();
        assert_eq!(records.len(), 2);

        let done = &records[0];
        assert_eq!(done.status, ExecutionStatus::Passed);
        assert_eq!(done.duration_ms, Some(1500));
        assert_eq!(
            done.start_time,
            Some(WireTime::Naive(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap()
            ))
        );
        assert_eq!(done.measurements.len(), 2);

        let running = &records[1];
        assert_eq!(running.status, ExecutionStatus::Running);
        assert_eq!(running.test_case_id, None);
        assert_eq!(running.power_level, None);
        assert_eq!(running.start_time, None);
        assert!(running.measurements.is_empty());
    }
}
