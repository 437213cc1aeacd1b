//! In-memory backend for exercising commands without a server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rtd_model::client::{Backend, ClientError};
use rtd_model::prediction::MetricPredictions;
use rtd_model::{ExecutionRecord, ExecutionStatus, NewTestCase, Prediction, TestCase, TestReport};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBackend {
    pub executions: Vec<ExecutionRecord>,
    pub test_cases: Vec<TestCase>,
    pub fail_executions: bool,
    pub fail_test_cases: bool,
    /// Every write answers with this status and body when set.
    pub reject: Option<(u16, String)>,
    pub prediction: Option<Prediction>,
    pub metrics: MetricPredictions,
    pub report: Option<TestReport>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn write(&self, call: String) -> Result<(), ClientError> {
        self.record(call);
        match &self.reject {
            Some((status, body)) => Err(ClientError::Server {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }

    fn unavailable() -> ClientError {
        ClientError::Server {
            status: 503,
            body: String::new(),
        }
    }

    fn report(&self) -> Result<TestReport, ClientError> {
        self.report.clone().ok_or_else(|| ClientError::Server {
            status: 404,
            body: String::new(),
        })
    }
}

pub fn test_case(id: &str, name: &str) -> TestCase {
    serde_json::from_str(&format!(
        r#"{{"id":1,"testCaseId":"{}","name":"{}","technology":"5G NR"}}"#,
        id, name
    ))
    .unwrap()
}

pub fn report(suite: &str) -> TestReport {
    serde_json::from_str(&format!(
        r#"{{"testSuite":"{}","totalTests":4,"passedTests":3,"failedTests":1,"passRate":75.0}}"#,
        suite
    ))
    .unwrap()
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_executions(
        &self,
        status: Option<&ExecutionStatus>,
    ) -> Result<Vec<ExecutionRecord>, ClientError> {
        self.record(format!(
            "fetch_executions {}",
            status.map(|s| s.as_str()).unwrap_or("*")
        ));
        if self.fail_executions {
            return Err(Self::unavailable());
        }
        Ok(self
            .executions
            .iter()
            .filter(|e| status.map_or(true, |s| &e.status == s))
            .cloned()
            .collect())
    }

    async fn fetch_executions_for_test_case(
        &self,
        test_case_id: &str,
    ) -> Result<Vec<ExecutionRecord>, ClientError> {
        self.record(format!("fetch_executions_for_test_case {}", test_case_id));
        Ok(self
            .executions
            .iter()
            .filter(|e| e.test_case_id.as_deref() == Some(test_case_id))
            .cloned()
            .collect())
    }

    async fn fetch_test_cases(&self) -> Result<Vec<TestCase>, ClientError> {
        self.record("fetch_test_cases".to_string());
        if self.fail_test_cases {
            return Err(Self::unavailable());
        }
        Ok(self.test_cases.clone())
    }

    async fn fetch_enabled_test_cases(&self) -> Result<Vec<TestCase>, ClientError> {
        self.record("fetch_enabled_test_cases".to_string());
        Ok(self.test_cases.iter().filter(|t| t.enabled).cloned().collect())
    }

    async fn create_test_case(&self, new: &NewTestCase) -> Result<TestCase, ClientError> {
        self.write(format!("create_test_case {}", new.test_case_id))?;
        Ok(test_case(&new.test_case_id, &new.name))
    }

    async fn set_test_case_enabled(&self, id: i64, enabled: bool) -> Result<(), ClientError> {
        self.write(format!("set_test_case_enabled {} {}", id, enabled))
    }

    async fn run_test(&self, test_case_id: &str) -> Result<(), ClientError> {
        self.write(format!("run_test {}", test_case_id))
    }

    async fn run_all(&self) -> Result<(), ClientError> {
        self.write("run_all".to_string())
    }

    async fn run_technology(&self, technology: &str) -> Result<(), ClientError> {
        self.write(format!("run_technology {}", technology))
    }

    async fn run_category(&self, category: &str) -> Result<(), ClientError> {
        self.write(format!("run_category {}", category))
    }

    async fn generate_report(
        &self,
        test_suite: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TestReport, ClientError> {
        self.write(format!(
            "generate_report {} {}",
            test_suite,
            (end - start).num_days()
        ))?;
        self.report()
    }

    async fn report_for_test_case(&self, test_case_id: &str) -> Result<TestReport, ClientError> {
        self.record(format!("report_for_test_case {}", test_case_id));
        self.report()
    }

    async fn report_for_technology(&self, technology: &str) -> Result<TestReport, ClientError> {
        self.record(format!("report_for_technology {}", technology));
        self.report()
    }

    async fn predict_outcome(&self, test_case_id: &str) -> Result<Prediction, ClientError> {
        self.record(format!("predict_outcome {}", test_case_id));
        self.prediction.clone().ok_or_else(Self::unavailable)
    }

    async fn predict_metrics(
        &self,
        test_case_id: &str,
    ) -> Result<MetricPredictions, ClientError> {
        self.record(format!("predict_metrics {}", test_case_id));
        Ok(self.metrics)
    }
}
