//! REST client for the test telemetry backend.
//!
//! Every call is a single request: no retries, no caching. Callers decide
//! how failures are reported and when to ask again.

use crate::execution::ExecutionRecord;
use crate::prediction::{
    DurationPrediction, EvmPrediction, MetricPredictions, PowerLevelPrediction, Prediction,
};
use crate::report::TestReport;
use crate::status::ExecutionStatus;
use crate::test_case::{NewTestCase, TestCase};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {body}")]
    Server { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid API base URL: {0}")]
    BaseUrl(String),
}

impl ClientError {
    /// The `message` field of a structured error body, if any.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ClientError::Server { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message")?.as_str().map(str::to_string))
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// The raw response text of a non-2xx reply, if it had one.
    pub fn server_body(&self) -> Option<&str> {
        match self {
            ClientError::Server { body, .. } if !body.trim().is_empty() => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Everything the dashboard asks of the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All executions, or only those with `status` (filtered server-side).
    async fn fetch_executions(
        &self,
        status: Option<&ExecutionStatus>,
    ) -> Result<Vec<ExecutionRecord>, ClientError>;
    async fn fetch_executions_for_test_case(
        &self,
        test_case_id: &str,
    ) -> Result<Vec<ExecutionRecord>, ClientError>;
    async fn fetch_test_cases(&self) -> Result<Vec<TestCase>, ClientError>;
    async fn fetch_enabled_test_cases(&self) -> Result<Vec<TestCase>, ClientError>;

    async fn create_test_case(&self, test_case: &NewTestCase) -> Result<TestCase, ClientError>;
    /// `id` is the database key, not the test case identifier.
    async fn set_test_case_enabled(&self, id: i64, enabled: bool) -> Result<(), ClientError>;

    async fn run_test(&self, test_case_id: &str) -> Result<(), ClientError>;
    async fn run_all(&self) -> Result<(), ClientError>;
    async fn run_technology(&self, technology: &str) -> Result<(), ClientError>;
    async fn run_category(&self, category: &str) -> Result<(), ClientError>;

    async fn generate_report(
        &self,
        test_suite: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TestReport, ClientError>;
    async fn report_for_test_case(&self, test_case_id: &str) -> Result<TestReport, ClientError>;
    async fn report_for_technology(&self, technology: &str) -> Result<TestReport, ClientError>;

    async fn predict_outcome(&self, test_case_id: &str) -> Result<Prediction, ClientError>;
    async fn predict_metrics(&self, test_case_id: &str)
        -> Result<MetricPredictions, ClientError>;
}

/// reqwest-backed [`Backend`].
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    client: Client,
    base: Url,
}

impl TelemetryClient {
    /// Build a client for an API base such as `http://localhost:8080/api`.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(api_base).map_err(|e| ClientError::BaseUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(api_base.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Append path segments to the base, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments);
        debug!("GET {}", url);
        read_json(self.client.get(url).send().await?).await
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, ClientError> {
        let url = self.endpoint(segments);
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    async fn post_ack(&self, segments: &[&str]) -> Result<(), ClientError> {
        let url = self.endpoint(segments);
        debug!("POST {}", url);
        expect_ack(self.client.post(url).send().await?).await
    }
}

/// Decode a 2xx JSON body, or turn the reply into [`ClientError::Server`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(ClientError::Decode)
}

/// Accept any 2xx; the body is optional and ignored.
async fn expect_ack(response: Response) -> Result<(), ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Could not read {} response body: {}", status, e);
            String::new()
        }
    };
    Err(ClientError::Server {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Backend for TelemetryClient {
    async fn fetch_executions(
        &self,
        status: Option<&ExecutionStatus>,
    ) -> Result<Vec<ExecutionRecord>, ClientError> {
        match status {
            Some(s) => self.get(&["test-executions", "status", s.as_str()]).await,
            None => self.get(&["test-executions"]).await,
        }
    }

    async fn fetch_executions_for_test_case(
        &self,
        test_case_id: &str,
    ) -> Result<Vec<ExecutionRecord>, ClientError> {
        self.get(&["test-executions", "test-case", test_case_id]).await
    }

    async fn fetch_test_cases(&self) -> Result<Vec<TestCase>, ClientError> {
        self.get(&["test-cases"]).await
    }

    async fn fetch_enabled_test_cases(&self) -> Result<Vec<TestCase>, ClientError> {
        self.get(&["test-cases", "enabled"]).await
    }

    async fn create_test_case(&self, test_case: &NewTestCase) -> Result<TestCase, ClientError> {
        let url = self.endpoint(&["test-cases"]);
        debug!("POST {} ({})", url, test_case.test_case_id);
        read_json(self.client.post(url).json(test_case).send().await?).await
    }

    async fn set_test_case_enabled(&self, id: i64, enabled: bool) -> Result<(), ClientError> {
        let action = if enabled { "enable" } else { "disable" };
        self.post_ack(&["test-cases", &id.to_string(), action]).await
    }

    async fn run_test(&self, test_case_id: &str) -> Result<(), ClientError> {
        self.post_ack(&["test-runner", "run", test_case_id]).await
    }

    async fn run_all(&self) -> Result<(), ClientError> {
        self.post_ack(&["test-runner", "run", "all"]).await
    }

    async fn run_technology(&self, technology: &str) -> Result<(), ClientError> {
        self.post_ack(&["test-runner", "run", "technology", technology]).await
    }

    async fn run_category(&self, category: &str) -> Result<(), ClientError> {
        self.post_ack(&["test-runner", "run", "category", category]).await
    }

    async fn generate_report(
        &self,
        test_suite: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TestReport, ClientError> {
        let url = self.endpoint(&["test-reports", "generate"]);
        let (start_time, end_time) = (
            rtd_utils::dates::to_wire(&start),
            rtd_utils::dates::to_wire(&end),
        );
        debug!("POST {} [{} .. {}]", url, start_time, end_time);
        let request = self.client.post(url).query(&[
            ("testSuite", test_suite),
            ("startTime", start_time.as_str()),
            ("endTime", end_time.as_str()),
        ]);
        read_json(request.send().await?).await
    }

    async fn report_for_test_case(&self, test_case_id: &str) -> Result<TestReport, ClientError> {
        self.get(&["test-reports", "test-case", test_case_id]).await
    }

    async fn report_for_technology(&self, technology: &str) -> Result<TestReport, ClientError> {
        self.get(&["test-reports", "technology", technology]).await
    }

    async fn predict_outcome(&self, test_case_id: &str) -> Result<Prediction, ClientError> {
        self.get(&["predictions", "test-outcome", test_case_id]).await
    }

    async fn predict_metrics(
        &self,
        test_case_id: &str,
    ) -> Result<MetricPredictions, ClientError> {
        let power: Option<PowerLevelPrediction> = self
            .get_optional(&["predictions", "power-level", test_case_id])
            .await?;
        let evm: Option<EvmPrediction> =
            self.get_optional(&["predictions", "evm", test_case_id]).await?;
        let duration: Option<DurationPrediction> = self
            .get_optional(&["predictions", "duration", test_case_id])
            .await?;
        Ok(MetricPredictions {
            power_level_dbm: power.map(|p| p.dbm),
            evm_percent: evm.map(|e| e.percent),
            duration_ms: duration.map(|d| d.millis),
        })
    }
}
