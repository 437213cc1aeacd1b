//! Core types and REST API client for radio test telemetry.
//!
//! The record types mirror the backend's JSON (camelCase) and are read-only
//! on the client: every refresh replaces the local copy wholesale. The
//! `api` feature adds the reqwest-backed [`client::TelemetryClient`].

#[cfg(feature = "api")]
pub mod client;
pub mod execution;
pub mod prediction;
pub mod report;
pub mod status;
pub mod test_case;

pub use execution::ExecutionRecord;
pub use prediction::Prediction;
pub use report::{Anomaly, TestReport};
pub use status::ExecutionStatus;
pub use test_case::{NewTestCase, TestCase, TestCaseForm};
