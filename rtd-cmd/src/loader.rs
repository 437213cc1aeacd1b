//! Reads behind each view.
//!
//! Each load fetches a complete collection and hands it to the view
//! layer in one piece; nothing is merged with an earlier load.

use log::{debug, error};
use rtd_data::query::status_query;
use rtd_data::recent::newest_first;
use rtd_model::client::{Backend, ClientError};
use rtd_view::dashboard::{dashboard_view, DashboardView};
use rtd_view::prediction::{test_case_options, SelectOption};
use rtd_view::table::{execution_table, test_case_error_table, test_case_table, Table, TableKind};

pub struct Loader<'a, B: Backend + ?Sized> {
    backend: &'a B,
    recent_limit: usize,
}

impl<'a, B: Backend + ?Sized> Loader<'a, B> {
    pub fn new(backend: &'a B, recent_limit: usize) -> Self {
        Self {
            backend,
            recent_limit,
        }
    }

    /// Executions and test cases are fetched concurrently; if either read
    /// fails the whole load fails and nothing is rendered.
    pub async fn dashboard(&self) -> Result<DashboardView, ClientError> {
        let (executions, test_cases) = tokio::try_join!(
            self.backend.fetch_executions(None),
            self.backend.fetch_test_cases()
        )?;
        debug!(
            "Dashboard load: {} executions, {} test cases",
            executions.len(),
            test_cases.len()
        );
        Ok(dashboard_view(&executions, &test_cases, self.recent_limit))
    }

    /// Full executions table, newest first. A blank filter means all.
    pub async fn executions(&self, filter: Option<&str>) -> Result<Table, ClientError> {
        let status = status_query(filter);
        let executions = self.backend.fetch_executions(status.as_ref()).await?;
        Ok(execution_table(
            TableKind::AllExecutions,
            &newest_first(&executions),
        ))
    }

    /// Executions of one test case, newest first.
    pub async fn executions_for_test_case(&self, test_case_id: &str) -> Result<Table, ClientError> {
        let executions = self
            .backend
            .fetch_executions_for_test_case(test_case_id.trim())
            .await?;
        Ok(execution_table(
            TableKind::AllExecutions,
            &newest_first(&executions),
        ))
    }

    /// Never fails: a read error turns into the error placeholder row.
    pub async fn test_cases(&self) -> Table {
        self.test_case_table(false).await
    }

    /// Like [`test_cases`](Self::test_cases), optionally only enabled ones.
    pub async fn test_case_table(&self, enabled_only: bool) -> Table {
        let result = if enabled_only {
            self.backend.fetch_enabled_test_cases().await
        } else {
            self.backend.fetch_test_cases().await
        };
        match result {
            Ok(test_cases) => test_case_table(&test_cases),
            Err(e) => {
                error!("Error loading test cases: {}", e);
                test_case_error_table()
            }
        }
    }

    /// Entries of the prediction selector.
    pub async fn prediction_options(&self) -> Result<Vec<SelectOption>, ClientError> {
        let test_cases = self.backend.fetch_test_cases().await?;
        Ok(test_case_options(&test_cases))
    }
}
