//! Aggregation and chart series building for test execution telemetry.
//!
//! Everything here is pure: functions take a freshly fetched collection
//! and return derived values for the view layer. Nothing is cached
//! between calls.

pub mod sample;
pub mod series;

/// Dashboard statistics over the current executions and test cases.
pub mod stats {
    use rtd_model::{ExecutionRecord, ExecutionStatus, TestCase};
    use serde::Serialize;

    /// Derived on every load; never persisted.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct DashboardStats {
        pub passed_count: usize,
        pub failed_count: usize,
        /// Registered test cases, not executions.
        pub total_test_case_count: usize,
        /// Percentage of completed executions that passed, 1 decimal.
        /// Zero when nothing has completed yet.
        pub pass_rate: f64,
    }

    impl DashboardStats {
        /// PASSED + FAILED executions.
        pub fn completed_count(&self) -> usize {
            self.passed_count + self.failed_count
        }

        /// Card text: `"66.7%"`, or `"0%"` before anything completes.
        pub fn pass_rate_label(&self) -> String {
            if self.completed_count() == 0 {
                "0%".to_string()
            } else {
                rtd_utils::fmt::percent1(self.pass_rate)
            }
        }
    }

    /// Reduce executions and test cases into dashboard statistics.
    ///
    /// Total function: an empty or all-running collection yields a zero
    /// pass rate, never NaN.
    pub fn compute_stats(executions: &[ExecutionRecord], test_cases: &[TestCase]) -> DashboardStats {
        let passed_count = executions
            .iter()
            .filter(|e| e.status == ExecutionStatus::Passed)
            .count();
        let failed_count = executions
            .iter()
            .filter(|e| e.status == ExecutionStatus::Failed)
            .count();
        let completed = passed_count + failed_count;
        let pass_rate = if completed > 0 {
            (passed_count as f64 / completed as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };
        DashboardStats {
            passed_count,
            failed_count,
            total_test_case_count: test_cases.len(),
            pass_rate,
        }
    }

}

/// Ordering and subsetting for the execution tables.
pub mod recent {
    /// Rows shown in the dashboard's recent-executions table.
    pub const RECENT_LIMIT: usize = 10;

    /// The first `n` items in arrival order, reversed.
    ///
    /// Assumes the backend returns ascending insertion order; the newest
    /// of the taken items then comes first. Fewer than `n` items are all
    /// taken.
    pub fn recent_executions<T: Clone>(executions: &[T], n: usize) -> Vec<T> {
        executions.iter().take(n).rev().cloned().collect()
    }

    /// The whole collection reversed, for the full executions table.
    pub fn newest_first<T: Clone>(executions: &[T]) -> Vec<T> {
        executions.iter().rev().cloned().collect()
    }

}

/// Status filtering for the executions view.
pub mod query {
    use rtd_model::ExecutionStatus;

    /// Decide whether a status filter goes on the request.
    ///
    /// Filtering happens server-side; a blank selection means "all" and
    /// adds nothing to the request.
    pub fn status_query(filter: Option<&str>) -> Option<ExecutionStatus> {
        filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ExecutionStatus::parse_filter)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_status_query() {
            assert_eq!(status_query(None), None);
            assert_eq!(status_query(Some("  ")), None);
            assert_eq!(status_query(Some("passed")), Some(ExecutionStatus::Passed));
        }
    }
}
