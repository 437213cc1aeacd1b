//! Errors surfaced by commands.

use rtd_model::client::ClientError;
use thiserror::Error;

/// A command that could not be carried out. `Display` is the text shown
/// to the user.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Missing or malformed input, caught before any request is sent.
    #[error("{0}")]
    Validation(String),
    /// The backend refused the request or could not be reached.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ClientError,
    },
}

impl CommandError {
    /// Prefer the backend's `message` field, then `fallback`.
    pub fn rejected(fallback: &str, source: ClientError) -> Self {
        let message = match &source {
            ClientError::Server { .. } => {
                format!("Error: {}", source.server_message().as_deref().unwrap_or(fallback))
            }
            other => format!("Error: {}", other),
        };
        CommandError::Rejected { message, source }
    }

    /// Show the raw response text after `prefix` instead of a parsed
    /// message.
    pub fn rejected_raw(prefix: &str, source: ClientError) -> Self {
        let message = match &source {
            ClientError::Server { status, .. } => format!(
                "{}: {}",
                prefix,
                source
                    .server_body()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status))
            ),
            other => format!("Error: {}", other),
        };
        CommandError::Rejected { message, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CommandError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: u16, body: &str) -> ClientError {
        ClientError::Server {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_backend_message_wins() {
        let err = CommandError::rejected(
            "Failed to start test",
            server(404, r#"{"status":"error","message":"Test case not found: TC-9"}"#),
        );
        assert_eq!(err.to_string(), "Error: Test case not found: TC-9");
    }

    #[test]
    fn test_fallback_without_message() {
        let err = CommandError::rejected("Failed to start test", server(500, "oops"));
        assert_eq!(err.to_string(), "Error: Failed to start test");
        let err = CommandError::rejected("Failed to start test", server(500, r#"{"message":""}"#));
        assert_eq!(err.to_string(), "Error: Failed to start test");
    }

    #[test]
    fn test_raw_body() {
        let err = CommandError::rejected_raw("Failed to generate report", server(500, "boom"));
        assert_eq!(err.to_string(), "Failed to generate report: boom");
        let err = CommandError::rejected_raw("Failed to generate report", server(502, ""));
        assert_eq!(err.to_string(), "Failed to generate report: HTTP 502");
    }

    #[test]
    fn test_validation() {
        let err = CommandError::Validation("Please select a test case".to_string());
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please select a test case");
    }
}
