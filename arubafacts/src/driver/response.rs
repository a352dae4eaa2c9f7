//! Response type for command execution results.

use std::time::Duration;

use crate::parse::normalize;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (command echo and trailing prompt removed).
    pub result: String,

    /// Everything received for the command, echo and prompt included.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Failure message if the command failed (based on failure patterns).
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Mark the response as failed.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// The result with blank lines removed.
    pub fn normalized(&self) -> String {
        normalize(&self.result)
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_failure() {
        let response = Response::new("show clock", "12:00", "raw", "ap#", Duration::ZERO);
        assert!(response.is_success());

        let failed = response.with_failure("Invalid input");
        assert!(!failed.is_success());
        assert_eq!(failed.failure_message.as_deref(), Some("Invalid input"));
    }

    #[test]
    fn test_normalized_drops_blank_lines() {
        let response = Response::new(
            "show summary",
            "Name:AP1\r\n\r\nSerial Number:SN1",
            "",
            "",
            Duration::ZERO,
        );
        assert_eq!(response.normalized(), "Name:AP1\nSerial Number:SN1\n");
        assert_eq!(response.lines().count(), 3);
        assert!(response.contains("SN1"));
    }
}
