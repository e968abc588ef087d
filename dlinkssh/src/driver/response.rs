//! Result of running one CLI command.

use std::fmt;
use std::time::Duration;

/// Output of one command, cleaned up for parsing.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Output with echo, `Command:` banner and trailing prompt removed.
    pub result: String,

    /// Everything read from the device for this command.
    pub raw_result: String,

    /// The prompt the device returned to.
    pub prompt: String,

    /// Time from sending the command to seeing the prompt.
    pub elapsed: Duration,

    /// Failure string found in the output, if any.
    pub failure_message: Option<String>,
}

impl Response {
    pub(crate) fn new(
        command: impl Into<String>,
        result: String,
        raw_result: String,
        elapsed: Duration,
    ) -> Self {
        let prompt = raw_result
            .trim_end()
            .rsplit('\n')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        Self {
            command: command.into(),
            result,
            raw_result,
            prompt,
            elapsed,
            failure_message: None,
        }
    }

    pub(crate) fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Whether no failure string was detected.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Iterate over output lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the output contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.result)
    }
}
