//! Platform definition for vendor-specific session settings.

use std::fmt;
use std::sync::Arc;

use regex::bytes::Regex;

use super::VendorBehavior;

const DEFAULT_PAGER: &str = r"Next Page";
const DEFAULT_USERNAME_PROMPT: &str = r"(?i)(user ?name|login)\s*:\s*\z";
const DEFAULT_PASSWORD_PROMPT: &str = r"(?i)pass ?word\s*:\s*\z";

/// Everything the driver needs to know about a device family's CLI.
#[derive(Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g. "dlink").
    pub name: String,

    /// Pattern matching the command prompt at the end of output.
    pub prompt: Regex,

    /// Pattern matching the "more output" pager prompt.
    pub pager_prompt: Regex,

    /// Telnet login username prompt.
    pub username_prompt: Regex,

    /// Telnet login password prompt.
    pub password_prompt: Regex,

    /// Strings that indicate command failure.
    pub failed_when_contains: Vec<String>,

    /// Command whose output is long enough to trigger the pager.
    pub paging_probe_command: String,

    /// Keystroke that leaves the pager.
    pub pager_quit: String,

    /// Command that turns the pager off.
    pub disable_paging_command: Option<String>,

    /// Command that turns the pager back on.
    pub enable_paging_command: Option<String>,

    /// Terminal width for the SSH PTY.
    pub terminal_width: u32,

    /// Terminal height for the SSH PTY.
    pub terminal_height: u32,

    /// Optional vendor-specific behavior.
    pub behavior: Option<Arc<dyn VendorBehavior>>,
}

impl PlatformDefinition {
    /// Create a platform with the given prompt pattern and generic defaults.
    pub fn new(name: impl Into<String>, prompt: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt: Regex::new(prompt)?,
            pager_prompt: Regex::new(DEFAULT_PAGER)?,
            username_prompt: Regex::new(DEFAULT_USERNAME_PROMPT)?,
            password_prompt: Regex::new(DEFAULT_PASSWORD_PROMPT)?,
            failed_when_contains: vec![],
            paging_probe_command: String::new(),
            pager_quit: "q".to_string(),
            disable_paging_command: None,
            enable_paging_command: None,
            terminal_width: 511,
            terminal_height: 24,
            behavior: None,
        })
    }

    /// Set the pager prompt pattern.
    pub fn with_pager_prompt(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pager_prompt = Regex::new(pattern)?;
        Ok(self)
    }

    /// Set the Telnet login prompt patterns.
    pub fn with_login_prompts(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Self, regex::Error> {
        self.username_prompt = Regex::new(username)?;
        self.password_prompt = Regex::new(password)?;
        Ok(self)
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Set how paging is detected and toggled.
    pub fn with_paging(
        mut self,
        probe: impl Into<String>,
        quit: impl Into<String>,
        disable: impl Into<String>,
        enable: impl Into<String>,
    ) -> Self {
        self.paging_probe_command = probe.into();
        self.pager_quit = quit.into();
        self.disable_paging_command = Some(disable.into());
        self.enable_paging_command = Some(enable.into());
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set vendor behavior.
    pub fn with_behavior(mut self, behavior: Arc<dyn VendorBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Whether the platform knows how to toggle paging.
    pub fn supports_paging_control(&self) -> bool {
        !self.paging_probe_command.is_empty() && self.disable_paging_command.is_some()
    }

    /// First failure string contained in `output`, if any.
    pub fn failure_in(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

impl fmt::Debug for PlatformDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformDefinition")
            .field("name", &self.name)
            .field("prompt", &self.prompt.as_str())
            .field("pager_prompt", &self.pager_prompt.as_str())
            .field("failed_when_contains", &self.failed_when_contains)
            .field("paging_probe_command", &self.paging_probe_command)
            .field("disable_paging_command", &self.disable_paging_command)
            .field("enable_paging_command", &self.enable_paging_command)
            .field("terminal_width", &self.terminal_width)
            .field("terminal_height", &self.terminal_height)
            .field(
                "behavior",
                &self.behavior.as_ref().map(|_| "<VendorBehavior>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let platform = PlatformDefinition::new("generic", r"#\s?\z").unwrap();
        assert!(!platform.supports_paging_control());
        assert!(platform.username_prompt.is_match(b"UserName:"));
        assert!(platform.username_prompt.is_match(b"login: "));
        assert!(platform.password_prompt.is_match(b"PassWord:"));
        assert!(platform.password_prompt.is_match(b"Password: "));
        assert!(platform.pager_prompt.is_match(b"SPACE n Next Page ENTER"));
    }

    #[test]
    fn test_invalid_prompt_is_error() {
        assert!(PlatformDefinition::new("broken", r"(unclosed").is_err());
    }

    #[test]
    fn test_failure_in() {
        let platform = PlatformDefinition::new("generic", r"#\s?\z")
            .unwrap()
            .with_failure_pattern("Fail!")
            .with_failure_pattern("Available commands:");
        assert_eq!(platform.failure_in("Command: foo\nFail!"), Some("Fail!"));
        assert_eq!(platform.failure_in("Success."), None);
    }
}
