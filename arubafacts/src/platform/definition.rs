//! Platform definition for vendor-specific configurations.

use regex::bytes::Regex;

use crate::channel::compile_prompt_pattern;
use crate::error::{Error, PlatformError, Result};

/// Platform definition containing all vendor-specific configuration.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "aruba_instant").
    pub name: String,

    /// Regex matching the CLI prompt at the end of a response.
    pub prompt_pattern: String,

    /// Regex matching a pager marker that waits for a keypress.
    pub pager_pattern: Option<String>,

    /// Patterns that indicate command failure.
    pub failed_when_contains: Vec<String>,

    /// Commands to run when connection is established.
    pub on_open_commands: Vec<String>,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a new platform definition with a generic `#`/`>` prompt.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt_pattern: r"(?m)^\S{1,63}[#>]".to_string(),
            pager_pattern: None,
            failed_when_contains: vec![],
            on_open_commands: vec![],
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Set the prompt pattern.
    pub fn with_prompt(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = pattern.into();
        self
    }

    /// Set the pager pattern.
    pub fn with_pager(mut self, pattern: impl Into<String>) -> Self {
        self.pager_pattern = Some(pattern.into());
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Compile the prompt pattern, anchored at the end of input.
    pub fn compile_prompt(&self) -> Result<Regex> {
        compile_prompt_pattern(&self.prompt_pattern).map_err(|e| {
            Error::from(PlatformError::InvalidDefinition {
                message: format!("{}: bad prompt pattern: {}", self.name, e),
            })
        })
    }

    /// Compile the pager pattern, if any.
    pub fn compile_pager(&self) -> Result<Option<Regex>> {
        self.pager_pattern
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    Error::from(PlatformError::InvalidDefinition {
                        message: format!("{}: bad pager pattern: {}", self.name, e),
                    })
                })
            })
            .transpose()
    }

    /// First failure pattern contained in `output`.
    pub fn failure_in(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_compiles() {
        let prompt = PlatformDefinition::new("generic").compile_prompt().unwrap();
        assert!(prompt.is_match(b"output\r\nswitch# "));
        assert!(prompt.is_match(b"switch>"));
    }

    #[test]
    fn test_invalid_prompt_is_platform_error() {
        let err = PlatformDefinition::new("broken")
            .with_prompt("(")
            .compile_prompt()
            .unwrap_err();
        assert!(matches!(err, Error::Platform(PlatformError::InvalidDefinition { .. })));
    }

    #[test]
    fn test_pager_optional() {
        let platform = PlatformDefinition::new("generic");
        assert!(platform.compile_pager().unwrap().is_none());
        let platform = platform.with_pager("--More--");
        assert!(platform.compile_pager().unwrap().is_some());
    }

    #[test]
    fn test_failure_in() {
        let platform = PlatformDefinition::new("generic").with_failure_pattern("Invalid input");
        assert_eq!(
            platform.failure_in("% Invalid input detected at '^' marker."),
            Some("Invalid input")
        );
        assert_eq!(platform.failure_in("all good"), None);
    }
}
