//! Aruba Instant (IAP) platform definition.
//!
//! Covers Instant access points such as the AP-505 running ArubaOS 8.x.
//! The CLI has a single operational mode reached directly after login.
//!
//! # Prompt Examples
//!
//! ```text
//! ap505#                       # named AP
//! 18:64:72:c6:3a:2c#           # factory default, MAC as name
//! ap505 (config) #             # configuration mode
//! ```

use crate::platform::PlatformDefinition;

/// Platform name for Aruba Instant.
pub const PLATFORM_NAME: &str = "aruba_instant";

/// Create the Aruba Instant platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME)
        .with_prompt(r"(?m)^[\w.\-@()/:]{1,63}(?: \([\w\-]+\) )?[#>]")
        .with_pager(r"--More--")
        .with_failure_pattern("Invalid input")
        .with_failure_pattern("Incomplete command")
        .with_failure_pattern("Ambiguous command")
        .with_failure_pattern("Parse error")
        .with_on_open_command("no paging")
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aruba_platform() {
        let p = platform();
        assert_eq!(p.name, "aruba_instant");
        assert_eq!(p.on_open_commands, vec!["no paging".to_string()]);
        assert_eq!(p.terminal_width, 511);
    }

    #[test]
    fn test_prompt_match() {
        let prompt = platform().compile_prompt().unwrap();

        assert!(prompt.is_match(b"ap505#"));
        assert!(prompt.is_match(b"ap505# "));
        assert!(prompt.is_match(b"18:64:72:c6:3a:2c#"));
        assert!(prompt.is_match(b"AP-Lobby.corp# "));
        assert!(prompt.is_match(b"ap505 (config) # "));
        assert!(prompt.is_match(b"show version\r\nMODEL,IAP-505\r\nap505# "));
    }

    #[test]
    fn test_prompt_not_matched_mid_output() {
        let prompt = platform().compile_prompt().unwrap();

        // Prompt followed by more output is not the end of the response
        assert!(!prompt.is_match(b"ap505#\r\nstill going"));
        assert!(!prompt.is_match(b"AP uptime is 1 2 3 4"));
        assert!(!prompt.is_match(b"--More--"));
    }

    #[test]
    fn test_failure_patterns() {
        let p = platform();
        assert_eq!(
            p.failure_in("          ^\r\n% Invalid input detected at '^' marker."),
            Some("Invalid input")
        );
        assert!(p.failure_in("Name:ap505").is_none());
    }

    #[test]
    fn test_pager() {
        let pager = platform().compile_pager().unwrap().unwrap();
        assert!(pager.is_match(b"ip access-list\r\n--More--"));
    }
}
