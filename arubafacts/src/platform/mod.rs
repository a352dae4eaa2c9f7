//! Platform definitions for vendor-specific CLI behavior.
//!
//! A platform bundles the prompt and pager patterns, the strings that mark
//! a failed command and the commands run right after login.

mod definition;
pub mod vendors;

pub use definition::PlatformDefinition;

use memchr::memrchr;

/// Remove the echoed command from the front and the prompt line from the end.
pub fn strip_echo_and_prompt(raw: &str, command: &str) -> String {
    let output = raw.trim_start_matches(['\r', '\n']);
    let output = output
        .strip_prefix(command)
        .unwrap_or(output)
        .trim_start_matches(['\r', '\n']);

    // The last line is always the prompt
    match memrchr(b'\n', output.as_bytes()) {
        Some(pos) => output[..pos].trim_end_matches('\r').to_string(),
        None => String::new(),
    }
}
