//! Pattern helpers for prompt detection.

use regex::bytes::Regex;

/// Compile a prompt pattern string into a regex anchored at the end of input.
///
/// A prompt only ends a response when nothing follows it, so patterns
/// without an end anchor get ` ?\z` appended. `$` is not enough here: in
/// multi-line mode it also matches before every `\n` inside the output.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with("\\z") || pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("{} ?\\z", pattern)
    };

    Regex::new(&pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_prompt_pattern_anchors() {
        let pattern = compile_prompt_pattern(r"(?m)^ap505#").unwrap();
        assert!(pattern.is_match(b"output\r\nap505#"));
        assert!(pattern.is_match(b"output\r\nap505# "));
        assert!(!pattern.is_match(b"ap505#\r\nmore output"));
    }

    #[test]
    fn test_compile_prompt_pattern_keeps_anchor() {
        let pattern = compile_prompt_pattern(r"router#$").unwrap();
        assert_eq!(pattern.as_str(), r"router#$");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(compile_prompt_pattern(r"(unclosed").is_err());
    }
}
