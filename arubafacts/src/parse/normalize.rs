//! Blank-line removal.

/// Drop every line that is empty after trimming.
///
/// Lines may end in `\n` or `\r\n`; each retained line is re-terminated
/// with a single `\n`. The function is idempotent.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for line in raw.lines().filter(|line| !line.trim().is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_blank_lines() {
        let raw = "first\r\n\r\n   \r\nsecond\n\t\nthird";
        assert_eq!(normalize(raw), "first\nsecond\nthird\n");
    }

    #[test]
    fn test_preserves_indentation() {
        assert_eq!(normalize("  indented\n\nx"), "  indented\nx\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\r\n\n  \n"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "a",
            "a\n\nb\r\n",
            "\n\n  x  \r\n\ty\n\n",
            "Name:AP1\r\n\r\nSerial Number:CN123\r\n",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }
}
