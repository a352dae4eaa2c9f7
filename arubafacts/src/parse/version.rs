//! `show version` scanner.

use serde::{Deserialize, Serialize};

use super::uptime::UptimeParts;
use crate::error::ParseError;

/// Vendor reported for every device; `show version` does not name it.
pub const VENDOR: &str = "Hewlett Packard";

const MODEL_MARKER: &str = "MODEL";
const UPTIME_MARKER: &str = "AP uptime is";

/// Platform fields found in `show version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionFields {
    pub vendor: String,
    pub model: String,
    pub os_version: String,
    pub uptime: Option<UptimeParts>,
}

impl VersionFields {
    /// Uptime in seconds, zero when no usable uptime line was found.
    pub fn uptime_seconds(&self) -> f64 {
        self.uptime.map_or(0.0, |parts| parts.total_seconds())
    }
}

impl Default for VersionFields {
    fn default() -> Self {
        Self {
            vendor: VENDOR.to_string(),
            model: String::new(),
            os_version: String::new(),
            uptime: None,
        }
    }
}

/// Scan `show version` output for model, OS version and uptime.
///
/// The first `MODEL` line is split on its single comma into model and OS
/// version; a different comma count is a [`ParseError`]. The first uptime
/// line with a usable token count sets the uptime.
pub fn parse_version(text: &str) -> Result<VersionFields, ParseError> {
    let mut fields = VersionFields::default();
    let mut model_seen = false;

    for line in text.lines() {
        if line.contains(MODEL_MARKER) && !model_seen {
            let (model, os_version) = split_model_line(line)?;
            fields.model = model.to_string();
            fields.os_version = os_version.trim().to_string();
            model_seen = true;
        }

        if line.contains(UPTIME_MARKER) && fields.uptime.is_none() {
            fields.uptime = parse_uptime_line(line);
        }
    }

    Ok(fields)
}

fn split_model_line(line: &str) -> Result<(&str, &str), ParseError> {
    let commas = line.matches(',').count();
    match line.split_once(',') {
        Some((model, os_version)) if commas == 1 => Ok((model, os_version)),
        _ => Err(ParseError::MalformedModelLine {
            line: line.to_string(),
            commas,
        }),
    }
}

/// Read the numeric tokens of an `AP uptime is ...` line.
///
/// Tokens are taken by position, not by the unit word that follows them:
/// five numbers are weeks, days, hours, minutes, seconds; four numbers
/// are weeks, days, hours, minutes. Any other count, or a number that
/// does not fit in a `u64`, yields `None`.
fn parse_uptime_line(line: &str) -> Option<UptimeParts> {
    let stripped = line.replace(UPTIME_MARKER, "");
    // A digit run too large for u64 voids the line rather than shifting
    // the remaining tokens into the wrong units
    let numbers = stripped
        .split_whitespace()
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .map(|token| token.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match numbers[..] {
        [weeks, days, hours, minutes, seconds] => Some(UptimeParts {
            weeks,
            days,
            hours,
            minutes,
            seconds,
            ..Default::default()
        }),
        [weeks, days, hours, minutes] => Some(UptimeParts {
            weeks,
            days,
            hours,
            minutes,
            ..Default::default()
        }),
        _ => None,
    }
}
