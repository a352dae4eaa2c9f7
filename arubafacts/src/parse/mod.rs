//! Text extraction from Aruba Instant CLI output.
//!
//! Every scanner works line by line on [`normalize`]d text and is total:
//! a missing line leaves its field at the default (empty string or zero).
//! The only exception is the `MODEL` line, whose fixed comma layout is
//! checked and reported as a [`ParseError`](crate::error::ParseError).

mod lldp;
mod normalize;
mod ping;
mod summary;
mod uptime;
mod version;

pub use lldp::{LLDP_INTERFACE, LldpNeighbor, LldpNeighbors, parse_lldp_neighbors};
pub use normalize::normalize;
pub use ping::{PING_FAILURE_MARKERS, PingOutcome, classify_ping};
pub use summary::{SummaryFields, parse_summary};
pub use uptime::{UptimeParts, to_seconds};
pub use version::{VENDOR, VersionFields, parse_version};

/// Text after the first colon of `line`, if it has one.
fn value_after_colon(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_after_colon() {
        assert_eq!(value_after_colon("Name:AP1"), Some("AP1"));
        assert_eq!(value_after_colon("Name :ap:01"), Some("ap:01"));
        assert_eq!(value_after_colon("Name"), None);
    }
}
