//! Ping output classification.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// Substrings that mark a ping as failed.
///
/// Matching is plain substring search, so broad entries such as
/// `reachable` and `connect` also catch their longer variants.
pub const PING_FAILURE_MARKERS: &[&str] = &[
    "not known",
    "Name or service not known",
    "Error",
    "error",
    "fail",
    "Fail",
    "Destination Host Unreachable",
    "Destination",
    "Unreachable",
    "estination",
    "reachable",
    "connect",
];

/// Output shorter than this cannot hold a ping summary.
const MIN_SUCCESS_LEN: usize = 10;

/// Result of a device-side ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "output", rename_all = "snake_case")]
pub enum PingOutcome {
    /// Output contained a failure marker.
    Unreachable,
    /// No failure marker and enough output to be a real reply.
    Reachable(String),
    /// No failure marker, but too little output to tell.
    Inconclusive(String),
}

impl PingOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }
}

impl fmt::Display for PingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "disconnected"),
            Self::Reachable(output) | Self::Inconclusive(output) => write!(f, "{}", output),
        }
    }
}

/// Classify raw ping output by substring search.
pub fn classify_ping(output: &str) -> PingOutcome {
    if let Some(marker) = PING_FAILURE_MARKERS.iter().find(|m| output.contains(*m)) {
        debug!("ping failure marker: {:?}", marker);
        return PingOutcome::Unreachable;
    }

    if output.len() > MIN_SUCCESS_LEN {
        PingOutcome::Reachable(output.to_string())
    } else {
        PingOutcome::Inconclusive(output.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable() {
        let output = "PING 10.9.9.9\nFrom 10.0.0.1 icmp_seq=1 Destination Host Unreachable\n";
        assert_eq!(classify_ping(output), PingOutcome::Unreachable);
        assert_eq!(classify_ping("Unreachable").to_string(), "disconnected");
    }

    #[test]
    fn test_unknown_host() {
        let output = "ping: bogus.example: Name or service not known";
        assert_eq!(classify_ping(output), PingOutcome::Unreachable);
    }

    #[test]
    fn test_reachable() {
        let output = "PING 10.0.0.1 (10.0.0.1): 56 data bytes\n\
                      64 bytes from 10.0.0.1: seq=0 ttl=64 time=0.512 ms\n\
                      5 packets transmitted, 5 packets received, 0% packet loss\n";
        let outcome = classify_ping(output);
        assert!(outcome.is_reachable());
        assert_eq!(outcome.to_string(), output);
    }

    #[test]
    fn test_short_output_is_inconclusive() {
        assert_eq!(classify_ping("ok"), PingOutcome::Inconclusive("ok".to_string()));
        assert_eq!(classify_ping(""), PingOutcome::Inconclusive(String::new()));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(PingOutcome::Unreachable).unwrap();
        assert_eq!(json, serde_json::json!({"status": "unreachable"}));
    }
}
