//! LLDP neighbor dump scanner.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Local interface every neighbor record is reported under.
pub const LLDP_INTERFACE: &str = "eth0";

/// A directly attached LLDP neighbor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldpNeighbor {
    pub hostname: String,
    pub port: String,
}

/// Neighbors keyed by local interface name.
pub type LldpNeighbors = IndexMap<String, Vec<LldpNeighbor>>;

/// Scan `show ap debug lldp neighbor interface eth0` output.
///
/// Produces exactly one record under [`LLDP_INTERFACE`], even when the
/// dump lists several neighbors. Unlike the summary scanner, every
/// matching line overwrites the previous value, so the last neighbor in
/// the dump is the one reported.
pub fn parse_lldp_neighbors(text: &str) -> LldpNeighbors {
    let mut neighbor = LldpNeighbor::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.contains("System name:") {
            if let Some(name) = line.split_whitespace().nth(2) {
                neighbor.hostname = name.to_string();
            }
        }
        if line.contains("Interface description:") {
            if let Some(port) = line.split_whitespace().nth(2) {
                neighbor.port = port.trim_end_matches(',').to_string();
            }
        }
    }

    let mut neighbors = LldpNeighbors::new();
    neighbors.insert(LLDP_INTERFACE.to_string(), vec![neighbor]);
    neighbors
}
