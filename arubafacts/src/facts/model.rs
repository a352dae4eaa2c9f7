//! Records returned by the fact getters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DriverError;
use crate::parse::{SummaryFields, VersionFields};

/// Placeholder reported for the startup configuration.
pub const NO_STARTUP: &str = "No Startup";

/// Placeholder reported for the candidate configuration.
pub const NO_CANDIDATE: &str = "No Candidate";

/// Identity and state of one access point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceFacts {
    pub hostname: String,
    pub fqdn: String,
    pub vendor: String,
    pub model: String,
    pub serial_number: String,
    pub os_version: String,
    /// Seconds since boot.
    pub uptime: f64,
}

impl DeviceFacts {
    /// Merge the output of the version and summary scanners.
    pub fn from_parts(version: VersionFields, summary: SummaryFields) -> Self {
        let uptime = version.uptime_seconds();
        Self {
            hostname: summary.hostname,
            fqdn: summary.fqdn,
            vendor: version.vendor,
            model: version.model,
            serial_number: summary.serial_number,
            os_version: version.os_version,
            uptime,
        }
    }
}

/// Device configurations.
///
/// Instant APs have no separate startup or candidate store, so those two
/// always carry fixed placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub running: String,
    pub startup: String,
    pub candidate: String,
}

impl ConfigBundle {
    pub fn new(running: impl Into<String>) -> Self {
        Self {
            running: running.into(),
            startup: NO_STARTUP.to_string(),
            candidate: NO_CANDIDATE.to_string(),
        }
    }
}

impl Default for ConfigBundle {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Which configuration `get_config` should fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigRetrieve {
    #[default]
    All,
    Running,
    Startup,
    Candidate,
}

impl ConfigRetrieve {
    /// Whether the running configuration has to be read from the device.
    pub fn wants_running(self) -> bool {
        matches!(self, ConfigRetrieve::All | ConfigRetrieve::Running)
    }
}

impl FromStr for ConfigRetrieve {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ConfigRetrieve::All),
            "running" => Ok(ConfigRetrieve::Running),
            "startup" => Ok(ConfigRetrieve::Startup),
            "candidate" => Ok(ConfigRetrieve::Candidate),
            other => Err(DriverError::InvalidConfig {
                message: format!("unknown config retrieve '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ConfigRetrieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigRetrieve::All => "all",
            ConfigRetrieve::Running => "running",
            ConfigRetrieve::Startup => "startup",
            ConfigRetrieve::Candidate => "candidate",
        };
        f.write_str(name)
    }
}
