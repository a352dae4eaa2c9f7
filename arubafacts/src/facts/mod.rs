//! Device fact getters for Aruba Instant access points.
//!
//! Every getter is a short command exchange followed by one of the
//! scanners in [`crate::parse`]. They are available on any [`Driver`]
//! through the [`FactsDriver`] extension trait.
//!
//! ```rust,no_run
//! use arubafacts::{Driver, DriverBuilder, FactsDriver};
//!
//! # async fn example() -> Result<(), arubafacts::Error> {
//! let mut driver = DriverBuilder::new("10.0.0.5")
//!     .username("admin")
//!     .password("secret")
//!     .build()?;
//!
//! driver.open().await?;
//! let facts = driver.get_facts().await?;
//! println!("{} runs {}", facts.hostname, facts.os_version);
//! driver.close().await?;
//! # Ok(())
//! # }
//! ```

mod model;

pub use model::{ConfigBundle, ConfigRetrieve, DeviceFacts, NO_CANDIDATE, NO_STARTUP};

use std::future::Future;

use log::debug;

use crate::driver::{Driver, Response};
use crate::error::{DriverError, Result};
use crate::parse::{
    LLDP_INTERFACE, LldpNeighbors, PingOutcome, classify_ping, parse_lldp_neighbors,
    parse_summary, parse_version,
};

pub const SHOW_VERSION: &str = "show version";
pub const SHOW_SUMMARY: &str = "show summary";
pub const SHOW_RUNNING_CONFIG: &str = "show running-config";
pub const SHOW_LLDP_NEIGHBORS: &str = "show ap debug lldp neighbor interface eth0";

/// Fact getters, implemented for every [`Driver`].
pub trait FactsDriver: Driver {
    /// Hostname, FQDN, model, serial, OS version and uptime.
    fn get_facts(&mut self) -> impl Future<Output = Result<DeviceFacts>> + Send;

    /// Running configuration plus the fixed startup/candidate placeholders.
    ///
    /// `full` and `sanitized` are accepted for interface compatibility and
    /// have no effect.
    fn get_config(
        &mut self,
        retrieve: ConfigRetrieve,
        full: bool,
        sanitized: bool,
    ) -> impl Future<Output = Result<ConfigBundle>> + Send;

    /// Ping the driver's own target host from the device.
    fn get_ping(&mut self) -> impl Future<Output = Result<PingOutcome>> + Send;

    /// Ping `target` from the device.
    fn ping(&mut self, target: &str) -> impl Future<Output = Result<PingOutcome>> + Send;

    /// The LLDP neighbor on the uplink.
    fn get_lldp_neighbors(&mut self) -> impl Future<Output = Result<LldpNeighbors>> + Send;

    /// Same as [`get_lldp_neighbors`](Self::get_lldp_neighbors), restricted
    /// to `interface`. Only `eth0` carries neighbors; anything else yields
    /// an empty map without touching the device.
    fn get_lldp_neighbors_detail(
        &mut self,
        interface: &str,
    ) -> impl Future<Output = Result<LldpNeighbors>> + Send;
}

impl<D: Driver> FactsDriver for D {
    fn get_facts(&mut self) -> impl Future<Output = Result<DeviceFacts>> + Send {
        collect_facts(self)
    }

    fn get_config(
        &mut self,
        retrieve: ConfigRetrieve,
        _full: bool,
        _sanitized: bool,
    ) -> impl Future<Output = Result<ConfigBundle>> + Send {
        collect_config(self, retrieve)
    }

    fn get_ping(&mut self) -> impl Future<Output = Result<PingOutcome>> + Send {
        async move {
            let host = self.host().to_string();
            ping(self, &host).await
        }
    }

    fn ping(&mut self, target: &str) -> impl Future<Output = Result<PingOutcome>> + Send {
        ping(self, target)
    }

    fn get_lldp_neighbors(&mut self) -> impl Future<Output = Result<LldpNeighbors>> + Send {
        collect_lldp_neighbors(self)
    }

    fn get_lldp_neighbors_detail(
        &mut self,
        interface: &str,
    ) -> impl Future<Output = Result<LldpNeighbors>> + Send {
        async move {
            if interface != LLDP_INTERFACE {
                debug!("no LLDP data for interface {}", interface);
                return Ok(LldpNeighbors::new());
            }
            collect_lldp_neighbors(self).await
        }
    }
}

/// Send `command`, requiring a connected driver and a clean response.
async fn run_checked<D: Driver>(driver: &mut D, command: &str) -> Result<Response> {
    let response = driver
        .send_command(command)
        .await?
        .ok_or(DriverError::NotConnected)?;

    if let Some(message) = &response.failure_message {
        return Err(DriverError::CommandFailed {
            command: command.to_string(),
            message: message.clone(),
        }
        .into());
    }

    Ok(response)
}

/// Run `show version` and `show summary` and merge what they report.
pub async fn collect_facts<D: Driver>(driver: &mut D) -> Result<DeviceFacts> {
    let version = run_checked(driver, SHOW_VERSION).await?;
    let summary = run_checked(driver, SHOW_SUMMARY).await?;

    let version = parse_version(&version.normalized())?;
    let summary = parse_summary(&summary.normalized());

    Ok(DeviceFacts::from_parts(version, summary))
}

/// Read the configurations selected by `retrieve`.
pub async fn collect_config<D: Driver>(
    driver: &mut D,
    retrieve: ConfigRetrieve,
) -> Result<ConfigBundle> {
    if !retrieve.wants_running() {
        return Ok(ConfigBundle::default());
    }

    let running = run_checked(driver, SHOW_RUNNING_CONFIG).await?;
    Ok(ConfigBundle::new(running.normalized()))
}

/// Ping `target` from the device and classify the output.
///
/// Platform failure strings are not checked here; the ping classifier has
/// its own failure markers.
pub async fn ping<D: Driver>(driver: &mut D, target: &str) -> Result<PingOutcome> {
    let command = format!("ping {}", target);
    let response = driver
        .send_command(&command)
        .await?
        .ok_or(DriverError::NotConnected)?;

    Ok(classify_ping(&response.result))
}

/// Read and parse the LLDP neighbor dump for the uplink.
pub async fn collect_lldp_neighbors<D: Driver>(driver: &mut D) -> Result<LldpNeighbors> {
    let response = run_checked(driver, SHOW_LLDP_NEIGHBORS).await?;
    Ok(parse_lldp_neighbors(&response.normalized()))
}
