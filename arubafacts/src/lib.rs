//! # arubafacts
//!
//! Async fact collection for Aruba Instant access points over SSH.
//!
//! arubafacts logs into the AP's CLI, runs read-only `show` commands and
//! turns their output into typed records: device identity, configuration,
//! LLDP neighbors and ping results.
//!
//! ## Features
//!
//! - Async SSH connections via russh
//! - Prompt-based command framing with pager handling and timeouts
//! - Line scanners for `show version`, `show summary` and the LLDP dump
//! - Serializable fact records
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arubafacts::{Driver, DriverBuilder, FactsDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), arubafacts::Error> {
//!     let mut driver = DriverBuilder::new("192.168.1.20")
//!         .username("admin")
//!         .password("secret")
//!         .build()?;
//!
//!     driver.open().await?;
//!
//!     let facts = driver.get_facts().await?;
//!     println!("{} ({}) up {}s", facts.hostname, facts.model, facts.uptime);
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod facts;
pub mod parse;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use driver::{ArubaDriver, Driver, DriverBuilder, Response};
pub use error::Error;
pub use facts::{ConfigBundle, ConfigRetrieve, DeviceFacts, FactsDriver};
pub use parse::{LldpNeighbor, LldpNeighbors, PingOutcome};
pub use platform::PlatformDefinition;
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
