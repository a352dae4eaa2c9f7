//! High-level driver for device interaction.
//!
//! The driver layer owns the connection lifecycle and turns single
//! command exchanges into [`Response`] values.

mod aruba;
mod builder;
pub(crate) mod response;

pub use aruba::ArubaDriver;
pub use builder::DriverBuilder;
pub use response::Response;

use std::future::Future;

use crate::error::Result;

/// Trait for device drivers.
///
/// Commands on one driver run strictly one after another: every command
/// method takes `&mut self` and completes only once the device prompt has
/// come back.
pub trait Driver: Send {
    /// Open the connection to the device.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and wait for the prompt.
    ///
    /// Returns `Ok(None)` when the driver is not connected or `command` is
    /// empty; nothing is sent in either case.
    fn send_command(
        &mut self,
        command: &str,
    ) -> impl Future<Output = Result<Option<Response>>> + Send;

    /// Send multiple commands sequentially.
    fn send_commands(
        &mut self,
        commands: &[&str],
    ) -> impl Future<Output = Result<Vec<Option<Response>>>> + Send {
        async move {
            let mut responses = Vec::with_capacity(commands.len());
            for cmd in commands {
                responses.push(self.send_command(cmd).await?);
            }
            Ok(responses)
        }
    }

    /// Check if the driver is connected.
    fn is_open(&self) -> bool;

    /// Check if the session still carries traffic.
    ///
    /// Writes a single NUL byte to the shell and then asks the SSH layer
    /// whether the session is still running. Returns `false` when not
    /// connected or when either check fails; never returns an error.
    ///
    /// ```rust,no_run
    /// # use arubafacts::driver::Driver;
    /// # async fn example(driver: &mut impl Driver) -> Result<(), arubafacts::Error> {
    /// if !driver.is_alive().await {
    ///     driver.close().await.ok();
    ///     driver.open().await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn is_alive(&mut self) -> impl Future<Output = bool> + Send;

    /// The host this driver talks to.
    fn host(&self) -> &str;
}
