//! Builder for creating device drivers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use secrecy::SecretString;

use super::aruba::ArubaDriver;
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::platform::vendors::aruba_instant;
use crate::transport::config::{AuthMethod, HostKeyVerification, SshConfig};

/// Default SSH port.
const SSH_PORT: u16 = 22;

/// Private keys tried, in order, when `use_keys` is set without a key file.
const DEFAULT_KEY_FILES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use arubafacts::driver::DriverBuilder;
///
/// # fn example() -> Result<(), arubafacts::Error> {
/// let driver = DriverBuilder::new("192.168.1.10")
///     .username("admin")
///     .password("secret")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    key_file: Option<PathBuf>,
    key_passphrase: Option<SecretString>,
    use_keys: bool,
    transport: String,
    platform: Option<PlatformDefinition>,
    timeout: Duration,
    terminal_size: Option<(u32, u32)>,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: SSH_PORT,
            username: None,
            password: None,
            key_file: None,
            key_passphrase: None,
            use_keys: false,
            transport: "ssh".to_string(),
            platform: None,
            timeout: Duration::from_secs(60),
            terminal_size: None,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.key_file = Some(key_path.into());
        self.use_keys = true;
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.key_passphrase = Some(SecretString::from(passphrase.into()));
        self.private_key(key_path)
    }

    /// Prefer key authentication, falling back to `~/.ssh` default keys
    /// when no key file is given.
    pub fn use_keys(mut self, use_keys: bool) -> Self {
        self.use_keys = use_keys;
        self
    }

    /// Use a custom platform definition instead of Aruba Instant.
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the connection and per-command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set terminal dimensions (default: the platform's).
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_size = Some((width, height));
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Apply a string-keyed option map as passed by automation frameworks.
    ///
    /// Recognized keys: `port`, `transport`, `use_keys`, `key_file`,
    /// `ssh_strict`, `known_hosts_file`. Unknown keys and unparsable
    /// values are logged and skipped.
    pub fn optional_args(mut self, args: &HashMap<String, String>) -> Self {
        for (key, value) in args {
            match key.as_str() {
                "port" => match value.parse() {
                    Ok(port) => self.port = port,
                    Err(_) => warn!("ignoring invalid port '{}'", value),
                },
                "transport" => self.transport = value.to_lowercase(),
                "use_keys" => match parse_flag(value) {
                    Some(flag) => self.use_keys = flag,
                    None => warn!("ignoring invalid use_keys '{}'", value),
                },
                "key_file" => self.key_file = Some(PathBuf::from(value)),
                "ssh_strict" => match parse_flag(value) {
                    Some(strict) => {
                        self.host_key_verification = HostKeyVerification::from_strict(strict)
                    }
                    None => warn!("ignoring invalid ssh_strict '{}'", value),
                },
                "known_hosts_file" => self.known_hosts_path = Some(PathBuf::from(value)),
                _ => debug!("ignoring unsupported optional arg '{}'", key),
            }
        }
        self
    }

    fn resolve_auth(&mut self) -> AuthMethod {
        if self.use_keys {
            let key = self.key_file.take().or_else(default_key_file);
            if let Some(path) = key {
                return AuthMethod::PrivateKey {
                    path,
                    passphrase: self.key_passphrase.take(),
                };
            }
            warn!("use_keys set but no private key found, falling back to password");
        }

        match self.password.take() {
            Some(password) => AuthMethod::Password(password),
            None => AuthMethod::None,
        }
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(mut self) -> Result<ArubaDriver> {
        let username = self.username.take().ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        if self.transport != "ssh" {
            return Err(DriverError::InvalidConfig {
                message: format!("unsupported transport '{}'", self.transport),
            }
            .into());
        }

        let auth = self.resolve_auth();
        let platform = self.platform.take().unwrap_or_else(aruba_instant::platform);
        let (terminal_width, terminal_height) = self
            .terminal_size
            .unwrap_or((platform.terminal_width, platform.terminal_height));

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth,
            timeout: self.timeout,
            terminal_width,
            terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        ArubaDriver::new(ssh_config, platform)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn default_key_file() -> Option<PathBuf> {
    let ssh_dir = PathBuf::from(std::env::var_os("HOME")?).join(".ssh");
    DEFAULT_KEY_FILES
        .iter()
        .map(|name| ssh_dir.join(name))
        .find(|path| path.is_file())
}
