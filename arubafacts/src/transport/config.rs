//! Connection settings for one access point.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::TransportError;

/// What known_hosts says about the key a server presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownHost {
    /// An entry for this host holds the same key.
    Matches,
    /// No entry for this host.
    Absent,
    /// An entry for this host holds a different key.
    Changed { line: usize },
}

/// Outcome of applying a [`HostKeyVerification`] policy to a lookup.
#[derive(Debug)]
pub enum KeyVerdict {
    Accept,
    /// Accept and record the key in known_hosts.
    Learn,
    Reject(TransportError),
}

/// How far to trust the server's host key (OpenSSH `StrictHostKeyChecking`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Only hosts already in known_hosts are accepted.
    Strict,

    /// First contact records the key; a changed key is refused.
    #[default]
    AcceptNew,

    /// No checking at all. Lab use only.
    Disabled,
}

impl HostKeyVerification {
    /// Map the `ssh_strict` flag onto a policy.
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::AcceptNew }
    }

    /// Whether known_hosts has to be consulted at all.
    pub fn needs_lookup(self) -> bool {
        self != Self::Disabled
    }

    /// Decide on a server key given its known_hosts status.
    pub fn verdict(self, host: &str, port: u16, known: KnownHost) -> KeyVerdict {
        match (self, known) {
            (Self::Disabled, _) | (_, KnownHost::Matches) => KeyVerdict::Accept,
            (_, KnownHost::Changed { line }) => KeyVerdict::Reject(TransportError::HostKeyChanged {
                host: host.to_string(),
                port,
                line,
            }),
            (Self::AcceptNew, KnownHost::Absent) => KeyVerdict::Learn,
            (Self::Strict, KnownHost::Absent) => KeyVerdict::Reject(TransportError::HostKeyUnknown {
                host: host.to_string(),
                port,
            }),
        }
    }
}

/// Everything needed to reach and log into one access point.
#[derive(Debug, Clone)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: AuthMethod,

    /// Bounds the TCP connect and handshake, and every command's prompt wait.
    pub timeout: Duration,

    /// PTY columns; wide enough that CLI tables are not wrapped.
    pub terminal_width: u32,

    /// PTY rows.
    pub terminal_height: u32,

    pub host_key_verification: HostKeyVerification,

    /// Alternate known_hosts file; `~/.ssh/known_hosts` when unset.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// `host:port`, for logs and error messages.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credentials offered to the server.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Offer nothing; only useful against lab servers.
    None,

    Password(SecretString),

    /// OpenSSH private key file, optionally encrypted.
    PrivateKey {
        path: PathBuf,
        passphrase: Option<SecretString>,
    },
}

impl AuthMethod {
    /// SSH method name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::None => "none",
            AuthMethod::Password(_) => "password",
            AuthMethod::PrivateKey { .. } => "publickey",
        }
    }
}
