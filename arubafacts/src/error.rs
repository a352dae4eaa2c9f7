//! Error types for arubafacts.

use std::time::Duration;

use thiserror::Error;

/// Main error type for arubafacts operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform definition errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// CLI output that does not have the fixed shape we expect
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: russh::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not present in known_hosts (strict mode)
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt detection, stream I/O).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Prompt did not show up in time
    #[error("Prompt not found within {0:?}")]
    PatternTimeout(Duration),

    /// Remote side closed the stream
    #[error("Channel closed")]
    Closed,

    /// Reading from or writing to the stream failed
    #[error("Channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (lifecycle, command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// Device reported a failure for the command
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Platform definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },
}

/// Fixed-format CLI lines that could not be split.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `MODEL` line must hold exactly one comma
    #[error("MODEL line has {commas} commas, expected exactly one: '{line}'")]
    MalformedModelLine { line: String, commas: usize },
}

/// Result type alias using arubafacts' Error.
pub type Result<T> = std::result::Result<T, Error>;
