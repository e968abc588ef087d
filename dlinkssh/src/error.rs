//! Error types for dlinkssh.

use std::io;
use thiserror::Error;

/// Main error type for dlinkssh operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors (SSH or Telnet)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Transport layer errors (connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
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

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not present in known_hosts and strict checking is on
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Write attempted after the session ended
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching, reads).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,
}

/// Driver layer errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// The device could not be reached within the connect timeout
    #[error("Cannot connect to {host}")]
    CannotConnect { host: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unrecognized `get_config` retrieve selector
    #[error("Unknown config retrieve option '{value}'")]
    InvalidRetrieve { value: String },
}

/// Result type alias using dlinkssh's Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means the device was never reached.
    ///
    /// Timeouts and TCP-level failures while connecting qualify;
    /// authentication and host-key failures do not.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Timeout(_))
                | Error::Transport(TransportError::ConnectionFailed { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cannot_connect_message() {
        let err: Error = DriverError::CannotConnect {
            host: "10.0.0.1".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Driver error: Cannot connect to 10.0.0.1");
    }

    #[test]
    fn test_is_unreachable() {
        let timeout: Error = TransportError::Timeout(Duration::from_secs(5)).into();
        assert!(timeout.is_unreachable());

        let refused: Error = TransportError::ConnectionFailed {
            host: "sw1".into(),
            port: 23,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        }
        .into();
        assert!(refused.is_unreachable());

        let auth: Error = TransportError::AuthenticationFailed {
            user: "admin".into(),
        }
        .into();
        assert!(!auth.is_unreachable());
    }
}
