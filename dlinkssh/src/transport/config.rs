//! Connection configuration shared by the SSH and Telnet transports.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::DriverError;

/// Which session protocol to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Interactive shell over SSH.
    #[default]
    Ssh,

    /// Line-mode Telnet.
    Telnet,
}

impl TransportKind {
    /// Well-known port for this transport.
    pub fn default_port(self) -> u16 {
        match self {
            TransportKind::Ssh => 22,
            TransportKind::Telnet => 23,
        }
    }

    /// Line terminator appended to every command.
    pub fn line_ending(self) -> &'static str {
        match self {
            TransportKind::Ssh => "\n",
            TransportKind::Telnet => "\r\n",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Ssh => write!(f, "ssh"),
            TransportKind::Telnet => write!(f, "telnet"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ssh" => Ok(TransportKind::Ssh),
            "telnet" => Ok(TransportKind::Telnet),
            other => Err(DriverError::InvalidConfig {
                message: format!("unknown transport '{other}'"),
            }),
        }
    }
}

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys.
    Strict,

    /// Accept and learn unknown keys, but reject changed keys.
    AcceptNew,

    /// Accept all keys without checking. Switches are commonly
    /// re-imaged and regenerate keys, so this is the default.
    #[default]
    Disabled,
}

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Session protocol.
    pub kind: TransportKind,

    /// Connection timeout.
    pub timeout: Duration,

    /// Terminal width for the SSH PTY.
    pub terminal_width: u32,

    /// Terminal height for the SSH PTY.
    pub terminal_height: u32,

    /// Host key verification mode (SSH only).
    pub host_key_verification: HostKeyVerification,

    /// Path to an alternate known_hosts file (SSH only).
    pub known_hosts_path: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication method.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// No authentication.
    None,

    /// Password authentication.
    Password(SecretString),

    /// Private key authentication (SSH only).
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        assert_eq!(TransportKind::Ssh.default_port(), 22);
        assert_eq!(TransportKind::Telnet.default_port(), 23);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("SSH".parse::<TransportKind>().unwrap(), TransportKind::Ssh);
        assert_eq!(
            "telnet".parse::<TransportKind>().unwrap(),
            TransportKind::Telnet
        );
        assert!("serial".parse::<TransportKind>().is_err());
    }

    #[test]
    fn test_deserialize_kind() {
        let kind: TransportKind = serde_json::from_str("\"telnet\"").unwrap();
        assert_eq!(kind, TransportKind::Telnet);
    }
}
