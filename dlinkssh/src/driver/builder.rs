//! Builder for creating D-Link drivers.

use std::path::PathBuf;
use std::time::Duration;

use log::warn;
use secrecy::SecretString;

use super::args::OptionalArgs;
use super::dlink::DlinkDriver;
use crate::error::{DriverError, Result};
use crate::platform::{PlatformDefinition, vendors};
use crate::transport::{AuthMethod, ConnectionConfig, HostKeyVerification, TransportKind};

/// Default connect and command timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for constructing a [`DlinkDriver`].
///
/// # Example
///
/// ```rust,no_run
/// use dlinkssh::{DriverBuilder, NetworkDriver, TransportKind};
///
/// # async fn example() -> Result<(), dlinkssh::Error> {
/// let mut driver = DriverBuilder::new("10.12.16.54")
///     .username("admin")
///     .password("secret")
///     .transport(TransportKind::Telnet)
///     .build()?;
///
/// driver.open().await?;
/// let facts = driver.get_facts().await?;
/// driver.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: Option<u16>,
    username: Option<String>,
    auth: AuthMethod,
    kind: TransportKind,
    custom_platform: Option<PlatformDefinition>,
    timeout: Duration,
    delay_factor: f64,
    disable_paging: bool,
    inline_transfer: bool,
    verbose: bool,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            username: None,
            auth: AuthMethod::None,
            kind: TransportKind::Ssh,
            custom_platform: None,
            timeout: DEFAULT_TIMEOUT,
            delay_factor: 1.0,
            disable_paging: true,
            inline_transfer: false,
            verbose: false,
            host_key_verification: HostKeyVerification::Disabled,
            known_hosts_path: None,
        }
    }

    /// Set the port (default: 22 for SSH, 23 for Telnet).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication (SSH only).
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Select SSH or Telnet.
    pub fn transport(mut self, kind: TransportKind) -> Self {
        self.kind = kind;
        self
    }

    /// Use a custom platform definition instead of the built-in D-Link one.
    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.custom_platform = Some(platform);
        self
    }

    /// Set the connect and command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Multiply the command read timeout, for slow devices.
    pub fn delay_factor(mut self, factor: f64) -> Self {
        self.delay_factor = factor;
        self
    }

    /// Whether to turn the pager off for the lifetime of the session
    /// (default: true).
    pub fn disable_paging(mut self, disable: bool) -> Self {
        self.disable_paging = disable;
        self
    }

    /// Set host key verification for SSH.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use an alternate known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Apply a set of optional arguments on top of the current settings.
    pub fn optional_args(mut self, args: OptionalArgs) -> Self {
        if let Some(kind) = args.transport {
            self.kind = kind;
        }
        if let Some(port) = args.port {
            self.port = Some(port);
        }
        if let Some(secs) = args.timeout {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(factor) = args.global_delay_factor {
            self.delay_factor = factor;
        }
        self.inline_transfer = args.inline_transfer;
        self.verbose = args.verbose;

        match (args.use_keys, args.key_file) {
            (true, Some(path)) => self.auth = AuthMethod::PrivateKey {
                path,
                passphrase: None,
            },
            (true, None) => warn!("use_keys is set without key_file; keeping password auth"),
            _ => {}
        }

        self.host_key_verification = if args.ssh_strict {
            HostKeyVerification::Strict
        } else if args.system_host_keys || args.alt_host_keys {
            HostKeyVerification::AcceptNew
        } else {
            HostKeyVerification::Disabled
        };
        if args.alt_host_keys {
            self.known_hosts_path = args.alt_key_file.filter(|p| !p.as_os_str().is_empty());
        }

        if args.ssh_config_file.is_some() {
            warn!("ssh_config_file is not supported and will be ignored");
        }
        if args.allow_agent {
            warn!("allow_agent is not supported and will be ignored");
        }
        self
    }

    /// Build the driver.
    ///
    /// This validates the settings but does not connect. Call `open()` on
    /// the returned driver to establish the session.
    pub fn build(self) -> Result<DlinkDriver> {
        if self.host.trim().is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "Hostname is required".to_string(),
            }
            .into());
        }

        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        if !self.delay_factor.is_finite() || self.delay_factor <= 0.0 {
            return Err(DriverError::InvalidConfig {
                message: format!("delay factor must be positive, got {}", self.delay_factor),
            }
            .into());
        }

        if self.kind == TransportKind::Telnet && matches!(self.auth, AuthMethod::PrivateKey { .. })
        {
            return Err(DriverError::InvalidConfig {
                message: "Telnet does not support key authentication".to_string(),
            }
            .into());
        }

        let command_timeout = if self.delay_factor == 1.0 {
            self.timeout
        } else {
            Duration::try_from_secs_f64(self.timeout.as_secs_f64() * self.delay_factor).map_err(
                |_| DriverError::InvalidConfig {
                    message: format!(
                        "timeout {:?} times delay factor {} is out of range",
                        self.timeout, self.delay_factor
                    ),
                },
            )?
        };

        let platform = self.custom_platform.unwrap_or_else(vendors::dlink::platform);

        let connection = ConnectionConfig {
            host: self.host,
            port: self.port.unwrap_or_else(|| self.kind.default_port()),
            username,
            auth: self.auth,
            kind: self.kind,
            timeout: self.timeout,
            terminal_width: platform.terminal_width,
            terminal_height: platform.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(DlinkDriver::from_parts(
            connection,
            platform,
            command_timeout,
            self.disable_paging,
            self.inline_transfer || self.kind == TransportKind::Telnet,
            self.verbose,
        ))
    }
}
