//! Optional connection arguments.
//!
//! Automation frameworks usually pass driver options as a loose key/value
//! map. [`OptionalArgs`] accepts that map through serde: every key is
//! optional and unknown keys are ignored.

use std::path::PathBuf;

use serde::Deserialize;

use crate::transport::TransportKind;

/// Optional arguments accepted by [`DlinkDriver::new`](super::DlinkDriver::new)
/// and [`DriverBuilder::optional_args`](super::DriverBuilder::optional_args).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptionalArgs {
    /// `ssh` (default) or `telnet`.
    pub transport: Option<TransportKind>,

    /// Overrides the transport's default port.
    pub port: Option<u16>,

    /// File transfers happen inline over the CLI session. Always on for Telnet.
    pub inline_transfer: bool,

    /// Connect and command timeout in seconds.
    pub timeout: Option<u64>,

    /// Log the connection lifecycle at `info` level.
    pub verbose: bool,

    /// Multiplier applied to the command read timeout.
    pub global_delay_factor: Option<f64>,

    /// Authenticate with `key_file` instead of the password.
    pub use_keys: bool,
    pub key_file: Option<PathBuf>,

    /// Reject unknown and changed host keys.
    pub ssh_strict: bool,

    /// Check host keys against the user's known_hosts.
    pub system_host_keys: bool,

    /// Check host keys against `alt_key_file`.
    pub alt_host_keys: bool,
    pub alt_key_file: Option<PathBuf>,

    /// Not supported; a warning is logged when set.
    pub ssh_config_file: Option<PathBuf>,

    /// Not supported; a warning is logged when set.
    pub allow_agent: bool,
}
