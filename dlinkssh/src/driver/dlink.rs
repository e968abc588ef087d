//! D-Link implementation of [`NetworkDriver`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use log::{debug, info, warn};
use secrecy::ExposeSecret;

use super::NetworkDriver;
use super::args::OptionalArgs;
use super::builder::DriverBuilder;
use super::models::{ConfigRetrieve, DeviceConfig, PagingStatus};
use super::response::Response;
use crate::channel::Channel;
use crate::error::{DriverError, Result, TransportError};
use crate::parser::{self, ArpEntry, Facts, MacEntry};
use crate::platform::{DefaultBehavior, PlatformDefinition, VendorBehavior};
use crate::transport::{
    AuthMethod, ConnectionConfig, TelnetStream, TelnetTransport, Transport, TransportKind,
};

const SHOW_SWITCH: &str = "show switch";
const SHOW_RUNNING_CONFIG: &str = "show config current_config";
const SHOW_RUNNING_CONFIG_FALLBACK: &str = "show config active";
const SHOW_SAVED_CONFIG: &str = "show config config_in_nvram";
const SHOW_ARP: &str = "show arpentry";
const SHOW_FDB: &str = "show fdb";

/// Marker present in every configuration dump that `current_config` prints.
const CONFIG_MARKER: &str = "Configuration";

/// Driver for D-Link managed switches.
pub struct DlinkDriver {
    connection: ConnectionConfig,
    platform: PlatformDefinition,
    behavior: Arc<dyn VendorBehavior>,

    /// Open session (None when disconnected).
    channel: Option<Channel>,

    command_timeout: Duration,
    disable_paging: bool,
    paging_status: PagingStatus,
    inline_transfer: bool,
    verbose: bool,
}

impl fmt::Debug for DlinkDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DlinkDriver")
            .field("host", &self.connection.host)
            .field("port", &self.connection.port)
            .field("kind", &self.connection.kind)
            .field("username", &self.connection.username)
            .field("platform", &self.platform.name)
            .field("open", &self.channel.is_some())
            .field("command_timeout", &self.command_timeout)
            .field("paging_status", &self.paging_status)
            .finish_non_exhaustive()
    }
}

impl DlinkDriver {
    /// Create a driver from the usual connection parameters.
    ///
    /// See [`OptionalArgs`] for the accepted options.
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
        optional_args: Option<OptionalArgs>,
    ) -> Result<Self> {
        DriverBuilder::new(hostname)
            .username(username)
            .password(password)
            .timeout(timeout)
            .optional_args(optional_args.unwrap_or_default())
            .build()
    }

    pub(crate) fn from_parts(
        connection: ConnectionConfig,
        platform: PlatformDefinition,
        command_timeout: Duration,
        disable_paging: bool,
        inline_transfer: bool,
        verbose: bool,
    ) -> Self {
        let behavior = platform
            .behavior
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultBehavior));

        Self {
            connection,
            platform,
            behavior,
            channel: None,
            command_timeout,
            disable_paging,
            paging_status: PagingStatus::default(),
            inline_transfer,
            verbose,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.connection.host
    }

    pub fn port(&self) -> u16 {
        self.connection.port
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.connection.kind
    }

    /// Whether file transfers go inline over the CLI session.
    pub fn inline_transfer(&self) -> bool {
        self.inline_transfer
    }

    /// Timeout for a single command to return to the prompt.
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Pager state found when the session was opened.
    pub fn paging_status(&self) -> PagingStatus {
        self.paging_status
    }

    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Whether a session is open.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Open a Telnet session over an existing byte stream, such as a
    /// console-server tunnel, instead of dialing the host.
    pub async fn open_with_stream(&mut self, stream: impl TelnetStream + 'static) -> Result<()> {
        if self.channel.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }
        let transport = Transport::Telnet(TelnetTransport::from_stream(stream));
        self.start_session(transport).await
    }

    /// Run one command and wait for the prompt.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        let channel = self.channel.as_mut().ok_or(DriverError::NotConnected)?;

        let start = Instant::now();
        channel.send_line(command).await?;
        let raw = channel
            .read_until(&self.platform.prompt, self.command_timeout)
            .await?;
        let elapsed = start.elapsed();

        let result = self.behavior.normalize_output(&raw, command);
        let failure = self
            .behavior
            .detect_failure(&result)
            .or_else(|| self.platform.failure_in(&result).map(str::to_string));

        let response = Response::new(command, result, raw, elapsed);
        debug!("{:?} completed in {:?}", command, response.elapsed);

        match failure {
            Some(message) => {
                warn!("{:?} failed on {}: {}", command, self.connection.host, message);
                Ok(response.with_failure(message))
            }
            None => Ok(response),
        }
    }

    async fn start_session(&mut self, transport: Transport) -> Result<()> {
        let mut channel = Channel::new(transport);

        if let Err(e) = Self::login(&self.platform, &self.connection, &mut channel).await {
            let _ = channel.close().await;
            return Err(e);
        }
        self.channel = Some(channel);

        if let Err(e) = self.prepare_terminal().await {
            if let Some(channel) = self.channel.take() {
                let _ = channel.close().await;
            }
            return Err(e);
        }

        if self.verbose {
            info!(
                "connected to {} over {} (paging {:?})",
                self.connection.host, self.connection.kind, self.paging_status
            );
        }
        Ok(())
    }

    /// Log in if the device asks for credentials, then wait for the prompt.
    async fn login(
        platform: &PlatformDefinition,
        connection: &ConnectionConfig,
        channel: &mut Channel,
    ) -> Result<()> {
        let patterns = [
            &platform.prompt,
            &platform.username_prompt,
            &platform.password_prompt,
        ];
        let password = match &connection.auth {
            AuthMethod::Password(password) => password.expose_secret(),
            _ => "",
        };

        let mut sent_username = false;
        let mut sent_password = false;

        loop {
            let (_, index) = channel
                .read_until_any(&patterns, connection.timeout)
                .await?;

            match index {
                0 => return Ok(()),
                // Being asked again means the device rejected us.
                1 if sent_username => break,
                2 if sent_password => break,
                1 => {
                    channel.send_line(&connection.username).await?;
                    sent_username = true;
                }
                _ => {
                    channel.send_hidden_line(password).await?;
                    sent_password = true;
                }
            }
        }

        Err(TransportError::AuthenticationFailed {
            user: connection.username.clone(),
        }
        .into())
    }

    /// Detect the pager and turn it off if requested.
    async fn prepare_terminal(&mut self) -> Result<()> {
        if !self.platform.supports_paging_control() {
            return Ok(());
        }

        self.paging_status = self.probe_paging().await?;
        debug!("paging status on {}: {:?}", self.connection.host, self.paging_status);

        if self.disable_paging && self.paging_status == PagingStatus::Enabled {
            if let Some(command) = self.platform.disable_paging_command.clone() {
                self.send_command(&command).await?;
            }
        }
        Ok(())
    }

    /// Run the probe command and see whether output stops at the pager.
    async fn probe_paging(&mut self) -> Result<PagingStatus> {
        let channel = self.channel.as_mut().ok_or(DriverError::NotConnected)?;
        let platform = &self.platform;

        channel.send_line(&platform.paging_probe_command).await?;
        let (_, index) = channel
            .read_until_any(&[&platform.pager_prompt, &platform.prompt], self.command_timeout)
            .await?;

        if index == 0 {
            channel.write_raw(platform.pager_quit.as_bytes()).await?;
            channel
                .read_until(&platform.prompt, self.command_timeout)
                .await?;
            Ok(PagingStatus::Enabled)
        } else {
            Ok(PagingStatus::Disabled)
        }
    }

    async fn run(&mut self, command: &str) -> Result<String> {
        Ok(self.send_command(command).await?.result)
    }
}

impl NetworkDriver for DlinkDriver {
    async fn open(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        if self.verbose {
            info!(
                "opening {} session to {}",
                self.connection.kind,
                self.connection.socket_addr()
            );
        }

        let transport = Transport::connect(&self.connection).await.map_err(|e| {
            if e.is_unreachable() {
                debug!("connect to {} failed: {}", self.connection.host, e);
                DriverError::CannotConnect {
                    host: self.connection.host.clone(),
                }
                .into()
            } else {
                e
            }
        })?;

        self.start_session(transport).await
    }

    async fn close(&mut self) -> Result<()> {
        if self.channel.is_none() {
            return Ok(());
        }

        if self.disable_paging && self.paging_status == PagingStatus::Enabled {
            if let Some(command) = self.platform.enable_paging_command.clone() {
                if let Err(e) = self.send_command(&command).await {
                    warn!("failed to restore paging on {}: {}", self.connection.host, e);
                }
            }
        }

        if let Some(channel) = self.channel.take() {
            channel.close().await?;
        }

        if self.verbose {
            info!("closed session to {}", self.connection.host);
        }
        Ok(())
    }

    async fn is_alive(&mut self) -> bool {
        let Some(channel) = self.channel.as_mut() else {
            return false;
        };

        match channel.keepalive().await {
            Ok(()) => channel.is_active(),
            Err(e) => {
                debug!("keepalive to {} failed: {}", self.connection.host, e);
                false
            }
        }
    }

    async fn cli(&mut self, commands: &[&str]) -> Result<IndexMap<String, String>> {
        let mut output = IndexMap::with_capacity(commands.len());
        for &command in commands {
            let result = self.run(command).await?;
            output.insert(command.to_string(), result);
        }
        Ok(output)
    }

    async fn get_facts(&mut self) -> Result<Facts> {
        let output = self.run(SHOW_SWITCH).await?;
        Ok(parser::parse_facts(&output))
    }

    async fn get_config(&mut self, retrieve: ConfigRetrieve) -> Result<DeviceConfig> {
        let mut config = DeviceConfig::default();

        if retrieve.includes_running() {
            config.running = self.run(SHOW_RUNNING_CONFIG).await?;
            // Older firmware only knows `show config active`
            if !config.running.contains(CONFIG_MARKER) {
                config.running = self.run(SHOW_RUNNING_CONFIG_FALLBACK).await?;
            }
        }

        if retrieve.includes_candidate() {
            config.candidate = self.run(SHOW_SAVED_CONFIG).await?;
        }

        Ok(config)
    }

    async fn get_arp_table(&mut self) -> Result<Vec<ArpEntry>> {
        let output = self.run(SHOW_ARP).await?;
        Ok(parser::parse_arp_table(&output))
    }

    async fn get_mac_address_table(&mut self) -> Result<Vec<MacEntry>> {
        let output = self.run(SHOW_FDB).await?;
        Ok(parser::parse_mac_table(&output))
    }
}
