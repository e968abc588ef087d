//! The network driver contract and its D-Link implementation.
//!
//! [`NetworkDriver`] is the fixed, vendor-neutral surface automation
//! frameworks program against. [`DlinkDriver`] implements it by running
//! D-Link CLI commands and scraping their output.

mod args;
mod builder;
mod dlink;
mod models;
mod response;

#[cfg(test)]
mod fake_switch;

pub use args::OptionalArgs;
pub use builder::{DEFAULT_TIMEOUT, DriverBuilder};
pub use dlink::DlinkDriver;
pub use models::{ConfigRetrieve, DeviceConfig, PagingStatus};
pub use response::Response;

use std::future::Future;

use indexmap::IndexMap;

use crate::error::Result;
use crate::parser::{ArpEntry, Facts, MacEntry};

/// Vendor-neutral driver contract.
pub trait NetworkDriver: Send {
    /// Open the session to the device.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the session, restoring any terminal settings changed by `open`.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Probe the session with a transport-level no-op.
    ///
    /// Returns `false` when no session is open or the probe cannot be sent.
    fn is_alive(&mut self) -> impl Future<Output = bool> + Send;

    /// Run each command and map it to its output.
    ///
    /// ```rust,no_run
    /// use dlinkssh::NetworkDriver;
    ///
    /// # async fn example(driver: &mut impl NetworkDriver) -> Result<(), dlinkssh::Error> {
    /// let output = driver.cli(&["show vlan", "show ports"]).await?;
    /// println!("{}", output["show vlan"]);
    /// # Ok(())
    /// # }
    /// ```
    fn cli(
        &mut self,
        commands: &[&str],
    ) -> impl Future<Output = Result<IndexMap<String, String>>> + Send;

    /// Basic device facts.
    fn get_facts(&mut self) -> impl Future<Output = Result<Facts>> + Send;

    /// Configuration texts.
    fn get_config(
        &mut self,
        retrieve: ConfigRetrieve,
    ) -> impl Future<Output = Result<DeviceConfig>> + Send;

    /// The ARP table.
    fn get_arp_table(&mut self) -> impl Future<Output = Result<Vec<ArpEntry>>> + Send;

    /// The MAC address (forwarding database) table.
    fn get_mac_address_table(&mut self) -> impl Future<Output = Result<Vec<MacEntry>>> + Send;
}
