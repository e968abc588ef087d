//! # dlinkssh
//!
//! Async driver for D-Link managed switches.
//!
//! dlinkssh logs in to the switch CLI over SSH (via russh) or Telnet, runs
//! `show` commands and parses their output into typed records, behind the
//! vendor-neutral [`NetworkDriver`] contract.
//!
//! ## Features
//!
//! - SSH and Telnet sessions with the same prompt-driven channel
//! - Pager detection, disabled on open and restored on close
//! - Facts, configuration, ARP and MAC address tables
//! - Raw command execution with per-command output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dlinkssh::{DlinkDriver, NetworkDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dlinkssh::Error> {
//!     let mut driver = DlinkDriver::new(
//!         "10.12.16.54",
//!         "admin",
//!         "secret",
//!         std::time::Duration::from_secs(60),
//!         None,
//!     )?;
//!
//!     driver.open().await?;
//!
//!     let facts = driver.get_facts().await?;
//!     println!("{:?} uptime {:?}s", facts.system_name(), facts.uptime);
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod parser;
pub mod platform;
pub mod transport;

pub use driver::{
    ConfigRetrieve, DeviceConfig, DlinkDriver, DriverBuilder, NetworkDriver, OptionalArgs,
    PagingStatus, Response,
};
pub use error::{Error, Result};
pub use parser::{ArpEntry, Facts, MacEntry};
pub use platform::{PlatformDefinition, VendorBehavior};
pub use transport::{AuthMethod, ConnectionConfig, HostKeyVerification, TransportKind};
