//! Parsers for D-Link CLI output.
//!
//! The switch only ever answers in plain text, so every getter runs one
//! command and scrapes its output line by line with a regular expression.

mod facts;
mod table;
mod uptime;

pub use facts::{Facts, UPTIME_KEY, parse_facts};
pub use table::{ArpEntry, MacEntry, parse_arp_table, parse_mac_table, parse_rows};
pub use uptime::parse_uptime;
