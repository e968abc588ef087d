//! `show switch` key/value facts.

use indexmap::IndexMap;
use serde::Serialize;

use super::uptime::parse_uptime;

/// Label of the uptime line in `show switch`.
pub const UPTIME_KEY: &str = "Device Uptime";

/// Facts reported by `show switch`.
///
/// `entries` keeps every `Label : value` line in device order. The
/// `Device Uptime` line is additionally converted to seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facts {
    pub entries: IndexMap<String, String>,
    pub uptime: Option<u64>,
}

impl Facts {
    /// Look up a raw value by its label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn device_type(&self) -> Option<&str> {
        self.get("Device Type")
    }

    pub fn mac_address(&self) -> Option<&str> {
        self.get("MAC Address")
    }

    pub fn system_name(&self) -> Option<&str> {
        self.get("System Name").filter(|name| !name.is_empty())
    }

    pub fn firmware_version(&self) -> Option<&str> {
        self.get("Firmware Version")
    }
}

/// Parse `show switch` output.
///
/// Each non-empty line is split at its first colon; lines without one are
/// ignored. Later duplicates of a label overwrite earlier ones.
pub fn parse_facts(output: &str) -> Facts {
    let entries: IndexMap<String, String> = output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let uptime = entries
        .get(UPTIME_KEY)
        .filter(|value| !value.is_empty())
        .map(|value| parse_uptime(value));

    Facts { entries, uptime }
}
