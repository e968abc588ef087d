//! Row-per-line table parsers (`show arpentry`, `show fdb`).

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};
use serde::Serialize;

static ARP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<interface>^\w+)\s+",
        r"(?P<ip>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})\s+",
        r"(?P<mac>([0-9A-F]{2}[:-]){5}([0-9A-F]{2}))\s+",
        r"(?P<type>(\w+(/\w+)*))",
    ))
    .unwrap()
});

// Stacked units print ports as `unit:port`.
static FDB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<vid>\d+)\s+",
        r"(?P<vlan_name>\w+)\s+",
        r"(?P<mac>([0-9A-F]{2}[:-]){5}([0-9A-F]{2}))\s+",
        r"(?P<port>\d+(:\d+)?)\s+",
        r"(?P<type>\w+)\s+",
        r"(?P<status>\w+)(\s+|$)",
    ))
    .unwrap()
});

/// One row of `show arpentry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArpEntry {
    /// IP interface name, e.g. `System`.
    pub interface: String,
    pub ip: Ipv4Addr,
    /// MAC address as printed by the switch (`00-1F-9D-48-72-51`).
    pub mac: String,
    /// Entry type, e.g. `Dynamic`, `Static`, `Local/Broadcast`.
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// One row of `show fdb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacEntry {
    pub vid: u16,
    pub vlan_name: String,
    pub mac: String,
    pub port: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub status: String,
}

/// Apply `re` to every line of `output` and build a row from each match.
///
/// Lines that do not match, or for which `build` returns `None`, are skipped.
pub fn parse_rows<T>(
    output: &str,
    re: &Regex,
    build: impl Fn(&Captures<'_>) -> Option<T>,
) -> Vec<T> {
    output
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let row = build(&caps);
            if row.is_none() {
                debug!("parser: discarding malformed row {:?}", line);
            }
            row
        })
        .collect()
}

/// Parse the output of `show arpentry`.
pub fn parse_arp_table(output: &str) -> Vec<ArpEntry> {
    parse_rows(output, &ARP_RE, |caps| {
        Some(ArpEntry {
            interface: caps["interface"].to_string(),
            ip: caps["ip"].parse().ok()?,
            mac: caps["mac"].to_string(),
            entry_type: caps["type"].to_string(),
        })
    })
}

/// Parse the output of `show fdb`.
pub fn parse_mac_table(output: &str) -> Vec<MacEntry> {
    parse_rows(output, &FDB_RE, |caps| {
        Some(MacEntry {
            vid: caps["vid"].parse().ok()?,
            vlan_name: caps["vlan_name"].to_string(),
            mac: caps["mac"].to_string(),
            port: caps["port"].to_string(),
            entry_type: caps["type"].to_string(),
            status: caps["status"].to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARP_OUTPUT: &str = "\
ARP Aging Time : 20

Interface   IP Address       MAC Address        Type
----------- ---------------  -----------------  ---------------
System      10.12.16.0       FF-FF-FF-FF-FF-FF  Local/Broadcast
System      10.12.16.1       00-1F-9D-48-72-51  Dynamic
System      10.12.16.54      00-21-91-A1-2B-3C  Local
System      10.12.16.255     FF-FF-FF-FF-FF-FF  Local/Broadcast

Total Entries: 4";

    const FDB_OUTPUT: &str = "\
Unicast MAC Address Aging Time  = 300

VID  VLAN Name                        MAC Address       Port  Type     Status
---- -------------------------------- ----------------- ----- -------- --------
1    default                          00-0F-E2-21-35-20 9     Dynamic  Forward
1    default                          00-0F-E2-21-35-2A 9     Dynamic  Forward \r
100  mgmt                             00-1D-E5-48-34-81 1:24  Static   Forward

Total Entries: 3";

    #[test]
    fn test_parse_arp_table() {
        let rows = parse_arp_table(ARP_OUTPUT);
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[1],
            ArpEntry {
                interface: "System".into(),
                ip: Ipv4Addr::new(10, 12, 16, 1),
                mac: "00-1F-9D-48-72-51".into(),
                entry_type: "Dynamic".into(),
            }
        );
        assert_eq!(rows[0].entry_type, "Local/Broadcast");
    }

    #[test]
    fn test_arp_skips_invalid_ip() {
        let rows = parse_arp_table("System      999.1.1.1   00-1F-9D-48-72-51  Dynamic");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_mac_table() {
        let rows = parse_mac_table(FDB_OUTPUT);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            MacEntry {
                vid: 1,
                vlan_name: "default".into(),
                mac: "00-0F-E2-21-35-20".into(),
                port: "9".into(),
                entry_type: "Dynamic".into(),
                status: "Forward".into(),
            }
        );
        assert_eq!(rows[1].mac, "00-0F-E2-21-35-2A");
        assert_eq!(rows[2].vid, 100);
        assert_eq!(rows[2].port, "1:24");
        assert_eq!(rows[2].entry_type, "Static");
    }

    #[test]
    fn test_empty_tables() {
        assert!(parse_arp_table("").is_empty());
        assert!(parse_mac_table("Total Entries: 0").is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = MacEntry {
            vid: 1,
            vlan_name: "default".into(),
            mac: "00-0F-E2-21-35-20".into(),
            port: "9".into(),
            entry_type: "Dynamic".into(),
            status: "Forward".into(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "Dynamic");
        assert_eq!(value["vid"], 1);

        let arp = parse_arp_table("System 10.0.0.1 00-1F-9D-48-72-51 Dynamic");
        let value = serde_json::to_value(&arp[0]).unwrap();
        assert_eq!(value["ip"], "10.0.0.1");
    }
}
