//! Collect facts and tables from a D-Link switch.
//!
//! # Usage
//!
//! Over SSH:
//! ```bash
//! cargo run --example dlink_facts -- --host 10.12.16.54 --user admin --password secret
//! ```
//!
//! Over Telnet:
//! ```bash
//! cargo run --example dlink_facts -- --host 10.12.16.54 --user admin --password secret --telnet
//! ```
//!
//! The password may also come from `DLINK_PASSWORD`.

use std::env;
use std::time::Duration;

use dlinkssh::{ConfigRetrieve, DriverBuilder, NetworkDriver, TransportKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug for the session transcript
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = DriverBuilder::new(&args.host)
        .username(&args.user)
        .password(&args.password)
        .transport(args.kind)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    let mut driver = builder.build()?;

    println!("Connecting to {}:{} over {}...", driver.hostname(), driver.port(), args.kind);
    driver.open().await?;
    println!("Pager was {:?} at login", driver.paging_status());

    let facts = driver.get_facts().await?;
    println!("\n== Facts ==");
    for (key, value) in &facts.entries {
        println!("{key:<20} {value}");
    }
    if let Some(uptime) = facts.uptime {
        println!("{:<20} {uptime}", "Uptime (seconds)");
    }

    println!("\n== ARP table ==");
    for entry in driver.get_arp_table().await? {
        println!(
            "{:<12} {:<16} {:<18} {}",
            entry.interface, entry.ip, entry.mac, entry.entry_type
        );
    }

    println!("\n== MAC address table ==");
    for entry in driver.get_mac_address_table().await? {
        println!(
            "{:<5} {:<16} {:<18} {:<6} {:<9} {}",
            entry.vid, entry.vlan_name, entry.mac, entry.port, entry.entry_type, entry.status
        );
    }

    if args.config {
        let config = driver.get_config(ConfigRetrieve::Running).await?;
        println!("\n== Running configuration ==\n{}", config.running);
    }

    driver.close().await?;
    println!("\nDone!");
    Ok(())
}

struct Args {
    host: String,
    port: Option<u16>,
    user: String,
    password: String,
    kind: TransportKind,
    timeout: u64,
    config: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = env::args().skip(1);
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: None,
            user: "admin".to_string(),
            password: env::var("DLINK_PASSWORD").unwrap_or_default(),
            kind: TransportKind::Ssh,
            timeout: 60,
            config: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" | "-h" => parsed.host = args.next().unwrap_or(parsed.host),
                "--port" | "-p" => parsed.port = args.next().and_then(|p| p.parse().ok()),
                "--user" | "-u" => parsed.user = args.next().unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = args.next().unwrap_or_default(),
                "--timeout" | "-t" => {
                    parsed.timeout = args.next().and_then(|t| t.parse().ok()).unwrap_or(60)
                }
                "--telnet" => parsed.kind = TransportKind::Telnet,
                "--config" => parsed.config = true,
                "--help" => {
                    println!(
                        "usage: dlink_facts --host <HOST> [--port <PORT>] --user <USER> \
                         --password <PASS> [--telnet] [--config] [--timeout <SECS>]"
                    );
                    std::process::exit(0);
                }
                other => eprintln!("Unknown argument: {other}"),
            }
        }
        parsed
    }
}
