//! In-memory D-Link switch speaking Telnet, for driver tests.

use std::io;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use crate::transport::telnet::{DONT, IAC, OPT_ECHO, OPT_SGA, WILL};

const PROMPT: &str = "DES-3200-28:admin#";
const PAGER: &str = "CTRL+C ESC q Quit SPACE n Next Page ENTER Next Entry a All";

const SHOW_SWITCH: &str = "\
Device Type        : DES-3200-28 Fast Ethernet Switch\r
MAC Address        : 00-26-5A-12-34-56\r
IP Address         : 10.12.16.54 (Manual)\r
Firmware Version   : Build 1.85.B008\r
System Name        : lab-sw\r
Device Uptime      : 2 days 3 hours 4 minutes 5 seconds\r
System Time        : 02/05/2024 11:22:33";

const CURRENT_CONFIG: &str = "\
#-------------------------------------------------------------------\r
#                       DES-3200-28 Configuration\r
#-------------------------------------------------------------------\r
\r
# BASIC\r
config serial_port baud_rate 115200 auto_logout 10_minutes";

const ACTIVE_CONFIG: &str = "\
# DES-3200-28 Configuration (active)\r
active body";

const NVRAM_CONFIG: &str = "\
# DES-3200-28 Configuration (NVRAM)\r
config_in_nvram body";

const ARP_TABLE: &str = "\
ARP Aging Time : 20\r
\r
Interface   IP Address       MAC Address        Type\r
----------- ---------------  -----------------  ---------------\r
System      10.12.16.0       FF-FF-FF-FF-FF-FF  Local/Broadcast\r
System      10.12.16.1       00-1F-9D-48-72-51  Dynamic\r
\r
Total Entries: 2";

const FDB_TABLE: &str = "\
Unicast MAC Address Aging Time  = 300\r
\r
VID  VLAN Name                        MAC Address       Port  Type     Status\r
---- -------------------------------- ----------------- ----- -------- --------\r
1    default                          00-0F-E2-21-35-20 9     Dynamic  Forward\r
1    default                          00-1D-E5-48-34-81 12    Dynamic  Forward\r
\r
Total Entries: 2";

#[derive(Debug)]
struct State {
    paging: bool,
    commands: Vec<String>,
    missing: Vec<String>,
}

/// Scripted switch; clones share state with the spawned session.
#[derive(Clone)]
pub(crate) struct FakeSwitch {
    state: Arc<Mutex<State>>,
}

impl FakeSwitch {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                paging: true,
                commands: Vec::new(),
                missing: Vec::new(),
            })),
        }
    }

    pub fn with_paging(self, enabled: bool) -> Self {
        self.state.lock().unwrap().paging = enabled;
        self
    }

    /// Answer `command` as an unknown command.
    pub fn without_command(self, command: &str) -> Self {
        self.state.lock().unwrap().missing.push(command.to_string());
        self
    }

    /// Commands received after login, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn paging_enabled(&self) -> bool {
        self.state.lock().unwrap().paging
    }

    /// Start a session and return the client end of the connection.
    pub fn spawn(&self) -> DuplexStream {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let state = self.state.clone();
        tokio::spawn(async move {
            let _ = serve(server, state).await;
        });
        client
    }
}

async fn serve(mut io: DuplexStream, state: Arc<Mutex<State>>) -> io::Result<()> {
    io.write_all(&[IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SGA]).await?;
    io.write_all(b"\r\n  DES-3200-28 Fast Ethernet Switch Command Line Interface\r\n\r\nUserName:")
        .await?;
    let Some(user) = read_line(&mut io).await? else {
        return Ok(());
    };
    io.write_all(b"PassWord:").await?;
    let Some(password) = read_line(&mut io).await? else {
        return Ok(());
    };

    if user != "admin" || password != "secret" {
        io.write_all(b"\r\nIncorrect Login\r\n\r\nUserName:").await?;
        while read_line(&mut io).await?.is_some() {}
        return Ok(());
    }

    io.write_all(format!("\r\n\r\n{PROMPT}").as_bytes()).await?;

    while let Some(line) = read_line(&mut io).await? {
        let command = line.trim().to_string();
        if command.is_empty() {
            io.write_all(format!("\r\n{PROMPT}").as_bytes()).await?;
            continue;
        }

        let (paging, missing, received) = {
            let mut state = state.lock().unwrap();
            state.commands.push(command.clone());
            (
                state.paging,
                state.missing.contains(&command),
                state.commands.len(),
            )
        };

        let banner = format!("{command}\r\nCommand: {command}\r\n\r\n");
        let body = match command.as_str() {
            _ if missing => None,
            "show switch" if paging => {
                let first_page: Vec<&str> = SHOW_SWITCH.lines().take(3).collect();
                let page = format!("{banner}{}\r\n{PAGER}", first_page.join("\n"));
                io.write_all(page.as_bytes()).await?;
                while read_byte(&mut io).await?.is_some_and(|b| b != b'q') {}
                io.write_all(format!("\r\n{PROMPT}").as_bytes()).await?;
                continue;
            }
            "show switch" => Some(SHOW_SWITCH.to_string()),
            "disable clipaging" => {
                state.lock().unwrap().paging = false;
                Some("Success.".to_string())
            }
            "enable clipaging" => {
                state.lock().unwrap().paging = true;
                Some("Success.".to_string())
            }
            "show config current_config" => Some(CURRENT_CONFIG.to_string()),
            "show config active" => Some(ACTIVE_CONFIG.to_string()),
            "show config config_in_nvram" => Some(NVRAM_CONFIG.to_string()),
            "show arpentry" => Some(ARP_TABLE.to_string()),
            "show fdb" => Some(FDB_TABLE.to_string()),
            // Entry count grows with every command received
            "show log" => Some(format!(
                "Index Date       Time     Log Text\r\n\r\nTotal Entries: {received}"
            )),
            _ => None,
        };

        let reply = match body {
            Some(body) => format!("{banner}{body}\r\n\r\n{PROMPT}"),
            None => format!(
                "{command}\r\nAvailable commands:\r\n..  ?  cable_diag  cfm  clear  config  create\r\n\r\n{PROMPT}"
            ),
        };
        io.write_all(reply.as_bytes()).await?;
    }
    Ok(())
}

/// Next data byte, skipping Telnet commands. `None` on EOF.
async fn read_byte(io: &mut DuplexStream) -> io::Result<Option<u8>> {
    loop {
        let byte = match io.read_u8().await {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        if byte != IAC {
            return Ok(Some(byte));
        }
        let command = io.read_u8().await?;
        if (WILL..=DONT).contains(&command) {
            io.read_u8().await?;
        }
    }
}

async fn read_line(io: &mut DuplexStream) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    loop {
        match read_byte(io).await? {
            Some(b'\n') => break,
            Some(b'\r') => {}
            Some(b) => line.push(b),
            None => return Ok(None),
        }
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}
