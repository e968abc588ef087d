//! Session transports.
//!
//! A D-Link switch is reached either over SSH (via russh) or over plain
//! Telnet. Both expose the same small surface: write bytes, read the next
//! chunk, send a protocol-level no-op and close.

pub mod config;
mod ssh;
pub mod telnet;

pub use config::{AuthMethod, ConnectionConfig, HostKeyVerification, TransportKind};
pub use ssh::SshTransport;
pub use telnet::{TelnetStream, TelnetTransport};

use crate::error::Result;

/// An open session to a device.
pub enum Transport {
    /// SSH shell channel.
    Ssh(SshTransport),

    /// Telnet stream.
    Telnet(TelnetTransport),
}

impl Transport {
    /// Connect using the transport selected in `config`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        match config.kind {
            TransportKind::Ssh => Ok(Transport::Ssh(SshTransport::connect(config).await?)),
            TransportKind::Telnet => {
                Ok(Transport::Telnet(TelnetTransport::connect(config).await?))
            }
        }
    }

    /// Which protocol this session runs.
    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Ssh(_) => TransportKind::Ssh,
            Transport::Telnet(_) => TransportKind::Telnet,
        }
    }

    /// Write raw bytes.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Transport::Ssh(t) => t.send(data).await,
            Transport::Telnet(t) => t.send(data).await,
        }
    }

    /// Next chunk of output, `None` once the peer has closed.
    pub async fn read_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self {
            Transport::Ssh(t) => t.read_chunk().await,
            Transport::Telnet(t) => t.read_chunk().await,
        }
    }

    /// Send the transport's no-op: a NUL byte over SSH, `IAC NOP` over Telnet.
    pub async fn keepalive(&mut self) -> Result<()> {
        match self {
            Transport::Ssh(t) => t.keepalive().await,
            Transport::Telnet(t) => t.keepalive().await,
        }
    }

    /// Whether the session still looks usable.
    pub fn is_active(&self) -> bool {
        match self {
            Transport::Ssh(t) => t.is_active(),
            Transport::Telnet(t) => t.is_active(),
        }
    }

    /// Tear the session down.
    pub async fn close(self) -> Result<()> {
        match self {
            Transport::Ssh(t) => t.close().await,
            Transport::Telnet(t) => t.close().await,
        }
    }
}
