//! Telnet transport over any tokio byte stream.
//!
//! Only the bare minimum of RFC 854 option negotiation is implemented:
//! the client agrees to server-side echo and suppress-go-ahead, and
//! refuses every other option. Subnegotiations are consumed and dropped.

use std::time::Duration;

use bytes::{BufMut, BytesMut};
use log::{debug, trace};
use memchr::memchr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use super::config::ConnectionConfig;
use crate::error::{Result, TransportError};

/// Interpret As Command.
pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
/// Subnegotiation begin.
pub const SB: u8 = 250;
/// No operation.
pub const NOP: u8 = 241;
/// Subnegotiation end.
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;

const READ_BUFFER_SIZE: usize = 4096;

/// Byte stream a Telnet session can run over.
pub trait TelnetStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> TelnetStream for T {}

/// Telnet transport.
pub struct TelnetTransport {
    stream: Box<dyn TelnetStream>,
    codec: TelnetCodec,
    active: bool,
}

impl TelnetTransport {
    /// Open a TCP connection to the configured host.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        debug!("telnet: connecting to {}", config.socket_addr());

        let stream = tokio::time::timeout(
            config.timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!("telnet: failed to set TCP_NODELAY: {}", e);
        }

        Ok(Self::from_stream(stream))
    }

    /// Run the Telnet protocol over an already-established stream.
    pub fn from_stream(stream: impl TelnetStream + 'static) -> Self {
        Self {
            stream: Box::new(stream),
            codec: TelnetCodec::default(),
            active: true,
        }
    }

    /// Write raw bytes. Literal `0xFF` bytes are escaped.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        let escaped = escape_iac(data);
        self.write(&escaped).await
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        if !self.active {
            return Err(TransportError::Disconnected.into());
        }
        let result = async {
            self.stream.write_all(data).await?;
            self.stream.flush().await
        }
        .await;

        if let Err(e) = result {
            self.active = false;
            return Err(TransportError::Io(e).into());
        }
        Ok(())
    }

    /// Read until some payload arrives, answering negotiations on the way.
    ///
    /// Returns `None` on EOF.
    pub async fn read_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            let n = match self.stream.read(&mut buf).await {
                Ok(0) => {
                    self.active = false;
                    return Ok(None);
                }
                Ok(n) => n,
                Err(e) => {
                    self.active = false;
                    return Err(TransportError::Io(e).into());
                }
            };

            let decoded = self.codec.decode(&buf[..n]);
            if !decoded.replies.is_empty() {
                trace!("telnet: sending {} negotiation bytes", decoded.replies.len());
                self.write(&decoded.replies).await?;
            }
            if !decoded.data.is_empty() {
                return Ok(Some(decoded.data.to_vec()));
            }
        }
    }

    /// Send `IAC NOP`, the Telnet no-op.
    pub async fn keepalive(&mut self) -> Result<()> {
        self.write(&[IAC, NOP]).await
    }

    /// Whether the stream has neither failed nor hit EOF.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Shut down the stream.
    pub async fn close(mut self) -> Result<()> {
        tokio::time::timeout(Duration::from_secs(5), self.stream.shutdown())
            .await
            .map_err(|_| TransportError::Timeout(Duration::from_secs(5)))?
            .map_err(TransportError::Io)?;
        Ok(())
    }
}

/// Double every IAC byte so it is sent as data.
fn escape_iac(data: &[u8]) -> Vec<u8> {
    if memchr(IAC, data).is_none() {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity(data.len() + 4);
    for &b in data {
        out.push(b);
        if b == IAC {
            out.push(IAC);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    Iac,
    Negotiate(u8),
    Sub,
    SubIac,
}

/// Output of one decode step.
#[derive(Debug, Default)]
pub struct Decoded {
    /// Payload with all protocol bytes removed.
    pub data: BytesMut,

    /// Negotiation answers that must be written back.
    pub replies: BytesMut,
}

/// Incremental Telnet command parser.
#[derive(Debug, Default)]
pub struct TelnetCodec {
    state: State,
}

impl TelnetCodec {
    /// Split `input` into payload and negotiation replies.
    ///
    /// Commands split across calls are completed on the next call.
    pub fn decode(&mut self, input: &[u8]) -> Decoded {
        let mut out = Decoded::default();

        if self.state == State::Data && memchr(IAC, input).is_none() {
            out.data.extend_from_slice(input);
            return out;
        }

        let mut rest = input;
        while let Some((&first, tail)) = rest.split_first() {
            match self.state {
                State::Data => match memchr(IAC, rest) {
                    Some(pos) => {
                        out.data.extend_from_slice(&rest[..pos]);
                        rest = &rest[pos + 1..];
                        self.state = State::Iac;
                        continue;
                    }
                    None => {
                        out.data.extend_from_slice(rest);
                        break;
                    }
                },
                State::Iac => {
                    self.state = match first {
                        IAC => {
                            out.data.put_u8(IAC);
                            State::Data
                        }
                        DO | DONT | WILL | WONT => State::Negotiate(first),
                        SB => State::Sub,
                        _ => State::Data,
                    };
                }
                State::Negotiate(command) => {
                    respond(command, first, &mut out.replies);
                    self.state = State::Data;
                }
                State::Sub => {
                    if first == IAC {
                        self.state = State::SubIac;
                    }
                }
                State::SubIac => {
                    self.state = if first == SE { State::Data } else { State::Sub };
                }
            }
            rest = tail;
        }

        out
    }
}

fn respond(command: u8, option: u8, replies: &mut BytesMut) {
    let answer = match command {
        WILL if option == OPT_ECHO || option == OPT_SGA => DO,
        WILL => DONT,
        DO if option == OPT_SGA => WILL,
        DO => WONT,
        _ => return,
    };
    trace!("telnet: cmd {} opt {} -> {}", command, option, answer);
    replies.put_slice(&[IAC, answer, option]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_data_passthrough() {
        let mut codec = TelnetCodec::default();
        let out = codec.decode(b"UserName:");
        assert_eq!(&out.data[..], b"UserName:");
        assert!(out.replies.is_empty());
    }

    #[test]
    fn test_negotiation_replies() {
        let mut codec = TelnetCodec::default();
        let input = [
            IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SGA, IAC, DO, 24, IAC, DO, OPT_SGA, b'o', b'k',
        ];
        let out = codec.decode(&input);
        assert_eq!(&out.data[..], b"ok");
        assert_eq!(
            &out.replies[..],
            &[IAC, DO, OPT_ECHO, IAC, DO, OPT_SGA, IAC, WONT, 24, IAC, WILL, OPT_SGA]
        );
    }

    #[test]
    fn test_refuses_unknown_will_and_ignores_dont() {
        let mut codec = TelnetCodec::default();
        let out = codec.decode(&[IAC, WILL, 31, IAC, DONT, 1, IAC, WONT, 3]);
        assert!(out.data.is_empty());
        assert_eq!(&out.replies[..], &[IAC, DONT, 31]);
    }

    #[test]
    fn test_command_split_across_reads() {
        let mut codec = TelnetCodec::default();
        let first = codec.decode(&[b'a', IAC]);
        assert_eq!(&first.data[..], b"a");

        let second = codec.decode(&[DO]);
        assert!(second.data.is_empty());
        assert!(second.replies.is_empty());

        let third = codec.decode(&[24, b'b']);
        assert_eq!(&third.data[..], b"b");
        assert_eq!(&third.replies[..], &[IAC, WONT, 24]);
    }

    #[test]
    fn test_escaped_iac_and_subnegotiation() {
        let mut codec = TelnetCodec::default();
        let input = [b'x', IAC, IAC, IAC, SB, 24, 1, IAC, SE, b'y', IAC, NOP, b'z'];
        let out = codec.decode(&input);
        assert_eq!(&out.data[..], &[b'x', IAC, b'y', b'z']);
        assert!(out.replies.is_empty());
    }

    #[test]
    fn test_escape_iac() {
        assert_eq!(escape_iac(b"abc"), b"abc".to_vec());
        assert_eq!(escape_iac(&[1, IAC, 2]), vec![1, IAC, IAC, 2]);
    }

    #[tokio::test]
    async fn test_read_chunk_answers_negotiation() {
        let mock = tokio_test::io::Builder::new()
            .read(&[IAC, DO, 24, b'U', b's', b'e', b'r', b'N', b'a', b'm', b'e', b':'])
            .write(&[IAC, WONT, 24])
            .build();
        let mut transport = TelnetTransport::from_stream(mock);

        let chunk = transport.read_chunk().await.unwrap();
        assert_eq!(chunk.as_deref(), Some(&b"UserName:"[..]));
        assert!(transport.is_active());
    }

    #[tokio::test]
    async fn test_keepalive_writes_nop() {
        let mock = tokio_test::io::Builder::new().write(&[IAC, NOP]).build();
        let mut transport = TelnetTransport::from_stream(mock);
        transport.keepalive().await.unwrap();
        assert!(transport.is_active());
    }

    #[tokio::test]
    async fn test_eof_marks_inactive() {
        let mock = tokio_test::io::Builder::new().build();
        let mut transport = TelnetTransport::from_stream(mock);
        assert!(transport.read_chunk().await.unwrap().is_none());
        assert!(!transport.is_active());

        let err = transport.keepalive().await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Transport(TransportError::Disconnected)
        ));
    }
}
