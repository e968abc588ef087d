//! Line-oriented channel over a transport.

use std::time::Duration;

use log::{debug, trace};
use regex::bytes::Regex;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);
use crate::transport::{Transport, TransportKind};

/// Interactive channel to a device.
///
/// Wraps a [`Transport`] with a [`PatternBuffer`] so callers can send a
/// line and then wait until any of a set of patterns shows up at the end
/// of the output.
pub struct Channel {
    transport: Transport,
    buffer: PatternBuffer,
}

impl Channel {
    /// Create a channel with the default search depth.
    pub fn new(transport: Transport) -> Self {
        Self::with_search_depth(transport, 1000)
    }

    /// Create a channel searching the last `search_depth` bytes for prompts.
    pub fn with_search_depth(transport: Transport, search_depth: usize) -> Self {
        Self {
            transport,
            buffer: PatternBuffer::new(search_depth),
        }
    }

    /// Protocol of the underlying transport.
    pub fn kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Send `text` followed by the transport's line ending.
    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        debug!("channel: sending {:?}", text);
        let mut line = String::with_capacity(text.len() + 2);
        line.push_str(text);
        line.push_str(self.kind().line_ending());
        self.transport.send(line.as_bytes()).await
    }

    /// Send a secret line without logging it.
    pub async fn send_hidden_line(&mut self, text: &str) -> Result<()> {
        debug!("channel: sending <hidden>");
        let mut line = String::with_capacity(text.len() + 2);
        line.push_str(text);
        line.push_str(self.kind().line_ending());
        self.transport.send(line.as_bytes()).await
    }

    /// Send bytes as-is, with no line ending.
    pub async fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.transport.send(data).await
    }

    /// Read until one of `patterns` matches the tail of the output.
    ///
    /// Returns everything read since the previous match together with the
    /// index of the pattern that matched. Patterns are tried in order, so
    /// list the more specific ones first.
    pub async fn read_until_any(
        &mut self,
        patterns: &[&Regex],
        timeout: Duration,
    ) -> Result<(String, usize)> {
        let now = tokio::time::Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);

        loop {
            if let Some(index) = self.buffer.find_any(patterns) {
                let data = self.buffer.take();
                return Ok((String::from_utf8_lossy(&data).into_owned(), index));
            }

            let chunk = tokio::time::timeout_at(deadline, self.transport.read_chunk())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))??;

            match chunk {
                Some(data) => {
                    trace!("channel: read {} bytes", data.len());
                    self.buffer.extend(&data);
                }
                None => return Err(ChannelError::Closed.into()),
            }
        }
    }

    /// Read until `pattern` matches the tail of the output.
    pub async fn read_until(&mut self, pattern: &Regex, timeout: Duration) -> Result<String> {
        let (output, _) = self.read_until_any(&[pattern], timeout).await?;
        Ok(output)
    }

    /// Send the transport keepalive.
    pub async fn keepalive(&mut self) -> Result<()> {
        self.transport.keepalive().await
    }

    /// Whether the transport still looks usable.
    pub fn is_active(&self) -> bool {
        self.transport.is_active()
    }

    /// Close the transport.
    pub async fn close(self) -> Result<()> {
        self.transport.close().await
    }
}
