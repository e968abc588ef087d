//! Output accumulator searched from the tail.
//!
//! `show config` dumps on larger switches run to hundreds of kilobytes and
//! the prompt is always at the end, so patterns are only matched against
//! the last `search_depth` bytes.

use std::fmt;

use bytes::BytesMut;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Output received from the device, with ANSI escapes removed.
///
/// The escape parser keeps its state between chunks, so a sequence split
/// across two reads (the D-Link pager highlights itself with `ESC [7m`) is
/// still recognized.
pub struct PatternBuffer {
    output: BytesMut,
    parser: Parser,
    search_depth: usize,
}

/// Keeps printable text and the layout controls column parsing relies on.
struct TextSink<'a>(&'a mut BytesMut);

impl Perform for TextSink<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.0.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.extend_from_slice(&[byte]);
        }
    }
}

impl PatternBuffer {
    pub fn new(search_depth: usize) -> Self {
        Self {
            output: BytesMut::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Append a chunk of device output.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.parser.advance(&mut TextSink(&mut self.output), chunk);
    }

    /// Index of the first pattern, in slice order, that matches the tail.
    pub fn find_any(&self, patterns: &[&Regex]) -> Option<usize> {
        let tail = self.tail();
        patterns.iter().position(|p| p.is_match(tail))
    }

    fn tail(&self) -> &[u8] {
        let start = self.output.len().saturating_sub(self.search_depth);
        &self.output[start..]
    }

    /// Hand over everything accumulated and start again.
    pub fn take(&mut self) -> BytesMut {
        self.output.split()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.output.len())
            .field("search_depth", &self.search_depth)
            .finish_non_exhaustive()
    }
}
