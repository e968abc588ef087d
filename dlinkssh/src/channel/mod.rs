//! Channel layer: buffered reads with pattern-based waits.
//!
//! This sits between the raw transports and the driver, turning a byte
//! stream into "send a line, wait for one of these prompts".

mod buffer;
mod session;

pub use buffer::PatternBuffer;
pub use session::Channel;
