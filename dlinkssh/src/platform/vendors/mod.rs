//! Built-in vendor platforms.

pub mod dlink;
