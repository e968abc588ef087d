//! D-Link managed switch platform definition.
//!
//! Covers the DES/DGS families that share the classic D-Link CLI: a single
//! `#` prompt carrying the model and the logged-in user or access level,
//! a `Command: ...` banner echoed before every output, and a pager that is
//! toggled with `disable clipaging` / `enable clipaging`.
//!
//! # Prompt Examples
//!
//! ```text
//! DES-3200-28:admin#
//! DGS-3120-24TC:5#
//! DGS-1210-28/ME:5#
//! ```
//!
//! # Pager
//!
//! ```text
//! CTRL+C ESC q Quit SPACE n Next Page ENTER Next Entry a All
//! ```

use std::sync::Arc;

use crate::platform::{PlatformDefinition, VendorBehavior};

/// Platform name for D-Link switches.
pub const PLATFORM_NAME: &str = "dlink";

/// Command used to detect whether paging is on.
pub const PAGING_PROBE_COMMAND: &str = "show switch";
pub const DISABLE_PAGING_COMMAND: &str = "disable clipaging";
pub const ENABLE_PAGING_COMMAND: &str = "enable clipaging";

/// Create the D-Link platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^[\w.\-/()@ ]{1,63}:[\w.\-]{1,31}#\s?\z")
        .unwrap()
        .with_pager_prompt(r"Next Page")
        .unwrap()
        .with_login_prompts(r"(?i)(user ?name|login)\s*:\s*\z", r"(?i)pass ?word\s*:\s*\z")
        .unwrap()
        .with_paging(
            PAGING_PROBE_COMMAND,
            "q",
            DISABLE_PAGING_COMMAND,
            ENABLE_PAGING_COMMAND,
        )
        .with_failure_pattern("Available commands:")
        .with_failure_pattern("Next possible completions:")
        .with_failure_pattern("Fail!")
        .with_failure_pattern("ERROR:")
        .with_terminal_size(80, 24)
        .with_behavior(Arc::new(DlinkBehavior))
}

/// D-Link output clean-up.
pub struct DlinkBehavior;

impl VendorBehavior for DlinkBehavior {
    fn normalize_output(&self, raw: &str, command: &str) -> String {
        let text = raw.replace("\r\n", "\n").replace(['\r', '\0'], "");
        let mut lines: Vec<&str> = text.lines().collect();

        // Trailing prompt
        lines.pop();

        let command = command.trim();
        let mut body = lines.as_slice();

        if let Some((first, rest)) = body.split_first() {
            if !command.is_empty() && first.trim_end().ends_with(command) {
                body = rest;
            }
        }

        while let Some((first, rest)) = body.split_first() {
            if first.trim().is_empty() {
                body = rest;
            } else {
                break;
            }
        }

        if let Some((first, rest)) = body.split_first() {
            if first.trim_start().starts_with("Command:") {
                body = rest;
            }
        }

        let start = body
            .iter()
            .position(|l| !l.trim().is_empty())
            .unwrap_or(body.len());
        let end = body
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(start, |i| i + 1);

        body[start..end].join("\n")
    }

    fn detect_failure(&self, output: &str) -> Option<String> {
        // Syntax errors point at the offending token with a caret line.
        output
            .lines()
            .any(|l| l.trim() == "^")
            .then(|| "syntax error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dlink_platform() {
        let platform = platform();
        assert_eq!(platform.name, "dlink");
        assert!(platform.supports_paging_control());
        assert_eq!(platform.paging_probe_command, "show switch");
        assert_eq!(platform.pager_quit, "q");
        assert_eq!(
            platform.disable_paging_command.as_deref(),
            Some("disable clipaging")
        );
        assert_eq!(
            platform.enable_paging_command.as_deref(),
            Some("enable clipaging")
        );
        assert!(platform.behavior.is_some());
    }

    #[test]
    fn test_prompt_match() {
        let prompt = platform().prompt;
        assert!(prompt.is_match(b"DES-3200-28:admin#"));
        assert!(prompt.is_match(b"DES-3200-28:admin# "));
        assert!(prompt.is_match(b"DGS-3120-24TC:5#"));
        assert!(prompt.is_match(b"DGS-1210-28/ME:5#"));
        assert!(prompt.is_match(b"Command: show switch\r\n\r\nDES-3028:4#"));

        assert!(!prompt.is_match(b"DES-3200-28:admin#show switch"));
        assert!(!prompt.is_match(b"Device Uptime : 1 days"));
        assert!(!prompt.is_match(b"DES-3200-28:admin#\r\nDevice Type : DES"));
        assert!(!prompt.is_match(b"# BASIC"));
    }

    #[test]
    fn test_pager_match() {
        let pager = platform().pager_prompt;
        assert!(pager.is_match(b"CTRL+C ESC q Quit SPACE n Next Page ENTER Next Entry a All"));
        assert!(!pager.is_match(b"DES-3200-28:admin#"));
    }

    #[test]
    fn test_login_prompts() {
        let platform = platform();
        assert!(platform.username_prompt.is_match(b"DES-3200-28 Fast Ethernet Switch\r\n\r\nUserName:"));
        assert!(platform.password_prompt.is_match(b"PassWord:"));
        assert!(!platform.password_prompt.is_match(b"UserName:"));
    }

    #[test]
    fn test_failure_patterns() {
        let platform = platform();
        assert!(
            platform
                .failed_when_contains
                .contains(&"Available commands:".to_string())
        );
        assert!(platform.failed_when_contains.contains(&"Fail!".to_string()));
    }

    #[test]
    fn test_normalize_strips_echo_banner_and_prompt() {
        let raw = "show switch\r\n\
                   Command: show switch\r\n\
                   \r\n\
                   Device Type        : DES-3200-28 Fast Ethernet Switch\r\n\
                   MAC Address        : 00-11-22-33-44-55\r\n\
                   \r\n\
                   DES-3200-28:admin#";
        let out = DlinkBehavior.normalize_output(raw, "show switch");
        assert_eq!(
            out,
            "Device Type        : DES-3200-28 Fast Ethernet Switch\n\
             MAC Address        : 00-11-22-33-44-55"
        );
    }

    #[test]
    fn test_normalize_without_banner() {
        let raw = "show vlan\r\nVID : 1\r\nDES-3028:4#";
        assert_eq!(DlinkBehavior.normalize_output(raw, "show vlan"), "VID : 1");
    }

    #[test]
    fn test_normalize_empty_output() {
        let raw = "disable clipaging\r\nCommand: disable clipaging\r\n\r\nSuccess.\r\n\r\nDES-3028:4#";
        assert_eq!(
            DlinkBehavior.normalize_output(raw, "disable clipaging"),
            "Success."
        );
        assert_eq!(DlinkBehavior.normalize_output("DES-3028:4#", "foo"), "");
    }

    #[test]
    fn test_detect_failure_caret() {
        let out = "show fbd\n         ^\nAvailable commands: ..";
        assert_eq!(
            DlinkBehavior.detect_failure(out),
            Some("syntax error".to_string())
        );
        assert_eq!(DlinkBehavior.detect_failure("Success."), None);
    }
}
