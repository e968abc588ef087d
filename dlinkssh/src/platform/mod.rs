//! Platform definitions.
//!
//! A platform bundles the prompt patterns, paging commands and output
//! clean-up rules of one device family.

mod definition;
pub mod vendors;

pub use definition::PlatformDefinition;

/// Device-family hooks applied to every command's output.
pub trait VendorBehavior: Send + Sync {
    /// Turn raw session output into the command's result text.
    fn normalize_output(&self, raw: &str, command: &str) -> String;

    /// Failures that plain substring matching cannot catch.
    fn detect_failure(&self, _output: &str) -> Option<String> {
        None
    }
}

/// Fallback for custom platforms without their own behavior: drops the
/// echoed command line and the prompt line.
pub struct DefaultBehavior;

impl VendorBehavior for DefaultBehavior {
    fn normalize_output(&self, raw: &str, command: &str) -> String {
        let mut lines: Vec<&str> = raw.lines().collect();
        lines.pop();

        let skip = match lines.first() {
            Some(first) if first.trim_end().ends_with(command.trim()) => 1,
            _ => 0,
        };
        lines[skip..].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normalize() {
        let out = DefaultBehavior.normalize_output(
            "show vlan\r\nVID : 1  VLAN Name : default\r\nsw1#",
            "show vlan",
        );
        assert_eq!(out, "VID : 1  VLAN Name : default");
    }

    #[test]
    fn test_default_normalize_prompt_only() {
        assert_eq!(DefaultBehavior.normalize_output("sw1#", "show vlan"), "");
        assert_eq!(DefaultBehavior.normalize_output("", "show vlan"), "");
    }
}
