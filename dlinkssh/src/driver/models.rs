//! Types returned by the getters that do not come from a parser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Which configuration `get_config` should fetch.
///
/// Parsing ignores case, whether through `FromStr` or serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ConfigRetrieve {
    #[default]
    All,
    Running,
    Candidate,
    Startup,
}

impl ConfigRetrieve {
    pub fn includes_running(self) -> bool {
        matches!(self, ConfigRetrieve::All | ConfigRetrieve::Running)
    }

    pub fn includes_candidate(self) -> bool {
        matches!(self, ConfigRetrieve::All | ConfigRetrieve::Candidate)
    }
}

impl FromStr for ConfigRetrieve {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ConfigRetrieve::All),
            "running" => Ok(ConfigRetrieve::Running),
            "candidate" => Ok(ConfigRetrieve::Candidate),
            "startup" => Ok(ConfigRetrieve::Startup),
            _ => Err(DriverError::InvalidRetrieve {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ConfigRetrieve {
    type Error = DriverError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ConfigRetrieve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigRetrieve::All => "all",
            ConfigRetrieve::Running => "running",
            ConfigRetrieve::Candidate => "candidate",
            ConfigRetrieve::Startup => "startup",
        };
        f.write_str(name)
    }
}

/// Device configuration texts. Sections that were not requested stay empty.
///
/// D-Link switches have no separate startup configuration; the NVRAM copy
/// is reported as `candidate` and `startup` is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceConfig {
    pub running: String,
    pub startup: String,
    pub candidate: String,
}

/// Whether the CLI pager was on when the session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingStatus {
    #[default]
    Enabled,
    Disabled,
}
