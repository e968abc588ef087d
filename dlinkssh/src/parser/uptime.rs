//! Human-readable uptime to seconds.

use std::sync::LazyLock;

use regex::Regex;

pub const MINUTE_SECONDS: u64 = 60;
pub const HOUR_SECONDS: u64 = 3600;
pub const DAY_SECONDS: u64 = 24 * HOUR_SECONDS;
pub const WEEK_SECONDS: u64 = 7 * DAY_SECONDS;
pub const YEAR_SECONDS: u64 = 365 * DAY_SECONDS;

static UNITS: LazyLock<Vec<(Regex, u64)>> = LazyLock::new(|| {
    [
        (r"(\d+)\syear", YEAR_SECONDS),
        (r"(\d+)\sweek", WEEK_SECONDS),
        (r"(\d+)\sday", DAY_SECONDS),
        (r"(\d+)\shour", HOUR_SECONDS),
        (r"(\d+)\sminute", MINUTE_SECONDS),
        (r"(\d+)\ssecond", 1),
    ]
    .into_iter()
    .map(|(pattern, seconds)| (Regex::new(pattern).unwrap(), seconds))
    .collect()
});

/// Convert an uptime such as `"1 weeks 2 days 3 hours 4 minutes 5 seconds"`
/// into a number of seconds.
///
/// Each unit is taken from its first occurrence; units that do not appear
/// count as zero. A year is 365 days.
pub fn parse_uptime(uptime: &str) -> u64 {
    UNITS
        .iter()
        .filter_map(|(re, seconds)| {
            let count: u64 = re.captures(uptime)?.get(1)?.as_str().parse().ok()?;
            Some(count.saturating_mul(*seconds))
        })
        .fold(0u64, u64::saturating_add)
}
