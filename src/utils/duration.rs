//! Parsing of giveaway durations such as `30m`, `1h` or `2d`

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bot::error::Error;
use crate::constants::timeouts::MAX_GIVEAWAY_DURATION_SECONDS;

static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(\d+)\s*([smhd])$").expect("duration pattern is valid"));

/// Parse `<integer><s|m|h|d>` into a positive duration
pub fn parse_duration(input: &str) -> Result<Duration, Error> {
    let captures = DURATION_PATTERN
        .captures(input.trim())
        .ok_or(Error::InvalidDuration)?;

    let value: u64 = captures[1].parse().map_err(|_| Error::InvalidDuration)?;
    let unit_seconds = match captures[2].to_ascii_lowercase().as_str() {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return Err(Error::InvalidDuration),
    };

    let seconds = value
        .checked_mul(unit_seconds)
        .filter(|secs| *secs > 0 && *secs <= MAX_GIVEAWAY_DURATION_SECONDS)
        .ok_or(Error::InvalidDuration)?;

    Ok(Duration::from_secs(seconds))
}
