//! Wall-clock time in IANA timezones.

use crate::error::UnknownZone;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Timestamp layout used in replies.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolve an IANA zone name such as `Europe/London`.
pub fn parse_zone(name: &str) -> Result<Tz, UnknownZone> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| UnknownZone(name.trim().to_string()))
}

/// Format an instant in the given zone to second precision.
pub fn format_in(zone: Tz, instant: DateTime<Utc>) -> String {
    instant.with_timezone(&zone).format(TIME_FORMAT).to_string()
}

/// Current local time in the named zone.
pub fn now_in(name: &str) -> Result<String, UnknownZone> {
    let zone = parse_zone(name)?;
    Ok(format_in(zone, Utc::now()))
}
