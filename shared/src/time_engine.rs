//! Time Engine - time zone validity and live time formatting
//!
//! Every clock goes through this module to turn a zone identifier into a
//! `Tz` and to render the wall-clock time of a zone at a given instant.

use chrono::{DateTime, Local, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// AM/PM indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    AM,
    PM,
}

impl std::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Meridiem::AM => write!(f, "AM"),
            Meridiem::PM => write!(f, "PM"),
        }
    }
}

/// Returned when an identifier is not in the time zone database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeZone(pub String);

impl std::fmt::Display for InvalidTimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid timezone: {}", self.0)
    }
}

impl std::error::Error for InvalidTimeZone {}

/// Wall-clock time of one zone at one instant
#[derive(Debug, Clone)]
pub struct ZoneTime {
    /// Hour in 24-hour format (0-23)
    pub hour24: u32,
    /// Hour in 12-hour format (1-12)
    pub hour12: u32,
    /// Minute (0-59)
    pub minute: u32,
    /// Second (0-59)
    pub second: u32,
    /// AM/PM indicator
    pub meridiem: Meridiem,
    /// UTC offset in minutes (e.g., 480 for UTC+8)
    pub utc_offset_minutes: i32,
    /// Time zone abbreviation (e.g., "CST", "JST")
    pub tz_abbrev: String,
}

impl ZoneTime {
    /// Format as "HH:MM:SS" (24h) or "hh:mm:ss AM" (12h)
    pub fn format_time(&self, hour12: bool) -> String {
        if hour12 {
            format!(
                "{:02}:{:02}:{:02} {}",
                self.hour12, self.minute, self.second, self.meridiem
            )
        } else {
            format!("{:02}:{:02}:{:02}", self.hour24, self.minute, self.second)
        }
    }

    /// Format the UTC offset as "UTC±hh:mm"
    pub fn format_utc_offset(&self) -> String {
        let sign = if self.utc_offset_minutes >= 0 { "+" } else { "-" };
        let abs_minutes = self.utc_offset_minutes.abs();
        format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
    }
}

/// Compute the wall-clock time for a zone at a specific instant
pub fn compute_zone_time_at(tz: Tz, now_utc: DateTime<Utc>) -> ZoneTime {
    let local = now_utc.with_timezone(&tz);

    let hour24 = local.hour();
    let hour12 = match hour24 {
        0 => 12,
        1..=12 => hour24,
        _ => hour24 - 12,
    };
    let meridiem = if hour24 < 12 { Meridiem::AM } else { Meridiem::PM };

    ZoneTime {
        hour24,
        hour12,
        minute: local.minute(),
        second: local.second(),
        meridiem,
        utc_offset_minutes: local.offset().fix().local_minus_utc() / 60,
        tz_abbrev: local.format("%Z").to_string(),
    }
}

/// Render the live time string shown next to a zone
pub fn format_live_time(tz: Tz, now_utc: DateTime<Utc>, hour12: bool) -> String {
    compute_zone_time_at(tz, now_utc).format_time(hour12)
}

/// Text of the main clock showing the machine's own time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalClockText {
    /// "HH:MM:SS", always 24-hour
    pub time: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// Full weekday name, e.g. "Wednesday"
    pub weekday: String,
}

/// Format an instant as seen from any offset
pub fn format_local_clock<T>(local: &DateTime<T>) -> LocalClockText
where
    T: TimeZone,
    T::Offset: std::fmt::Display,
{
    LocalClockText {
        time: local.format("%H:%M:%S").to_string(),
        date: local.format("%Y-%m-%d").to_string(),
        weekday: local.format("%A").to_string(),
    }
}

/// Main clock text for the system time zone
pub fn local_clock_at(now_utc: DateTime<Utc>) -> LocalClockText {
    format_local_clock(&now_utc.with_timezone(&Local))
}

/// Parse a zone identifier, rejecting anything the database does not know
///
/// Matching is exact and case-sensitive.
pub fn parse_timezone(tz_str: &str) -> Result<Tz, InvalidTimeZone> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| InvalidTimeZone(tz_str.to_string()))
}

/// Search timezones by name (case-insensitive partial match)
pub fn search_timezones(query: &str) -> Vec<Tz> {
    let query_lower = query.to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&query_lower))
        .copied()
        .collect()
}
