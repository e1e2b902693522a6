//! Display text for snapshot fields.

use chrono::{DateTime, Local, TimeZone};

/// Placeholder for a missing value.
pub const MISSING: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Day,
    Hour,
    Minute,
}

impl DurationUnit {
    fn minutes(self) -> u64 {
        match self {
            Self::Day => 24 * 60,
            Self::Hour => 60,
            Self::Minute => 1,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }
}

/// `1 hour, 5 minutes`. `units` must be ordered largest first; zero parts
/// are skipped unless every part is zero.
pub fn minutes_to_duration(minutes: u64, units: &[DurationUnit]) -> String {
    let mut remaining = minutes;
    let mut parts = Vec::new();
    for unit in units {
        let size = unit.minutes();
        let amount = remaining / size;
        remaining %= size;
        if amount > 0 {
            let plural = if amount == 1 { "" } else { "s" };
            parts.push(format!("{amount} {}{plural}", unit.name()));
        }
    }
    if parts.is_empty() {
        let smallest = units.last().copied().unwrap_or(DurationUnit::Minute);
        return format!("0 {}s", smallest.name());
    }
    parts.join(", ")
}

pub fn session_time_text(minutes: Option<u64>) -> String {
    match minutes {
        Some(m) if m > 0 => minutes_to_duration(m, &[DurationUnit::Hour, DurationUnit::Minute]),
        _ => MISSING.to_string(),
    }
}

pub fn play_time_text(minutes: Option<u64>) -> String {
    match minutes {
        Some(m) if m > 0 => minutes_to_duration(
            m,
            &[DurationUnit::Day, DurationUnit::Hour, DurationUnit::Minute],
        ),
        _ => MISSING.to_string(),
    }
}

/// Long date (`January 5, 2024`) of a unix timestamp in `tz`.
pub fn date_text_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(ts, 0)?;
    Some(utc.with_timezone(tz).format("%B %-d, %Y").to_string())
}

pub fn datetime_text_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(ts, 0)?;
    Some(utc.with_timezone(tz).format("%B %-d, %Y %H:%M").to_string())
}

/// Local long date, or `--`.
pub fn date_text(ts: Option<i64>) -> String {
    ts.filter(|ts| *ts > 0)
        .and_then(|ts| date_text_in(ts, &Local))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn whitelisted_text(ts: Option<i64>) -> String {
    ts.filter(|ts| *ts > 0)
        .and_then(|ts| date_text_in(ts, &Local))
        .unwrap_or_else(|| "not yet".to_string())
}

/// Expiration of an action relative to the server clock.
pub fn expiration_text(exp: Option<i64>, server_time: i64) -> String {
    match exp {
        None => "permanent".to_string(),
        Some(exp) if exp <= server_time => "expired".to_string(),
        Some(exp) => {
            let minutes = ((exp - server_time) as u64).div_ceil(60);
            format!(
                "expires in {}",
                minutes_to_duration(
                    minutes,
                    &[DurationUnit::Day, DurationUnit::Hour, DurationUnit::Minute]
                )
            )
        }
    }
}
