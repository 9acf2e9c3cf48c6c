//! Timestamp formats and the pure formatting function.
//!
//! Formats are selected by name through configuration. Rendering is pure
//! with respect to the supplied instant; only the unrecognized-name path
//! has a side effect (one error line through the injected log).

use crate::log::StatusLog;
use chrono::{DateTime, Local, SecondsFormat, Utc};

/// A recognized timestamp format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// No timestamp; the stream passes through untouched.
    None,
    /// RFC 3339 / ISO 8601 with milliseconds, UTC.
    Iso8601,
    /// `dd/mm/yyyy hh:mm:ss.SSS`, local time.
    EuropeanDateTime,
    /// `mm/dd/yyyy hh:mm:ss.SSS`, local time.
    UsDateTime,
    /// `hh:mm:ss.SSS`, local time.
    TimeOnly,
}

/// All recognized formats, in display order.
pub const ALL_FORMATS: [TimestampFormat; 5] = [
    TimestampFormat::None,
    TimestampFormat::Iso8601,
    TimestampFormat::EuropeanDateTime,
    TimestampFormat::UsDateTime,
    TimestampFormat::TimeOnly,
];

impl TimestampFormat {
    /// The configuration name for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampFormat::None => "none",
            TimestampFormat::Iso8601 => "iso-8601",
            TimestampFormat::EuropeanDateTime => "european-date-time",
            TimestampFormat::UsDateTime => "us-date-time",
            TimestampFormat::TimeOnly => "time-only",
        }
    }

    /// Render this format at the given instant.
    ///
    /// Returns the empty string for [`TimestampFormat::None`]. All numeric
    /// fields are zero-padded (2 digits for day/month/hour/minute/second,
    /// 3 for milliseconds, 4 for the year).
    pub fn render(&self, now: DateTime<Local>) -> String {
        match self {
            TimestampFormat::None => String::new(),
            TimestampFormat::Iso8601 => now
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::EuropeanDateTime => now.format("%d/%m/%Y %H:%M:%S%.3f").to_string(),
            TimestampFormat::UsDateTime => now.format("%m/%d/%Y %H:%M:%S%.3f").to_string(),
            TimestampFormat::TimeOnly => now.format("%H:%M:%S%.3f").to_string(),
        }
    }
}

impl std::fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl std::fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown timestamp format: {:?}", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl std::str::FromStr for TimestampFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TimestampFormat::None),
            "iso-8601" => Ok(TimestampFormat::Iso8601),
            "european-date-time" => Ok(TimestampFormat::EuropeanDateTime),
            "us-date-time" => Ok(TimestampFormat::UsDateTime),
            "time-only" => Ok(TimestampFormat::TimeOnly),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Resolve a configured format name and render it at the current instant.
///
/// An unrecognized name is logged through `log` and degrades to the empty
/// string, so the caller still forwards the payload unstamped. This never
/// fails and never drops data.
pub fn timestamp_for(selection: &str, log: &dyn StatusLog) -> String {
    match selection.parse::<TimestampFormat>() {
        Ok(format) => format.render(Local::now()),
        Err(e) => {
            log.error(&e.to_string());
            String::new()
        }
    }
}
