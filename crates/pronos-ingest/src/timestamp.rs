//! Conversion of absolute match instants into display-local date and time

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Date shown when the instant cannot be parsed
pub const DATE_SENTINEL: &str = "--.--.----";

/// Time shown when the instant cannot be parsed
pub const TIME_SENTINEL: &str = "--:--";

/// Date rendering convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `DD/MM/YYYY`
    Slash,
    /// `DD.MM.YYYY`
    #[default]
    Dot,
}

impl DateStyle {
    fn pattern(&self) -> &'static str {
        match self {
            DateStyle::Slash => "%d/%m/%Y",
            DateStyle::Dot => "%d.%m.%Y",
        }
    }
}

/// Localized date/time pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedDateTime {
    /// Day, month and year
    pub date: String,
    /// Hour and minute, 24-hour clock
    pub time: String,
}

impl LocalizedDateTime {
    /// The pair rendered for unparseable input
    pub fn sentinel() -> Self {
        Self {
            date: DATE_SENTINEL.to_string(),
            time: TIME_SENTINEL.to_string(),
        }
    }

    /// Whether this is the sentinel pair
    pub fn is_sentinel(&self) -> bool {
        self.date == DATE_SENTINEL && self.time == TIME_SENTINEL
    }
}

/// Renders instants in a fixed civil timezone
#[derive(Debug, Clone, Copy)]
pub struct Localizer {
    timezone: Tz,
    style: DateStyle,
}

impl Localizer {
    /// Create a localizer for `timezone`
    pub fn new(timezone: Tz, style: DateStyle) -> Self {
        Self { timezone, style }
    }

    /// Target timezone
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Localize an ISO-8601 instant; never fails
    pub fn localize(&self, iso: &str) -> LocalizedDateTime {
        match parse_instant(iso) {
            Some(instant) => self.render(instant),
            None => {
                warn!(input = %iso, "Unparseable match timestamp");
                LocalizedDateTime::sentinel()
            }
        }
    }

    /// Render an already-parsed instant
    pub fn render(&self, instant: DateTime<Utc>) -> LocalizedDateTime {
        let local = instant.with_timezone(&self.timezone);
        LocalizedDateTime {
            date: local.format(self.style.pattern()).to_string(),
            time: local.format("%H:%M").to_string(),
        }
    }
}

/// Localize `iso` in the timezone named `timezone`
///
/// Unknown timezone names yield the sentinel pair, like unparseable instants.
pub fn localize(iso: &str, timezone: &str, style: DateStyle) -> LocalizedDateTime {
    match Tz::from_str(timezone) {
        Ok(tz) => Localizer::new(tz, style).localize(iso),
        Err(_) => {
            warn!(timezone = %timezone, "Unknown timezone");
            LocalizedDateTime::sentinel()
        }
    }
}

/// Parse an absolute instant
///
/// Accepts RFC 3339 with any offset. Offset-less date-times and bare dates
/// are read as UTC.
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
