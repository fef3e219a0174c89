//! Date helpers for the date range picker and the provider queries.

use serde::{Deserialize, Deserializer};
use time::{
    Date, Duration, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::{date, format_description},
};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The earliest date the date picker allows.
pub const MIN_DATE: Date = date!(2012 - 01 - 01);

/// How far back the default date range reaches.
const DEFAULT_PERIOD_DAYS: i64 = 365;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Get the current UTC offset for a canonical timezone name such as
/// "Europe/Oslo".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in the timezone with `offset`.
pub fn today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Format `date` as `YYYY-MM-DD`.
pub fn format_iso_date(date: Date) -> String {
    // The format only has numeric components, so it cannot fail.
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// The range shown when the user has not picked one: the last year up to `today`.
    pub fn default_for(today: Date) -> Self {
        let start = (today - Duration::days(DEFAULT_PERIOD_DAYS)).max(MIN_DATE);

        Self { start, end: today }
    }

    /// Build the range from the picker's values, falling back to the defaults
    /// for missing dates.
    ///
    /// Dates are clamped to [MIN_DATE] and `today`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if the start is after the end.
    pub fn from_picker(
        start: Option<Date>,
        end: Option<Date>,
        today: Date,
    ) -> Result<Self, Error> {
        let defaults = Self::default_for(today);
        let start = start.unwrap_or(defaults.start).clamp(MIN_DATE, today);
        let end = end.unwrap_or(defaults.end).clamp(MIN_DATE, today);

        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }

        Ok(Self { start, end })
    }
}

/// Deserialize an optional date, treating an empty string as `None`.
///
/// Browsers submit empty date inputs as `start_date=`.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(deserializer)?;

    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Date::parse(text, ISO_DATE)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
