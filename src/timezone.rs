//! Resolving the current month in the user's timezone.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::{Error, month::MonthKey};

/// The current UTC offset of `canonical_timezone`, e.g. "Asia/Tokyo".
///
/// Returns `None` if the timezone name is unknown.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The month that `now` falls in when viewed from `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the timezone name is unknown.
pub fn month_at(canonical_timezone: &str, now: OffsetDateTime) -> Result<MonthKey, Error> {
    let timezone = time_tz::timezones::get_by_name(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))?;
    let offset = timezone.get_offset_utc(&now).to_utc();

    Ok(MonthKey::from_date(now.to_offset(offset).date()))
}

/// The current month in `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the timezone name is unknown.
pub fn current_month(canonical_timezone: &str) -> Result<MonthKey, Error> {
    month_at(canonical_timezone, OffsetDateTime::now_utc())
}
