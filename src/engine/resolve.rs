//! Raw-field resolution.
//!
//! Matching leaves a [`RawFields`] record; resolution turns it into one
//! absolute instant:
//!
//! - absent fields keep their zero-like defaults (year 0 in the proleptic
//!   Gregorian calendar, month 1, day 1, everything else 0)
//! - a two-digit year goes through the pivot-at-69 rule
//! - a 12-hour value is combined with the AM/PM marker when one was captured
//! - the components are composed under the captured fixed offset (UTC when
//!   the pattern had no offset field)
//!
//! Composition uses chrono's checked constructors, so values the calendar
//! rejects (hour 31, month 13) surface as mismatch errors here; there is no
//! further validation.

use super::matcher::{FieldSet, RawFields};
use crate::api::MismatchError;
use chrono::{DateTime, FixedOffset, NaiveDate};

/// Resolve `raw` into an instant. `end` is the input length, used as the
/// error position for values the calendar rejects.
pub(crate) fn resolve(raw: &RawFields, end: usize) -> Result<DateTime<FixedOffset>, MismatchError> {
    let year = if raw.seen.contains(FieldSet::TWO_DIGIT_YEAR) { pivot_year(raw.year) } else { raw.year };
    let hour = resolve_hour(raw);

    let out_of_range = || MismatchError {
        position: end,
        expected: "calendar-valid date-time".to_string(),
        found: format!(
            "{year:04}-{:02}-{:02} {hour:02}:{:02}:{:02}.{:09} offset {}s",
            raw.month, raw.day, raw.minute, raw.second, raw.nanos, raw.offset_secs
        ),
    };

    let naive = NaiveDate::from_ymd_opt(year, raw.month, raw.day)
        .and_then(|date| date.and_hms_nano_opt(hour, raw.minute, raw.second, raw.nanos))
        .ok_or_else(out_of_range)?;
    let offset = FixedOffset::east_opt(raw.offset_secs).ok_or_else(out_of_range)?;

    naive.and_local_timezone(offset).single().ok_or_else(out_of_range)
}

/// Two-digit years pivot at 69: 0-68 land in the 2000s, 69-99 in the 1900s.
fn pivot_year(two_digit: i32) -> i32 {
    if two_digit <= 68 { 2000 + two_digit } else { 1900 + two_digit }
}

fn resolve_hour(raw: &RawFields) -> u32 {
    if raw.seen.contains(FieldSet::HOUR24) {
        return raw.hour;
    }
    if raw.seen.contains(FieldSet::HOUR12) && raw.seen.contains(FieldSet::MERIDIEM) {
        return match (raw.pm, raw.hour) {
            (true, hour) if hour != 12 => hour + 12,
            (false, 12) => 0,
            (_, hour) => hour,
        };
    }
    // A 12-hour value without a marker passes through unconverted.
    raw.hour
}
