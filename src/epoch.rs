//! TLE epoch decoding.
//!
//! The epoch field is `YYDDD.DDDDDDDD`: a two-digit year followed by a
//! fractional day of year where `1.0` is January 1st, 00:00 UTC.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::error::{IngestError, Result};
use crate::models::FieldPolicy;

const NANOS_PER_DAY: f64 = 86_400_000_000_000.0;

/// Two-digit years above this pivot belong to the 1900s.
pub const YEAR_PIVOT: i32 = 56;

/// Map a two-digit TLE year onto a full year.
#[must_use]
pub const fn expand_two_digit_year(yy: i32) -> i32 {
    if yy > YEAR_PIVOT {
        1900 + yy
    } else {
        2000 + yy
    }
}

/// Decode a TLE epoch field into a UTC timestamp.
///
/// Under [`FieldPolicy::ZeroFill`] an unparseable year or day counts as zero,
/// so a garbage field decodes to midnight of December 31st, 1999.
pub fn decode_epoch(field: &str, policy: FieldPolicy) -> Result<DateTime<Utc>> {
    let field = field.trim();
    let malformed = || IngestError::MalformedEpoch(field.to_string());

    let (year_part, day_part) = match (field.get(..2), field.get(2..)) {
        (Some(year), Some(day)) => (year, day),
        _ => (field, ""),
    };

    let yy = policy.resolve(
        year_part.trim().parse::<i32>().ok().filter(|yy| (0..=99).contains(yy)),
        malformed,
    )?;
    let day = policy.resolve(
        day_part
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|day| day.is_finite() && (0.0..1000.0).contains(day)),
        malformed,
    )?;

    let year = expand_two_digit_year(yy);
    let day_zero = NaiveDate::from_ymd_opt(year - 1, 12, 31)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(malformed)?;

    // Whole days and the fraction are applied separately so the nanosecond
    // part is not swallowed by f64 rounding on large day counts.
    let whole_days = day.trunc();
    let fraction_ns = ((day - whole_days) * NANOS_PER_DAY).round() as i64;

    Ok(Utc.from_utc_datetime(&day_zero)
        + Duration::days(whole_days as i64)
        + Duration::nanoseconds(fraction_ns))
}
