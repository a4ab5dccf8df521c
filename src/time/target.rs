use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::foundation::error::{CountdownError, CountdownResult};
use crate::time::countdown::CountdownDuration;

/// Sentinel shown instead of counters once the target is not in the future.
pub const PASSED_MESSAGE: &str = "Date has passed!";

/// Zone-less forms, interpreted in the caller's time zone.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Outcome of comparing the target instant against "now".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeResult {
    /// Target is at or before the reference instant.
    Passed(String),
    /// Time left until the target.
    Remaining(CountdownDuration),
}

impl TimeResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }
}

/// Parse a target date/time, resolving zone-less inputs in the local time zone.
pub fn parse_target_time(s: &str) -> CountdownResult<DateTime<Utc>> {
    parse_target_time_in(s, &Local)
}

/// Parse a target date/time, resolving zone-less inputs in `tz`.
///
/// Accepts RFC 3339 (`2030-01-01T00:00:00Z`, `...+02:00`), `YYYY-MM-DDTHH:MM[:SS[.fff]]` (also
/// with a space separator), hour-only `YYYY-MM-DDTHH`, and bare `YYYY-MM-DD` or `YYYYMMDD`
/// dates (midnight).
pub fn parse_target_time_in<Tz: TimeZone>(s: &str, tz: &Tz) -> CountdownResult<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CountdownError::validation("target time must be non-empty"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz, s);
        }
    }

    if let Some(naive) = parse_hour_only(s) {
        return localize(naive, tz, s);
    }

    let compact = s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit());
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| compact.then(|| NaiveDate::parse_from_str(s, "%Y%m%d").ok())?);
    if let Some(date) = date {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| CountdownError::validation(format!("invalid date \"{s}\"")))?;
        return localize(naive, tz, s);
    }

    Err(CountdownError::validation(format!(
        "unrecognised target time \"{s}\" (expected ISO 8601, e.g. 2030-01-01T12:00:00Z)"
    )))
}

/// `YYYY-MM-DDTHH`, which chrono's format parser rejects without minutes.
fn parse_hour_only(s: &str) -> Option<NaiveDateTime> {
    let (date, hour) = s.split_once('T')?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    date.and_hms_opt(hour.parse().ok()?, 0, 0)
}

fn localize<Tz: TimeZone>(
    naive: NaiveDateTime,
    tz: &Tz,
    raw: &str,
) -> CountdownResult<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CountdownError::validation(format!(
                "target time \"{raw}\" does not exist in the local time zone"
            ))
        })
}

/// Compare `target` against `now` at millisecond resolution.
pub fn time_until(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeResult {
    let difference = (target - now).num_milliseconds();
    if difference <= 0 {
        TimeResult::Passed(PASSED_MESSAGE.to_owned())
    } else {
        TimeResult::Remaining(CountdownDuration::from_millis(difference))
    }
}

/// Parse `target` and compare it against `now`.
#[tracing::instrument(level = "debug")]
pub fn evaluate(target: &str, now: DateTime<Utc>) -> CountdownResult<TimeResult> {
    let target = parse_target_time(target)?;
    Ok(time_until(target, now))
}
