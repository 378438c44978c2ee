//! Week anchoring for the availability grid.
//!
//! The grid shows one calendar week, Monday through Sunday, in the user's
//! local timezone. Grid positions are (day index, fractional hour) pairs;
//! these functions turn them into absolute instants and back. All functions
//! take the "now" anchor explicitly instead of reading the system clock.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{MatchError, Result};

/// Days shown on the grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Lower-case day names in grid order, as used by the UI columns.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Monday 00:00:00 local of the week containing `now`.
///
/// Sunday belongs to the week that started six days earlier.
///
/// # Errors
///
/// Returns [`MatchError::InvalidDatetime`] if local midnight on that Monday
/// does not exist or is ambiguous in `tz`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use chrono_tz::Tz;
/// use overlap_engine::week::week_start;
///
/// // Sunday March 22, 2026 → Monday March 16, 2026
/// let sunday = Utc.with_ymd_and_hms(2026, 3, 22, 15, 0, 0).unwrap();
/// let monday = week_start(sunday, Tz::UTC).unwrap();
/// assert_eq!(monday.to_rfc3339(), "2026-03-16T00:00:00+00:00");
/// ```
pub fn week_start(now: DateTime<Utc>, tz: Tz) -> Result<DateTime<Tz>> {
    let local = now.with_timezone(&tz);
    let days_back = i64::from(local.weekday().num_days_from_monday());
    let monday = local.date_naive() - Duration::days(days_back);

    let naive = monday
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| MatchError::InvalidDatetime(format!("no midnight on {monday}")))?;
    local_to_tz(&naive, tz)
}

/// The instant `hours` into day `day_index` of the week starting at `week_start`.
///
/// `hours` is a fractional hour-of-day in `[0, 24]` and is rounded to whole
/// minutes. Hour 24 is midnight at the end of the day.
///
/// # Errors
///
/// Returns [`MatchError::InvalidGrid`] for a day index outside the week or an
/// hour outside the day, and [`MatchError::InvalidDatetime`] if the local
/// time falls in a DST gap.
pub fn day_offset(
    week_start: DateTime<Tz>,
    day_index: usize,
    hours: f64,
) -> Result<DateTime<Utc>> {
    if day_index >= DAYS_PER_WEEK {
        return Err(MatchError::InvalidGrid(format!(
            "day index {day_index} is outside the week"
        )));
    }
    if !(0.0..=24.0).contains(&hours) {
        return Err(MatchError::InvalidGrid(format!(
            "{hours} hours is outside the day"
        )));
    }

    let minutes = (hours * 60.0).round() as i64;
    let tz = week_start.timezone();
    let naive = week_start.naive_local()
        + Duration::days(day_index as i64)
        + Duration::minutes(minutes);

    local_to_tz(&naive, tz).map(|dt| dt.with_timezone(&Utc))
}

/// Which day of the anchored week `instant` falls on (0 = Monday).
///
/// Returns `None` for instants before the week start or on/after the
/// following Monday.
pub fn day_index_of(week_start: DateTime<Tz>, instant: DateTime<Utc>) -> Option<usize> {
    let local = instant.with_timezone(&week_start.timezone());
    let days = (local.date_naive() - week_start.date_naive()).num_days();
    if instant < week_start.with_timezone(&Utc) {
        return None;
    }
    usize::try_from(days).ok().filter(|&d| d < DAYS_PER_WEEK)
}

/// Fractional local hour-of-day of `instant` in `tz`.
pub fn hours_of_day(instant: DateTime<Utc>, tz: Tz) -> f64 {
    let local = instant.with_timezone(&tz);
    f64::from(local.num_seconds_from_midnight()) / 3600.0
}

/// Parse an IANA timezone name into `Tz`.
///
/// # Errors
///
/// Returns [`MatchError::InvalidTimezone`] for unknown names.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| MatchError::InvalidTimezone(format!("'{}'", s)))
}

/// Resolve a local wall-clock time in `tz`, rejecting gaps and folds.
pub(crate) fn local_to_tz(naive: &NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(naive).single().ok_or_else(|| {
        MatchError::InvalidDatetime(format!("'{}' does not exist unambiguously in {}", naive, tz))
    })
}
