//! Half-open availability intervals and their canonical form.
//!
//! A user's availability is stored as an [`AvailabilitySet`]: intervals
//! snapped to a fixed [`Granularity`] of the user's local time of day,
//! sorted, and merged wherever they touch or overlap. Every set the resolver sees has been through [`normalize`], so
//! the overlap sweep can rely on that shape without re-checking it.

use chrono::{DateTime, Duration, Offset, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{MatchError, Result};

/// Default snapping granularity, in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ── Granularity ─────────────────────────────────────────────────────────────

/// The step that interval endpoints are snapped to.
///
/// Must be positive and divide a day evenly, so that every local day starts
/// on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Granularity(u32);

impl Granularity {
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidGranularity`] for zero, or for a step
    /// that does not divide 1440 minutes.
    pub fn new(minutes: u32) -> Result<Self> {
        if minutes == 0 || MINUTES_PER_DAY % minutes != 0 {
            return Err(MatchError::InvalidGranularity(format!(
                "{minutes} minutes does not evenly divide a day"
            )));
        }
        Ok(Granularity(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity(DEFAULT_GRANULARITY_MINUTES)
    }
}

/// Round the time of day of `time`, read in `tz`, to the nearest multiple of
/// `granularity`, half-up.
///
/// Sub-second components take part in the rounding: 10:14:59.999 snaps down
/// to 10:00 at 30-minute granularity, 10:15:00 snaps up to 10:30. The UTC
/// offset in effect at `time` decides the local grid, so a zone such as
/// Asia/Kathmandu (+05:45) keeps its local half hours.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use chrono_tz::Tz;
/// use overlap_engine::interval::{snap, Granularity};
///
/// let t = Utc.with_ymd_and_hms(2026, 3, 16, 10, 15, 0).unwrap();
/// let snapped = snap(t, Granularity::default(), Tz::UTC);
/// assert_eq!(snapped, Utc.with_ymd_and_hms(2026, 3, 16, 10, 30, 0).unwrap());
///
/// // 20:00 in Kathmandu is already on the local grid.
/// let t = Utc.with_ymd_and_hms(2026, 3, 16, 14, 15, 0).unwrap();
/// assert_eq!(snap(t, Granularity::default(), Tz::Asia__Kathmandu), t);
/// ```
pub fn snap(time: DateTime<Utc>, granularity: Granularity, tz: Tz) -> DateTime<Utc> {
    let step_seconds = i64::from(granularity.minutes()) * 60;
    let step_nanos = step_seconds * NANOS_PER_SECOND;

    let offset = i64::from(time.with_timezone(&tz).offset().fix().local_minus_utc());
    let local_seconds = time.timestamp() + offset;

    let rem_nanos = local_seconds.rem_euclid(step_seconds) * NANOS_PER_SECOND
        + i64::from(time.timestamp_subsec_nanos());

    let floor = time
        .checked_sub_signed(Duration::nanoseconds(rem_nanos))
        .unwrap_or(time);

    if rem_nanos * 2 >= step_nanos {
        floor
            .checked_add_signed(granularity.as_duration())
            .unwrap_or(floor)
    } else {
        floor
    }
}

// ── TimeInterval ────────────────────────────────────────────────────────────

/// A half-open `[start, end)` range of absolute instants with `start < end`.
///
/// The derived ordering compares `start` first and `end` second, which is
/// exactly the order the normalizer sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidInterval`] when `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(MatchError::InvalidInterval(format!(
                "end {} is not after start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(TimeInterval { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The shared part of two intervals, if it is non-empty.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TimeInterval { start, end })
    }

    /// Both endpoints snapped; `None` if the result collapses to nothing.
    pub fn snapped(&self, granularity: Granularity, tz: Tz) -> Option<TimeInterval> {
        let start = snap(self.start, granularity, tz);
        let end = snap(self.end, granularity, tz);
        (start < end).then_some(TimeInterval { start, end })
    }
}

// ── normalize ───────────────────────────────────────────────────────────────

/// Produce the canonical form of one user's intervals.
///
/// Endpoints are snapped on the local grid of `tz`, intervals that collapse are discarded, the rest are
/// sorted by `(start, end)` and swept left to right. An interval whose start
/// is at or before the running end is folded into it, so touching intervals
/// merge as well as overlapping ones. Long intervals are never split or
/// rejected here.
pub fn normalize(
    intervals: &[TimeInterval],
    granularity: Granularity,
    tz: Tz,
) -> Vec<TimeInterval> {
    let mut snapped: Vec<TimeInterval> = intervals
        .iter()
        .filter_map(|interval| interval.snapped(granularity, tz))
        .collect();

    let dropped = intervals.len() - snapped.len();
    if dropped > 0 {
        debug!(dropped, "discarded intervals that collapsed after snapping");
    }

    snapped.sort_unstable();

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(snapped.len());
    for interval in snapped {
        match merged.last_mut() {
            Some(running) if interval.start <= running.end => {
                running.end = running.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }

    trace!(
        input = intervals.len(),
        output = merged.len(),
        "normalized availability"
    );
    merged
}

// ── AvailabilitySet ─────────────────────────────────────────────────────────

/// One user's availability in normalized form.
///
/// Only reachable through [`normalize`], so the contents are always sorted,
/// non-overlapping, and separated by real gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvailabilitySet {
    intervals: Vec<TimeInterval>,
}

impl AvailabilitySet {
    /// Normalize `intervals` on the local grid of `tz`, the owner's timezone.
    pub fn new(intervals: &[TimeInterval], granularity: Granularity, tz: Tz) -> Self {
        AvailabilitySet {
            intervals: normalize(intervals, granularity, tz),
        }
    }

    /// Replace the whole set. Saves are never applied incrementally.
    pub fn replace(&mut self, intervals: &[TimeInterval], granularity: Granularity, tz: Tz) {
        self.intervals = normalize(intervals, granularity, tz);
    }

    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeInterval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        self.intervals
            .iter()
            .fold(Duration::zero(), |acc, interval| acc + interval.duration())
    }
}

impl<'a> IntoIterator for &'a AvailabilitySet {
    type Item = &'a TimeInterval;
    type IntoIter = std::slice::Iter<'a, TimeInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
