//! Free time derived from busy calendar events.
//!
//! A linked calendar yields busy events; the gaps between them inside a
//! lookahead window become availability. Fetching the events is the caller's
//! job.

use chrono::Duration;
use tracing::debug;

use crate::interval::TimeInterval;

/// Gaps shorter than this are not worth offering when importing a calendar.
pub fn default_min_free() -> Duration {
    Duration::hours(1)
}

/// Free slots inside `window` that no busy event touches.
///
/// Events may arrive unsorted and may overlap each other. Each event is
/// clipped to the window; the cursor only moves forward, so an event nested
/// inside an earlier one never reopens time. Gaps shorter than
/// `min_duration` are dropped.
pub fn find_free_slots(
    busy: &[TimeInterval],
    window: TimeInterval,
    min_duration: Duration,
) -> Vec<TimeInterval> {
    let mut events: Vec<&TimeInterval> = busy
        .iter()
        .filter(|event| event.end() > window.start() && event.start() < window.end())
        .collect();
    events.sort_unstable();

    let mut free = Vec::with_capacity(events.len() + 1);
    let mut cursor = window.start();

    for event in events {
        if cursor < event.start() {
            free.extend(TimeInterval::new(cursor, event.start()).ok());
        }
        cursor = cursor.max(event.end());
        if cursor >= window.end() {
            break;
        }
    }

    if cursor < window.end() {
        free.extend(TimeInterval::new(cursor, window.end()).ok());
    }

    let gaps = free.len();
    free.retain(|slot| slot.duration() >= min_duration);
    debug!(
        busy = busy.len(),
        gaps,
        kept = free.len(),
        "derived free slots from busy events"
    );
    free
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16 + day, h, m, 0).unwrap()
    }

    fn iv(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeInterval {
        TimeInterval::new(start, end).unwrap()
    }

    fn day_window() -> TimeInterval {
        iv(at(0, 8, 0), at(0, 22, 0))
    }

    #[test]
    fn test_no_events_whole_window_is_free() {
        assert_eq!(
            find_free_slots(&[], day_window(), default_min_free()),
            vec![day_window()]
        );
    }

    #[test]
    fn test_gaps_between_events() {
        let busy = vec![iv(at(0, 12, 0), at(0, 13, 0)), iv(at(0, 9, 0), at(0, 10, 0))];
        assert_eq!(
            find_free_slots(&busy, day_window(), default_min_free()),
            vec![
                iv(at(0, 10, 0), at(0, 12, 0)),
                iv(at(0, 13, 0), at(0, 22, 0)),
            ]
        );
    }

    #[test]
    fn test_short_gaps_dropped() {
        let busy = vec![iv(at(0, 8, 30), at(0, 10, 0)), iv(at(0, 10, 45), at(0, 21, 30))];
        assert!(find_free_slots(&busy, day_window(), default_min_free()).is_empty());

        let all = find_free_slots(&busy, day_window(), Duration::zero());
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_nested_event_does_not_reopen_time() {
        let busy = vec![iv(at(0, 9, 0), at(0, 18, 0)), iv(at(0, 10, 0), at(0, 11, 0))];
        assert_eq!(
            find_free_slots(&busy, day_window(), default_min_free()),
            vec![iv(at(0, 8, 0), at(0, 9, 0)), iv(at(0, 18, 0), at(0, 22, 0))]
        );
    }

    #[test]
    fn test_events_clipped_to_window() {
        let busy = vec![
            iv(at(0, 6, 0), at(0, 9, 0)),
            iv(at(0, 20, 0), at(1, 2, 0)),
            iv(at(2, 10, 0), at(2, 11, 0)),
        ];
        assert_eq!(
            find_free_slots(&busy, day_window(), default_min_free()),
            vec![iv(at(0, 9, 0), at(0, 20, 0))]
        );
    }

    #[test]
    fn test_event_covering_window_leaves_nothing() {
        let busy = vec![iv(at(0, 0, 0), at(1, 0, 0))];
        assert!(find_free_slots(&busy, day_window(), Duration::zero()).is_empty());
    }
}
