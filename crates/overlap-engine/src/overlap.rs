//! Overlap resolution between two users' availability.
//!
//! [`find_overlaps`] walks two normalized sets with one pointer each, the
//! classic interval-intersection merge, so the cost is `O(n + m)`.
//! [`resolve`] adds the minimum-duration filter, the ranking policy, and the
//! shared-game suggestion on top.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MatchError;
use crate::games::GamePreferenceList;
use crate::interval::{AvailabilitySet, Granularity, TimeInterval};

// ── Options ─────────────────────────────────────────────────────────────────

/// How candidates are ordered. The first candidate is the best match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Duration descending, then earliest start.
    #[default]
    LongestFirst,
    /// Time-of-day preference (evening > afternoon > morning > night) in the
    /// configured timezone, then duration descending, then earliest start.
    EveningFirst,
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingPolicy::LongestFirst => f.write_str("longest_first"),
            RankingPolicy::EveningFirst => f.write_str("evening_first"),
        }
    }
}

impl FromStr for RankingPolicy {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "longest_first" | "longest" => Ok(RankingPolicy::LongestFirst),
            "evening_first" | "evening" => Ok(RankingPolicy::EveningFirst),
            other => Err(MatchError::InvalidConfig(format!(
                "unknown ranking policy '{other}'"
            ))),
        }
    }
}

/// Options for [`resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    /// Granularity used when building availability sets for a request.
    pub granularity: Granularity,
    /// Candidates shorter than this are dropped. Zero keeps everything.
    pub min_session: Duration,
    pub ranking: RankingPolicy,
    /// Timezone for time-of-day scoring and for naive wire timestamps.
    pub timezone: Tz,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            granularity: Granularity::default(),
            min_session: Duration::zero(),
            ranking: RankingPolicy::default(),
            timezone: Tz::UTC,
        }
    }
}

// ── Candidates ──────────────────────────────────────────────────────────────

/// A window where both users are free. Recomputed on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapCandidate {
    slot: TimeInterval,
}

impl OverlapCandidate {
    pub fn start(&self) -> DateTime<Utc> {
        self.slot.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.slot.end()
    }

    pub fn duration(&self) -> Duration {
        self.slot.duration()
    }

    pub fn slot(&self) -> TimeInterval {
        self.slot
    }

    /// Duration in hours as a decimal, the unit the UI displays.
    pub fn duration_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }
}

/// Every non-empty intersection of two normalized sets, in start order.
///
/// Whichever interval ends first is advanced; when both end together both
/// advance. An empty set on either side yields no candidates.
pub fn find_overlaps(a: &AvailabilitySet, b: &AvailabilitySet) -> Vec<OverlapCandidate> {
    let (a, b) = (a.intervals(), b.intervals());
    let mut candidates = Vec::with_capacity(a.len() + b.len());

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if let Some(slot) = a[i].intersection(&b[j]) {
            candidates.push(OverlapCandidate { slot });
        }

        match a[i].end().cmp(&b[j].end()) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }

    candidates
}

/// Preference score for a session starting at `start`, read in `tz`.
///
/// Evening (18–23) scores 4, afternoon (12–18) 3, morning (6–12) 2, and
/// everything else 1.
pub fn time_of_day_score(start: DateTime<Utc>, tz: Tz) -> u8 {
    match start.with_timezone(&tz).hour() {
        18..=22 => 4,
        12..=17 => 3,
        6..=11 => 2,
        _ => 1,
    }
}

/// Sort candidates in place according to `options.ranking`.
pub fn rank(candidates: &mut [OverlapCandidate], options: &ResolveOptions) {
    let longest_first = |a: &OverlapCandidate, b: &OverlapCandidate| {
        b.duration()
            .cmp(&a.duration())
            .then_with(|| a.start().cmp(&b.start()))
    };

    match options.ranking {
        RankingPolicy::LongestFirst => candidates.sort_by(longest_first),
        RankingPolicy::EveningFirst => {
            let tz = options.timezone;
            candidates.sort_by(|a, b| {
                time_of_day_score(b.start(), tz)
                    .cmp(&time_of_day_score(a.start(), tz))
                    .then_with(|| longest_first(a, b))
            });
        }
    }
}

// ── resolve ─────────────────────────────────────────────────────────────────

/// One side of a resolution request: a user's availability and games.
///
/// A user with no availability on record is represented by an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participant {
    pub availability: AvailabilitySet,
    pub games: GamePreferenceList,
}

impl Participant {
    pub fn new(availability: AvailabilitySet, games: GamePreferenceList) -> Self {
        Participant {
            availability,
            games,
        }
    }
}

/// The ranked candidates for a pair of users plus a shared-game suggestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub candidates: Vec<OverlapCandidate>,
    /// Games both users list, in user1's order.
    pub common_games: Vec<String>,
    /// First of `common_games`, applying to every candidate.
    pub suggested_game: Option<String>,
}

impl Resolution {
    /// The top-ranked candidate, the only one offered for one-click scheduling.
    pub fn best_match(&self) -> Option<&OverlapCandidate> {
        self.candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Compute ranked overlap candidates and a suggested game for two users.
///
/// Both availability sets must already be normalized, which
/// [`AvailabilitySet`] guarantees. Never fails: no overlap, an empty side, or
/// no shared game are all ordinary results.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use chrono_tz::Tz;
/// use overlap_engine::{
///     resolve, AvailabilitySet, GamePreferenceList, Granularity, Participant,
///     ResolveOptions, TimeInterval,
/// };
///
/// let slot = |h1, h2| {
///     TimeInterval::new(
///         Utc.with_ymd_and_hms(2026, 3, 16, h1, 0, 0).unwrap(),
///         Utc.with_ymd_and_hms(2026, 3, 16, h2, 0, 0).unwrap(),
///     )
///     .unwrap()
/// };
///
/// let alice = Participant::new(
///     AvailabilitySet::new(&[slot(18, 22)], Granularity::default(), Tz::UTC),
///     ["Chess", "Tetris"].into_iter().collect::<GamePreferenceList>(),
/// );
/// let bob = Participant::new(
///     AvailabilitySet::new(&[slot(20, 23)], Granularity::default(), Tz::UTC),
///     ["Tetris"].into_iter().collect::<GamePreferenceList>(),
/// );
///
/// let resolution = resolve(&alice, &bob, &ResolveOptions::default());
/// assert_eq!(resolution.best_match().unwrap().duration_hours(), 2.0);
/// assert_eq!(resolution.suggested_game.as_deref(), Some("Tetris"));
/// ```
pub fn resolve(user1: &Participant, user2: &Participant, options: &ResolveOptions) -> Resolution {
    let common_games = user1.games.common_with(&user2.games);
    let suggested_game = common_games.first().cloned();

    if user1.availability.is_empty() || user2.availability.is_empty() {
        debug!("one side has no availability; no candidates");
        return Resolution {
            candidates: Vec::new(),
            common_games,
            suggested_game,
        };
    }

    let mut candidates = find_overlaps(&user1.availability, &user2.availability);
    let found = candidates.len();

    candidates.retain(|c| c.duration() >= options.min_session);
    rank(&mut candidates, options);

    debug!(
        found,
        kept = candidates.len(),
        ranking = %options.ranking,
        suggested = suggested_game.as_deref().unwrap_or("-"),
        "resolved overlap candidates"
    );

    Resolution {
        candidates,
        common_games,
        suggested_game,
    }
}
