//! JSON request/response shapes at the service boundary.
//!
//! Timestamps cross the boundary as ISO-8601 strings. Inbound strings may
//! carry an offset (RFC 3339) or be naive local datetimes, which are read in
//! the configured timezone. Outbound strings are always RFC 3339 in UTC.
//! Durations go out as decimal hours.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MatchError, Result};
use crate::games::GamePreferenceList;
use crate::interval::{AvailabilitySet, TimeInterval};
use crate::overlap::{resolve, OverlapCandidate, Participant, Resolution, ResolveOptions};
use crate::proposal::SessionProposal;
use crate::week::local_to_tz;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a boundary timestamp into an instant.
///
/// # Errors
///
/// Returns [`MatchError::InvalidDatetime`] if the string is neither RFC 3339
/// nor a naive ISO-8601 datetime, or if the naive time does not exist in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| MatchError::InvalidDatetime(format!("'{}'", s)))?;
    local_to_tz(&naive, tz).map(|dt| dt.with_timezone(&Utc))
}

/// Format an instant the way every response carries it.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ── Inbound ─────────────────────────────────────────────────────────────────

/// One stored availability slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub start: String,
    pub end: String,
}

impl From<&TimeInterval> for SlotRecord {
    fn from(interval: &TimeInterval) -> Self {
        SlotRecord {
            start: format_timestamp(interval.start()),
            end: format_timestamp(interval.end()),
        }
    }
}

/// Parse slot records into intervals.
///
/// Records whose end is not after their start are dropped, not rejected.
///
/// # Errors
///
/// Returns [`MatchError::InvalidDatetime`] for the first malformed timestamp.
pub fn intervals_from_records(records: &[SlotRecord], tz: Tz) -> Result<Vec<TimeInterval>> {
    let mut intervals = Vec::with_capacity(records.len());
    for record in records {
        let start = parse_timestamp(&record.start, tz)?;
        let end = parse_timestamp(&record.end, tz)?;
        match TimeInterval::new(start, end) {
            Ok(interval) => intervals.push(interval),
            Err(e) => debug!(start = %record.start, end = %record.end, "dropping slot: {e}"),
        }
    }
    Ok(intervals)
}

/// Parse and normalize slot records into an [`AvailabilitySet`].
pub fn availability_from_records(
    records: &[SlotRecord],
    options: &ResolveOptions,
) -> Result<AvailabilitySet> {
    let intervals = intervals_from_records(records, options.timezone)?;
    Ok(AvailabilitySet::new(&intervals, options.granularity, options.timezone))
}

/// A user as fetched by the data-access collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
    #[serde(default)]
    pub games: GamePreferenceList,
}

impl UserRecord {
    pub fn to_participant(&self, options: &ResolveOptions) -> Result<Participant> {
        Ok(Participant::new(
            availability_from_records(&self.slots, options)?,
            self.games.clone(),
        ))
    }

    /// Name for display; the user ID when no name is set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.user_id)
    }
}

/// Body of a find-slots request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub user1: UserRecord,
    pub user2: UserRecord,
}

impl ResolveRequest {
    /// Build both participants and run [`resolve`].
    pub fn resolve(&self, options: &ResolveOptions) -> Result<Resolution> {
        let user1 = self.user1.to_participant(options)?;
        let user2 = self.user2.to_participant(options)?;
        Ok(resolve(&user1, &user2, options))
    }
}

// ── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateView {
    pub start: String,
    pub end: String,
    /// Hours, as a decimal.
    pub duration: f64,
}

impl From<&OverlapCandidate> for CandidateView {
    fn from(candidate: &OverlapCandidate) -> Self {
        CandidateView {
            start: format_timestamp(candidate.start()),
            end: format_timestamp(candidate.end()),
            duration: candidate.duration_hours(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionView {
    pub overlaps: Vec<CandidateView>,
    pub best_slot: Option<CandidateView>,
    pub common_games: Vec<String>,
    pub suggested_game: Option<String>,
}

impl From<&Resolution> for ResolutionView {
    fn from(resolution: &Resolution) -> Self {
        ResolutionView {
            overlaps: resolution.candidates.iter().map(CandidateView::from).collect(),
            best_slot: resolution.best_match().map(CandidateView::from),
            common_games: resolution.common_games.clone(),
            suggested_game: resolution.suggested_game.clone(),
        }
    }
}

/// A proposal plus the message the notifier would post for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    pub user1_id: String,
    pub user2_id: String,
    pub slot: SlotRecord,
    pub game: Option<String>,
    pub message: String,
}

impl ProposalView {
    pub fn new(
        proposal: &SessionProposal,
        user1_name: Option<&str>,
        user2_name: Option<&str>,
    ) -> Self {
        ProposalView {
            user1_id: proposal.user1.clone(),
            user2_id: proposal.user2.clone(),
            slot: SlotRecord::from(&proposal.slot),
            game: proposal.suggested_game.clone(),
            message: proposal.notification_message(user1_name, user2_name),
        }
    }
}
