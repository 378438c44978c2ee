//! Serializable resolver settings.
//!
//! [`ResolverConfig`] is the on-disk / on-wire shape (plain minutes and
//! names); [`ResolverConfig::into_options`] validates it into the typed
//! [`ResolveOptions`] the resolver takes.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::interval::{Granularity, DEFAULT_GRANULARITY_MINUTES};
use crate::overlap::{RankingPolicy, ResolveOptions};
use crate::week::parse_timezone;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Snapping step for interval endpoints.
    pub granularity_minutes: u32,
    /// Shortest candidate kept; 0 keeps everything.
    pub min_session_minutes: u32,
    pub ranking: RankingPolicy,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            min_session_minutes: 0,
            ranking: RankingPolicy::default(),
            timezone: "UTC".to_string(),
        }
    }
}

impl ResolverConfig {
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidConfig`] wrapping the granularity or
    /// timezone problem.
    pub fn into_options(self) -> Result<ResolveOptions> {
        let granularity = Granularity::new(self.granularity_minutes)
            .map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        let timezone =
            parse_timezone(&self.timezone).map_err(|e| MatchError::InvalidConfig(e.to_string()))?;

        Ok(ResolveOptions {
            granularity,
            min_session: Duration::minutes(i64::from(self.min_session_minutes)),
            ranking: self.ranking,
            timezone,
        })
    }
}
