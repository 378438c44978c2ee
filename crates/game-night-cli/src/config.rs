use anyhow::{Context, Result};
use overlap_engine::{RankingPolicy, ResolverConfig};
use serde::Deserialize;
use std::path::Path;

/// Contents of a `--config` file.
///
/// ```toml
/// [resolver]
/// granularity_minutes = 30
/// min_session_minutes = 60
/// ranking = "evening_first"
/// timezone = "Europe/Berlin"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Command-line values that win over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub granularity_minutes: Option<u32>,
    pub min_session_minutes: Option<u32>,
    pub ranking: Option<RankingPolicy>,
    pub timezone: Option<String>,
}

/// Load settings from `path`, or defaults when no file was given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

impl Config {
    pub fn with_overrides(self, overrides: Overrides) -> ResolverConfig {
        let mut resolver = self.resolver;
        if let Some(minutes) = overrides.granularity_minutes {
            resolver.granularity_minutes = minutes;
        }
        if let Some(minutes) = overrides.min_session_minutes {
            resolver.min_session_minutes = minutes;
        }
        if let Some(ranking) = overrides.ranking {
            resolver.ranking = ranking;
        }
        if let Some(timezone) = overrides.timezone {
            resolver.timezone = timezone;
        }
        resolver
    }
}
