//! Error types for overlap-engine operations.
//!
//! Data-shape problems inside the core (degenerate intervals, empty
//! availability, no shared game) are not errors. These variants cover
//! inputs that are invalid at construction or at the wire boundary.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid grid position: {0}")]
    InvalidGrid(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;
