//! # overlap-engine
//!
//! Availability overlap resolution for scheduling shared gaming sessions.
//!
//! Two users each declare when they are free and which games they like. The
//! engine normalizes each user's availability onto a fixed time grid, finds
//! the windows both users share, ranks them, and suggests a game both enjoy.
//!
//! ## Modules
//!
//! - [`interval`] — half-open intervals, granularity snapping, normalization
//! - [`games`] — ordered game preference lists and their intersection
//! - [`overlap`] — two-pointer overlap sweep, ranking, suggested game
//! - [`week`] — Monday-anchored weeks and grid position → instant conversion
//! - [`grid`] — block construction rules and the drag/resize state machine
//! - [`freebusy`] — free slots derived from busy calendar events
//! - [`proposal`] — session proposals and their notification text
//! - [`config`] — serializable resolver settings
//! - [`wire`] — JSON request/response shapes
//! - [`error`] — Error types

pub mod config;
pub mod error;
pub mod freebusy;
pub mod games;
pub mod grid;
pub mod interval;
pub mod overlap;
pub mod proposal;
pub mod week;
pub mod wire;

pub use config::ResolverConfig;
pub use error::MatchError;
pub use freebusy::{default_min_free, find_free_slots};
pub use games::GamePreferenceList;
pub use grid::{Block, Edge, GridEditor};
pub use interval::{normalize, snap, AvailabilitySet, Granularity, TimeInterval};
pub use overlap::{
    find_overlaps, rank, resolve, time_of_day_score, OverlapCandidate, Participant,
    RankingPolicy, Resolution, ResolveOptions,
};
pub use proposal::SessionProposal;
pub use week::{day_index_of, day_offset, parse_timezone, week_start};
pub use wire::{
    CandidateView, ProposalView, ResolutionView, ResolveRequest, SlotRecord, UserRecord,
};
