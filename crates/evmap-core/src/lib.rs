//! evmap-core - Core types for live charging station availability
//!
//! This crate provides the pieces every availability source shares:
//! the canonical chargepoint model, plug-type canonicalization, the
//! chargepoint matcher that reconciles a network's raw connector list
//! with the canonical one, and the `AvailabilityDetector` trait that
//! network adapters implement.

pub mod detector;
pub mod error;
pub mod geo;
pub mod matcher;
pub mod models;
pub mod plug;

pub use detector::{
    corresponding_chargepoint, resolve_statuses, AvailabilityDetector, SEARCH_RADIUS_M,
};
pub use error::{DetectorError, DetectorResult, MatchError, MatchResult};
pub use matcher::{match_chargepoints, ChargepointMatch};
pub use models::*;
