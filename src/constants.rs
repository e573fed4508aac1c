//! # Constants and type definitions for flightphase
//!
//! This module centralizes the **policy constants**, **channel names**, and **common type
//! definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Time units and fixed search horizons
//! - Names of the instrument channels the searches and summaries read
//! - Core type aliases used across the crate
//! - The dropsonde quality flag and the per-flag id mapping carried by segments

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::flightphase_errors::FlightPhaseError;

// -------------------------------------------------------------------------------------------------
// Time units and policy constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Maximum duration of a circling maneuver. The circle boundary searches never look
/// further than this away from the known boundary.
pub const CIRCLE_SEARCH_HORIZON: Seconds = SECONDS_PER_HOUR;

/// Nominal delay between the start of a circle and its first dropsonde launch
pub const FIRST_SONDE_OFFSET: Seconds = 60.0;

/// Accepted deviation from [`FIRST_SONDE_OFFSET`]
pub const FIRST_SONDE_TOLERANCE: Seconds = 0.75;

/// Platform assumed when a flight description does not name one
pub const DEFAULT_PLATFORM: &str = "HALO";

/// Width of the context bands shown before and after a segment
pub const SEGMENT_BORDER: Seconds = 3.0 * SECONDS_PER_MINUTE;

// -------------------------------------------------------------------------------------------------
// Channel names
// -------------------------------------------------------------------------------------------------

pub const ROLL: &str = "roll";
pub const PITCH: &str = "pitch";
pub const HEADING: &str = "heading";
pub const ALTITUDE: &str = "altitude";
pub const LATITUDE: &str = "lat";
pub const LONGITUDE: &str = "lon";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Seconds since 1970-01-01 00:00:00 UTC
pub type UnixTime = f64;
/// Duration in seconds
pub type Seconds = f64;
/// Angle in degrees
pub type Degree = f64;
/// Identifier of a dropsonde in the sonde catalogue
pub type SondeId = String;

/// Sonde ids of one segment, grouped by quality flag.
pub type SondesByFlag = BTreeMap<SondeFlag, Vec<SondeId>>;

// -------------------------------------------------------------------------------------------------
// Sonde flag
// -------------------------------------------------------------------------------------------------

/// Quality flag assigned to a dropsonde by the sonde catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SondeFlag {
    Good,
    Bad,
    Ugly,
}

impl SondeFlag {
    /// All flags, in catalogue order.
    pub const ALL: [SondeFlag; 3] = [SondeFlag::Good, SondeFlag::Bad, SondeFlag::Ugly];

    pub fn as_str(&self) -> &'static str {
        match self {
            SondeFlag::Good => "GOOD",
            SondeFlag::Bad => "BAD",
            SondeFlag::Ugly => "UGLY",
        }
    }
}

impl std::fmt::Display for SondeFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SondeFlag {
    type Err = FlightPhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "GOOD" => Ok(SondeFlag::Good),
            "BAD" => Ok(SondeFlag::Bad),
            "UGLY" => Ok(SondeFlag::Ugly),
            other => Err(FlightPhaseError::InvalidSondeFlag(other.to_string())),
        }
    }
}
