use hifitime::Epoch;
use std::str::FromStr;

use crate::{constants::UnixTime, flightphase_errors::FlightPhaseError};

/// Transformation from a date in the format YYYY-MM-ddTHH:mm:ss (UTC) to unix time
///
/// A space is accepted in place of the `T` separator, as written by YAML dumpers.
///
/// Argument
/// --------
/// * `date`: a date in ISO 8601 format
///
/// Return
/// ------
/// * the number of seconds since 1970-01-01 00:00:00 UTC
pub fn iso_to_unix(date: &str) -> Result<UnixTime, FlightPhaseError> {
    let normalized = date.trim().replacen(' ', "T", 1);
    Epoch::from_str(&normalized)
        .map(|epoch| epoch.to_unix_seconds())
        .map_err(|_| FlightPhaseError::InvalidTimestamp(date.to_string()))
}

/// Parse a timestamp given either as a number of unix seconds or as an ISO 8601 date
pub fn parse_timestamp(raw: &str) -> Result<UnixTime, FlightPhaseError> {
    match f64::from_str(raw.trim()) {
        Ok(seconds) if seconds.is_finite() => Ok(seconds),
        _ => iso_to_unix(raw),
    }
}

/// Transformation from unix time to an [`Epoch`] in the UTC time scale
pub fn unix_to_epoch(t: UnixTime) -> Epoch {
    Epoch::from_unix_seconds(t)
}

/// Transformation from an [`Epoch`] to unix time
pub fn epoch_to_unix(epoch: &Epoch) -> UnixTime {
    epoch.to_unix_seconds()
}
