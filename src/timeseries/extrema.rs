//! # Extremum and threshold searches
//!
//! Locate maneuver onsets inside a [`TimeSeries`]:
//!
//! * [`find_extremum`] – first local maximum/minimum of a given order inside a time window
//!   (e.g. the roll peak when the aircraft banks into a circle).
//! * [`find_first_value`] – first sample, walking away from an anchor, whose value lies within
//!   a margin of a target (e.g. the roll back below a threshold after a turn).
//!
//! Both return **global** indices into the full series.
//!
//! Direction semantics
//! -----------------
//! The forward search returns the first match at or after the anchor. The backward search
//! returns the last match strictly before the anchor, i.e. the match closest to the anchor.
//! Onset/offset pairs are built from this asymmetry, so it must not be "fixed".
use itertools::Itertools;
use tracing::debug;

use crate::{
    constants::UnixTime,
    flightphase_errors::FlightPhaseError,
    timeseries::TimeSeries,
};

/// Kind of local extremum searched by [`find_extremum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Max,
    Min,
}

/// Direction of a [`find_first_value`] scan relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    fn as_str(&self) -> &'static str {
        match self {
            SearchDirection::Forward => "after",
            SearchDirection::Backward => "before",
        }
    }
}

/// Search the first local extremum of `order` of a channel within `[start, end]`.
///
/// A sample at window position `i`, with `order <= i < len - order`, is a local maximum
/// when it is strictly greater than the `order` samples on each side of it (strictly
/// smaller for a minimum). When several samples qualify, the earliest one wins.
///
/// Arguments
/// ---------
/// * `series`: the time series
/// * `channel`: the channel name
/// * `start`, `end`: inclusive time bounds of the search window
/// * `order`: number of neighbours on each side, at least 1
/// * `kind`: maximum or minimum
///
/// Return
/// ------
/// * the global index of the extremum, or [`FlightPhaseError::NoExtremumFound`] when the
///   window holds fewer than `2 * order + 1` samples or none qualifies
pub fn find_extremum(
    series: &TimeSeries,
    channel: &str,
    start: UnixTime,
    end: UnixTime,
    order: usize,
    kind: ExtremumKind,
) -> Result<usize, FlightPhaseError> {
    if order == 0 {
        return Err(FlightPhaseError::InvalidParameter(
            "extremum order must be >= 1".into(),
        ));
    }

    let window = series.slice(start, end);
    let values = window.channel(channel)?;

    let not_found = || FlightPhaseError::NoExtremumFound {
        channel: channel.to_string(),
        order,
        start,
        end,
    };

    let span = order
        .checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(not_found)?;
    if values.len() < span {
        return Err(not_found());
    }

    let beats = |candidate: f64, neighbour: f64| match kind {
        ExtremumKind::Max => candidate > neighbour,
        ExtremumKind::Min => candidate < neighbour,
    };

    let local = (order..values.len() - order)
        .find(|&i| {
            let v = values[i];
            values[i - order..i]
                .iter()
                .chain(&values[i + 1..=i + order])
                .all(|&n| beats(v, n))
        })
        .ok_or_else(not_found)?;

    let index = window.to_global(local);
    debug!(channel, ?kind, order, index, "found local extremum");
    Ok(index)
}

/// Search a value of a channel within a margin, walking away from an anchor index.
///
/// * [`SearchDirection::Forward`] scans indices `>= anchor` and returns the first one with
///   `|channel[i] - value| < margin`.
/// * [`SearchDirection::Backward`] scans indices `< anchor` and returns the last one
///   satisfying the same condition, i.e. the match closest to the anchor.
///
/// Return
/// ------
/// * the global index of the match, or [`FlightPhaseError::ValueNotFound`]
pub fn find_first_value(
    series: &TimeSeries,
    channel: &str,
    anchor: usize,
    value: f64,
    margin: f64,
    direction: SearchDirection,
) -> Result<usize, FlightPhaseError> {
    let values = series.channel(channel)?;
    let within = |v: &f64| (v - value).abs() < margin;

    let found = match direction {
        SearchDirection::Forward => values
            .iter()
            .skip(anchor)
            .position(within)
            .map(|offset| anchor + offset),
        SearchDirection::Backward => values
            .iter()
            .take(anchor)
            .positions(within)
            .last(),
    };

    let index = found.ok_or_else(|| FlightPhaseError::ValueNotFound {
        channel: channel.to_string(),
        value,
        margin,
        anchor,
        direction: direction.as_str(),
    })?;
    debug!(channel, anchor, ?direction, index, "found value within margin");
    Ok(index)
}
