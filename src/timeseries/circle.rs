//! # Circle boundary resolution
//!
//! A circling maneuver starts and ends on the same aircraft heading: after a full loop the
//! aircraft is back on its original course. Given one known boundary of a circle, the
//! opposite boundary is the sample within [`CIRCLE_SEARCH_HORIZON`] whose heading is
//! closest to the heading at the known boundary.
//!
//! * [`CircleResolver::exit_given_entry`] searches the window `(b, b + 1 h]`, earliest best
//!   match wins.
//! * [`CircleResolver::entry_given_exit`] searches `[b - 1 h, b)` from `b - 1` backward, the
//!   best match closest to `b` wins.
//!
//! Heading comparison
//! -----------------
//! The historical comparison is a plain absolute difference of degrees, which treats 359°
//! and 1° as 358° apart. [`HeadingComparison::Legacy`] keeps that behaviour so existing
//! boundary tables reproduce; [`HeadingComparison::Wraparound`] uses the shortest angular
//! distance instead and is the right choice for circles entered close to due north.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{Degree, CIRCLE_SEARCH_HORIZON, HEADING},
    flightphase_errors::FlightPhaseError,
    timeseries::TimeSeries,
};

/// How two headings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingComparison {
    /// `|a - b|`, without handling the 0°/360° discontinuity
    #[default]
    Legacy,
    /// Shortest angular distance, in `[0, 180]`
    Wraparound,
}

impl HeadingComparison {
    /// Distance between two headings in degrees
    pub fn distance(&self, a: Degree, b: Degree) -> Degree {
        match self {
            HeadingComparison::Legacy => (a - b).abs(),
            HeadingComparison::Wraparound => {
                let d = (a - b).rem_euclid(360.0);
                d.min(360.0 - d)
            }
        }
    }

    /// Signed heading change from `from` to `to`.
    ///
    /// `Legacy` returns the raw difference; `Wraparound` maps it to `(-180, 180]`.
    pub fn delta(&self, from: Degree, to: Degree) -> Degree {
        match self {
            HeadingComparison::Legacy => to - from,
            HeadingComparison::Wraparound => {
                let d = (to - from).rem_euclid(360.0);
                if d > 180.0 {
                    d - 360.0
                } else {
                    d
                }
            }
        }
    }
}

/// Resolve the matching boundary of a circle from the heading channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircleResolver {
    comparison: HeadingComparison,
}

impl CircleResolver {
    pub fn new(comparison: HeadingComparison) -> Self {
        CircleResolver { comparison }
    }

    pub fn comparison(&self) -> HeadingComparison {
        self.comparison
    }

    /// Find the exit of a circle given its entry index
    ///
    /// Arguments
    /// ---------
    /// * `series`: a time series with a `heading` channel
    /// * `entry`: the index of the circle entry
    ///
    /// Return
    /// ------
    /// * the index, strictly after `entry` and timestamped at most one hour later, whose
    ///   heading is the closest to the heading at `entry`; ties resolve to the earliest index
    pub fn exit_given_entry(
        &self,
        series: &TimeSeries,
        entry: usize,
    ) -> Result<usize, FlightPhaseError> {
        let headings = series.channel(HEADING)?;
        let reference = *headings.get(entry).ok_or(FlightPhaseError::IndexOutOfBounds {
            index: entry,
            len: series.len(),
        })?;
        let time = series.time();
        let limit = time[entry] + CIRCLE_SEARCH_HORIZON;
        let upper = time.partition_point(|&t| t <= limit);

        let exit = self
            .closest(reference, (entry + 1..upper).map(|i| (i, headings[i])))
            .ok_or(FlightPhaseError::NoMatchingHeading {
                boundary: entry,
                horizon: CIRCLE_SEARCH_HORIZON,
            })?;
        debug!(entry, exit, comparison = ?self.comparison, "resolved circle exit");
        Ok(exit)
    }

    /// Find the entry of a circle given its exit index
    ///
    /// Return
    /// ------
    /// * the index, strictly before `exit` and timestamped at most one hour earlier, whose
    ///   heading is the closest to the heading at `exit`; ties resolve to the index closest
    ///   to `exit`
    pub fn entry_given_exit(
        &self,
        series: &TimeSeries,
        exit: usize,
    ) -> Result<usize, FlightPhaseError> {
        let headings = series.channel(HEADING)?;
        let reference = *headings.get(exit).ok_or(FlightPhaseError::IndexOutOfBounds {
            index: exit,
            len: series.len(),
        })?;
        let time = series.time();
        let limit = time[exit] - CIRCLE_SEARCH_HORIZON;
        let lower = time.partition_point(|&t| t < limit);

        let entry = self
            .closest(reference, (lower..exit).rev().map(|i| (i, headings[i])))
            .ok_or(FlightPhaseError::NoMatchingHeading {
                boundary: exit,
                horizon: CIRCLE_SEARCH_HORIZON,
            })?;
        debug!(exit, entry, comparison = ?self.comparison, "resolved circle entry");
        Ok(entry)
    }

    /// First candidate, in iteration order, with the smallest heading distance
    fn closest(
        &self,
        reference: Degree,
        candidates: impl Iterator<Item = (usize, Degree)>,
    ) -> Option<usize> {
        let mut best: Option<(usize, Degree)> = None;
        for (index, heading) in candidates {
            let distance = self.comparison.distance(heading, reference);
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }
}
