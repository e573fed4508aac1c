//! # Time series: index, channels, and windows
//!
//! The central type is [`TimeSeries`], an ordered sequence of timestamps with named numeric
//! channels aligned to it (roll, pitch, heading, altitude, latitude, longitude, …). It is built
//! once per analysis run from an external dataset and read-only afterwards.
//!
//! Modules
//! -----------------
//! * [`extrema`](crate::timeseries::extrema) – Local extremum and threshold-crossing searches.
//! * [`circle`](crate::timeseries::circle) – Heading-matched circle boundary resolution.
//!
//! Data Model
//! -----------------
//! * **Time:** `Vec<UnixTime>`, monotonically non-decreasing (duplicates tolerated).
//! * **Channels:** `HashMap<String, Vec<f64>, ahash::RandomState>`, every channel has the
//!   length of the time vector.
//! * **Window:** [`TimeWindow`] borrows a contiguous index range of the series and maps its
//!   local positions back to global indices.
//!
//! Lookups
//! -----------------
//! * [`TimeSeries::nearest_index`] – closest sample, ties resolved to the lowest index.
//! * [`TimeSeries::slice`] – inclusive `[start, end]` window, possibly empty.
//! * [`TimeSeries::offset_index`] – closest sample to `T[index] + Δt`.
//!
//! All lookups rely on the ordering of the time vector and run in logarithmic time.
use std::collections::HashMap;
use std::ops::Range;

use ahash::RandomState;
use tracing::trace;

use crate::{
    constants::{Seconds, UnixTime},
    events::SondeRecord,
    flightphase_errors::FlightPhaseError,
};

pub mod circle;
pub mod extrema;

/// Ordered timestamps with aligned numeric channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    time: Vec<UnixTime>,
    channels: HashMap<String, Vec<f64>, RandomState>,
}

impl TimeSeries {
    /// Create a new time series without any channel
    ///
    /// Arguments
    /// ---------
    /// * `time`: the timestamps, in unix seconds, monotonically non-decreasing
    ///
    /// Return
    /// ------
    /// * a new TimeSeries, or [`FlightPhaseError::NonMonotonicTime`] naming the first
    ///   timestamp that goes back in time
    pub fn new(time: Vec<UnixTime>) -> Result<Self, FlightPhaseError> {
        if let Some(pos) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(FlightPhaseError::NonMonotonicTime { index: pos + 1 });
        }
        Ok(TimeSeries {
            time,
            channels: HashMap::default(),
        })
    }

    /// Add a channel aligned with the time vector, replacing any channel of the same name
    pub fn with_channel(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, FlightPhaseError> {
        self.insert_channel(name, values)?;
        Ok(self)
    }

    /// In-place variant of [`TimeSeries::with_channel`]
    pub fn insert_channel(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), FlightPhaseError> {
        let name = name.into();
        if values.len() != self.time.len() {
            return Err(FlightPhaseError::ChannelLengthMismatch {
                name,
                expected: self.time.len(),
                actual: values.len(),
            });
        }
        self.channels.insert(name, values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[UnixTime] {
        &self.time
    }

    /// Timestamp at `index`
    pub fn time_at(&self, index: usize) -> Result<UnixTime, FlightPhaseError> {
        self.time
            .get(index)
            .copied()
            .ok_or(FlightPhaseError::IndexOutOfBounds {
                index,
                len: self.time.len(),
            })
    }

    /// Full channel by name
    pub fn channel(&self, name: &str) -> Result<&[f64], FlightPhaseError> {
        self.channels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FlightPhaseError::ChannelNotFound(name.to_string()))
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Index of the timestamp closest to `t`.
    ///
    /// Ties between two neighbours, and runs of duplicated timestamps, resolve to the
    /// lowest index, like a stable argmin over `|T - t|`.
    ///
    /// Arguments
    /// ---------
    /// * `t`: the query timestamp
    ///
    /// Return
    /// ------
    /// * the index of the closest timestamp, or [`FlightPhaseError::EmptyIndex`]
    pub fn nearest_index(&self, t: UnixTime) -> Result<usize, FlightPhaseError> {
        if self.time.is_empty() {
            return Err(FlightPhaseError::EmptyIndex);
        }

        // first index whose timestamp is >= t
        let upper = self.time.partition_point(|&x| x < t);
        if upper == 0 {
            return Ok(0);
        }

        let left_value = self.time[upper - 1];
        let left = self.time.partition_point(|&x| x < left_value);
        if upper == self.time.len() {
            return Ok(left);
        }

        let index = if t - left_value <= self.time[upper] - t {
            left
        } else {
            upper
        };
        Ok(index)
    }

    /// Index of the timestamp closest to `T[index] + dt`
    pub fn offset_index(&self, index: usize, dt: Seconds) -> Result<usize, FlightPhaseError> {
        let anchor = self.time_at(index)?;
        let offset = self.nearest_index(anchor + dt)?;
        trace!(index, dt, offset, "resolved offset index");
        Ok(offset)
    }

    /// Index of the sample `seconds` before the sample at `index`
    pub fn index_seconds_before(
        &self,
        index: usize,
        seconds: Seconds,
    ) -> Result<usize, FlightPhaseError> {
        self.offset_index(index, -seconds)
    }

    /// Index of the sample `seconds` after the sample at `index`
    pub fn index_seconds_after(
        &self,
        index: usize,
        seconds: Seconds,
    ) -> Result<usize, FlightPhaseError> {
        self.offset_index(index, seconds)
    }

    /// Index of the sample closest to the launch time of a dropsonde
    pub fn sonde_index(&self, sonde: &SondeRecord) -> Result<usize, FlightPhaseError> {
        self.nearest_index(sonde.launch_time)
    }

    /// Contiguous window of all samples with `start <= T[i] <= end`.
    ///
    /// An empty window is a valid result, e.g. for context bands reaching past the ends
    /// of the record.
    pub fn slice(&self, start: UnixTime, end: UnixTime) -> TimeWindow<'_> {
        let lower = self.time.partition_point(|&x| x < start);
        let upper = self.time.partition_point(|&x| x <= end).max(lower);
        TimeWindow {
            series: self,
            range: lower..upper,
        }
    }

    /// Window over an explicit index range, clamped to the series
    pub fn window(&self, range: Range<usize>) -> TimeWindow<'_> {
        let end = range.end.min(self.time.len());
        let start = range.start.min(end);
        TimeWindow {
            series: self,
            range: start..end,
        }
    }
}

/// A contiguous, borrowed view of a [`TimeSeries`].
#[derive(Debug, Clone)]
pub struct TimeWindow<'a> {
    series: &'a TimeSeries,
    range: Range<usize>,
}

impl<'a> TimeWindow<'a> {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Global index range of the window in the parent series
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn time(&self) -> &'a [UnixTime] {
        &self.series.time[self.range.clone()]
    }

    /// Channel values restricted to the window
    pub fn channel(&self, name: &str) -> Result<&'a [f64], FlightPhaseError> {
        Ok(&self.series.channel(name)?[self.range.clone()])
    }

    /// Global index of a position local to the window
    pub fn to_global(&self, local: usize) -> usize {
        self.range.start + local
    }

    /// First and last value of a channel in the window
    pub fn endpoints(&self, name: &str) -> Result<Option<(f64, f64)>, FlightPhaseError> {
        let values = self.channel(name)?;
        Ok(values.first().copied().zip(values.last().copied()))
    }
}
