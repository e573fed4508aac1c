use thiserror::Error;

use crate::constants::{Seconds, UnixTime};

/// Faults raised by the index-resolution searches and by the construction of the
/// time-series and catalogue containers.
///
/// Validation findings are never reported through this type, see
/// [`crate::validation::Diagnostic`].
#[derive(Error, Debug)]
pub enum FlightPhaseError {
    #[error("Time series index is empty")]
    EmptyIndex,

    #[error("Index {index} is out of bounds for a time series of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Timestamps must be non-decreasing, T[{index}] is earlier than its predecessor")]
    NonMonotonicTime { index: usize },

    #[error("Channel '{name}' has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("No local extremum of order {order} in channel '{channel}' between {start} and {end}")]
    NoExtremumFound {
        channel: String,
        order: usize,
        start: UnixTime,
        end: UnixTime,
    },

    #[error("No value within {margin} of {value} in channel '{channel}' {direction} index {anchor}")]
    ValueNotFound {
        channel: String,
        value: f64,
        margin: f64,
        anchor: usize,
        direction: &'static str,
    },

    #[error("No matching heading within {horizon} s of index {boundary}")]
    NoMatchingHeading { boundary: usize, horizon: Seconds },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid sonde flag: {0}")]
    InvalidSondeFlag(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Error while reading the sonde catalogue: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for FlightPhaseError {
    fn eq(&self, other: &Self) -> bool {
        use FlightPhaseError::*;
        match (self, other) {
            (EmptyIndex, EmptyIndex) => true,
            (
                IndexOutOfBounds { index: a, len: la },
                IndexOutOfBounds { index: b, len: lb },
            ) => a == b && la == lb,
            (NonMonotonicTime { index: a }, NonMonotonicTime { index: b }) => a == b,
            (
                ChannelLengthMismatch {
                    name: a,
                    expected: ea,
                    actual: aa,
                },
                ChannelLengthMismatch {
                    name: b,
                    expected: eb,
                    actual: ab,
                },
            ) => a == b && ea == eb && aa == ab,
            (ChannelNotFound(a), ChannelNotFound(b)) => a == b,
            (
                NoExtremumFound {
                    channel: a,
                    order: oa,
                    ..
                },
                NoExtremumFound {
                    channel: b,
                    order: ob,
                    ..
                },
            ) => a == b && oa == ob,
            (
                ValueNotFound {
                    channel: a,
                    anchor: xa,
                    direction: da,
                    ..
                },
                ValueNotFound {
                    channel: b,
                    anchor: xb,
                    direction: db,
                    ..
                },
            ) => a == b && xa == xb && da == db,
            (NoMatchingHeading { boundary: a, .. }, NoMatchingHeading { boundary: b, .. }) => {
                a == b
            }
            (InvalidTimestamp(a), InvalidTimestamp(b)) => a == b,
            (InvalidSondeFlag(a), InvalidSondeFlag(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // csv errors are not comparable: equal when the variant matches
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
