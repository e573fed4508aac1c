//! # Validation parameters
//!
//! [`ValidationParams`] gathers the conventions the segment rules check against, with a
//! validating builder:
//!
//! ```rust
//! use flightphase::validation::params::ValidationParams;
//! use flightphase::timeseries::circle::HeadingComparison;
//!
//! let params = ValidationParams::builder()
//!     .first_sonde_tolerance(1.0)
//!     .circle_kinds(["circle", "circle_ccw"])
//!     .heading_comparison(HeadingComparison::Wraparound)
//!     .build()
//!     .unwrap();
//! assert!(params.is_circle_kind("circle_ccw"));
//! ```
use std::fmt;

use crate::{
    constants::{
        Seconds, DEFAULT_PLATFORM, FIRST_SONDE_OFFSET, FIRST_SONDE_TOLERANCE, SEGMENT_BORDER,
    },
    flightphase_errors::FlightPhaseError,
    timeseries::circle::HeadingComparison,
};

/// Conventions checked by the [`SegmentValidator`](crate::validation::SegmentValidator).
///
/// Fields
/// -----------------
/// * `first_sonde_offset` – expected delay (s) between a circle start and its first sonde.
/// * `first_sonde_tolerance` – accepted deviation (s) from `first_sonde_offset`.
/// * `circle_kinds` – segment kinds treated as circles.
/// * `default_platform` – platform assumed when the flight does not name one.
/// * `border` – width (s) of the context bands around a segment summary.
/// * `heading_comparison` – how headings are compared for derived circle quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationParams {
    pub first_sonde_offset: Seconds,
    pub first_sonde_tolerance: Seconds,
    pub circle_kinds: Vec<String>,
    pub default_platform: String,
    pub border: Seconds,
    pub heading_comparison: HeadingComparison,
}

impl ValidationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ValidationParamsBuilder {
        ValidationParamsBuilder::new()
    }

    pub fn is_circle_kind(&self, kind: &str) -> bool {
        self.circle_kinds.iter().any(|k| k == kind)
    }
}

impl Default for ValidationParams {
    fn default() -> Self {
        ValidationParams {
            first_sonde_offset: FIRST_SONDE_OFFSET,
            first_sonde_tolerance: FIRST_SONDE_TOLERANCE,
            circle_kinds: vec!["circle".to_string()],
            default_platform: DEFAULT_PLATFORM.to_string(),
            border: SEGMENT_BORDER,
            heading_comparison: HeadingComparison::Legacy,
        }
    }
}

/// Builder for [`ValidationParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationParamsBuilder {
    params: ValidationParams,
}

impl ValidationParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_sonde_offset(mut self, v: Seconds) -> Self {
        self.params.first_sonde_offset = v;
        self
    }
    pub fn first_sonde_tolerance(mut self, v: Seconds) -> Self {
        self.params.first_sonde_tolerance = v;
        self
    }
    pub fn circle_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.circle_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }
    pub fn default_platform(mut self, v: impl Into<String>) -> Self {
        self.params.default_platform = v.into();
        self
    }
    pub fn border(mut self, v: Seconds) -> Self {
        self.params.border = v;
        self
    }
    pub fn heading_comparison(mut self, v: HeadingComparison) -> Self {
        self.params.heading_comparison = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Errors
    /// -----------------
    /// [`FlightPhaseError::InvalidParameter`] when
    /// * `first_sonde_offset` or `first_sonde_tolerance` is negative or not finite,
    /// * `border` is not strictly positive,
    /// * `circle_kinds` is empty or contains an empty kind,
    /// * `default_platform` is empty.
    pub fn build(self) -> Result<ValidationParams, FlightPhaseError> {
        let p = &self.params;

        if !Self::ge0(p.first_sonde_offset) {
            return Err(FlightPhaseError::InvalidParameter(
                "first_sonde_offset must be non-negative".into(),
            ));
        }
        if !Self::ge0(p.first_sonde_tolerance) {
            return Err(FlightPhaseError::InvalidParameter(
                "first_sonde_tolerance must be non-negative".into(),
            ));
        }
        if !(p.border.is_finite() && p.border > 0.0) {
            return Err(FlightPhaseError::InvalidParameter(
                "border must be > 0".into(),
            ));
        }
        if p.circle_kinds.is_empty() || p.circle_kinds.iter().any(String::is_empty) {
            return Err(FlightPhaseError::InvalidParameter(
                "circle_kinds must hold at least one non-empty kind".into(),
            ));
        }
        if p.default_platform.is_empty() {
            return Err(FlightPhaseError::InvalidParameter(
                "default_platform must not be empty".into(),
            ));
        }

        Ok(self.params)
    }

    #[inline]
    fn ge0(v: f64) -> bool {
        v.is_finite() && v >= 0.0
    }
}

impl fmt::Display for ValidationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ValidationParams(first_sonde={:.2}s±{:.2}s, circle_kinds=[{}], default_platform={}, border={:.0}s, heading={:?})",
            self.first_sonde_offset,
            self.first_sonde_tolerance,
            self.circle_kinds.join(", "),
            self.default_platform,
            self.border,
            self.heading_comparison,
        )
    }
}
