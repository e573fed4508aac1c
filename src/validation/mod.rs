//! # Segment validation
//!
//! Checks a curated flight description against the instrument record and the sonde
//! catalogue. Validation findings are **data**: every check appends a [`Diagnostic`] and
//! carries on, so a single pass reports every inconsistency of a flight. Only an empty
//! diagnostic list means success.
//!
//! Rules per segment, in order
//! -----------------
//! 1. `segment_id` present, prefixed by the flight id, unique within the flight.
//! 2. `kinds` present and a non-empty list of tags.
//! 3. `start` and `end` present, and `end > start`.
//! 4. `irregularities` present and a list of tags.
//! 5. `good_dropsondes` is deprecated; its value only backs the GOOD count of rule 7.
//! 6. `dropsondes` maps flags to id lists and matches the catalogue over `[start, end)`.
//! 7. The number of GOOD sondes on the segment matches the catalogue.
//! 8. Circles launch their first sonde 60 s ± 0.75 s after the start, unless the segment
//!    records an irregularity.
//!
//! Flight-level checks ([`check_flight`]) cover `flight_id`, `platform`, and the presence of
//! an external sonde catalogue. [`validate_flight`] runs everything in one pass.
//!
//! State
//! -----------------
//! A [`SegmentValidator`] belongs to one flight. Its only state is the set of segment ids
//! already seen, which grows with every [`SegmentValidator::check_segment`] call; segments
//! must be checked in flight order through a single validator. Flights are independent.
use std::collections::HashSet;
use std::fmt;

use ahash::RandomState;
use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    constants::{SondeFlag, SondesByFlag, UnixTime},
    events::SondeCatalogue,
    flight::CircleMetrics,
    flightphase_errors::FlightPhaseError,
    timeseries::TimeSeries,
};

use self::{decode::Field, params::ValidationParams};

pub mod decode;
pub mod params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// What a diagnostic refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    /// A segment, by id or, lacking one, by a descriptive label
    Segment(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("flight"),
            Scope::Segment(label) => f.write_str(label),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub scope: Scope,
    pub severity: Severity,
    pub text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.scope, self.text)
    }
}

/// Collects the diagnostics of one scope.
struct Report {
    scope: Scope,
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    fn new(scope: Scope) -> Self {
        Report {
            scope,
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, text: String) {
        debug!(scope = %self.scope, %severity, "{text}");
        self.diagnostics.push(Diagnostic {
            scope: self.scope.clone(),
            severity,
            text,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.push(Severity::Error, text.into());
    }

    fn warning(&mut self, text: impl Into<String>) {
        self.push(Severity::Warning, text.into());
    }
}

/// Identity of the flight the segments belong to, after defaults were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightHeader {
    pub flight_id: String,
    pub platform: String,
}

/// Rule engine for the segments of one flight.
#[derive(Debug, Clone)]
pub struct SegmentValidator {
    header: FlightHeader,
    params: ValidationParams,
    used_segment_ids: HashSet<String, RandomState>,
}

impl SegmentValidator {
    pub fn new(header: FlightHeader, params: ValidationParams) -> Self {
        SegmentValidator {
            header,
            params,
            used_segment_ids: HashSet::default(),
        }
    }

    pub fn header(&self) -> &FlightHeader {
        &self.header
    }

    pub fn params(&self) -> &ValidationParams {
        &self.params
    }

    /// Segment ids seen so far
    pub fn used_segment_ids(&self) -> impl Iterator<Item = &str> {
        self.used_segment_ids.iter().map(String::as_str)
    }

    /// Check one segment descriptor
    ///
    /// Arguments
    /// ---------
    /// * `segment`: the segment descriptor, a mapping
    /// * `series`: the instrument record of the flight
    /// * `sondes`: the authoritative sonde catalogue
    ///
    /// Return
    /// ------
    /// * every finding for the segment, in rule order; empty when the segment is consistent
    pub fn check_segment(
        &mut self,
        segment: &Value,
        series: &TimeSeries,
        sondes: &SondeCatalogue,
    ) -> Vec<Diagnostic> {
        let Some(segment) = segment.as_object() else {
            let mut report = Report::new(Scope::Segment("<invalid segment>".into()));
            report.error("segment descriptor is not a mapping");
            return report.diagnostics;
        };

        let mut report = Report::new(segment_scope(segment));

        self.check_identifier(segment, &mut report);
        let kinds = check_kinds(segment, &mut report);
        let bounds = check_bounds(segment, series, &mut report);
        let irregularities = check_irregularities(segment, &mut report);
        let legacy_good = check_legacy_good(segment, &mut report);
        let listed = self.check_dropsondes(segment, bounds, sondes, &mut report);
        self.check_good_count(listed.as_ref(), legacy_good, bounds, sondes, &mut report);

        if kinds.iter().any(|k| self.params.is_circle_kind(k)) {
            if let Some((start, end)) = bounds {
                match self.circle_metrics(start, end, series, sondes) {
                    Ok(metrics) => debug!(
                        scope = %report.scope,
                        heading_delta = metrics.heading_delta,
                        time_to_first_sonde = ?metrics.time_to_first_sonde,
                        "circle metrics"
                    ),
                    Err(error) => debug!(scope = %report.scope, %error, "no circle metrics"),
                }
            }
            self.check_first_sonde(bounds, &irregularities, sondes, &mut report);
        }

        report.diagnostics
    }

    /// Derived quantities of a circle flown between `start` and `end`, for the flight
    /// platform and with the configured heading comparison
    pub fn circle_metrics(
        &self,
        start: UnixTime,
        end: UnixTime,
        series: &TimeSeries,
        sondes: &SondeCatalogue,
    ) -> Result<CircleMetrics, FlightPhaseError> {
        CircleMetrics::compute(
            start,
            end,
            series,
            sondes,
            Some(&self.header.platform),
            self.params.heading_comparison,
        )
    }

    fn check_identifier(&mut self, segment: &Map<String, Value>, report: &mut Report) {
        match decode::string(segment, "segment_id") {
            Field::Missing => report.error("segment has no segment_id"),
            Field::WrongType => report.error("segment_id must be a string"),
            Field::Valid(id) => {
                if !id.starts_with(&self.header.flight_id) {
                    report.error(format!(
                        "segment_id '{id}' does not start with flight_id '{}'",
                        self.header.flight_id
                    ));
                }
                if self.used_segment_ids.contains(&id) {
                    report.error(format!("segment_id '{id}' is not unique"));
                } else {
                    self.used_segment_ids.insert(id);
                }
            }
        }
    }

    /// Returns the listed sondes when `dropsondes` is a mapping
    fn check_dropsondes(
        &self,
        segment: &Map<String, Value>,
        bounds: Option<(UnixTime, UnixTime)>,
        sondes: &SondeCatalogue,
        report: &mut Report,
    ) -> Option<SondesByFlag> {
        let mut listed = SondesByFlag::new();
        let mut valid_mapping = false;

        match decode::mapping(segment, "dropsondes") {
            Field::Missing => report.error("segment has no dropsondes"),
            Field::WrongType => {
                report.error("dropsondes must be a mapping from sonde flag to sonde ids")
            }
            Field::Valid(mapping) => {
                valid_mapping = true;
                for (key, value) in mapping {
                    let Ok(flag) = key.parse::<SondeFlag>() else {
                        report.error(format!("unknown sonde flag '{key}' in dropsondes"));
                        continue;
                    };
                    match decode::sonde_list(value) {
                        Some(ids) => {
                            listed.insert(flag, ids);
                        }
                        None => report.error(format!("dropsondes.{flag} must be a list of sonde ids")),
                    }
                }
            }
        }

        if let Some((start, end)) = bounds {
            let expected = sondes.ids_by_flag(start, end, Some(&self.header.platform));
            if non_empty(&listed) != non_empty(&expected) {
                report.error(format!(
                    "dropsondes do not match the sonde catalogue: segment lists {}, catalogue has {}",
                    describe(&listed),
                    describe(&expected)
                ));
            }
        }

        valid_mapping.then_some(listed)
    }

    fn check_good_count(
        &self,
        listed: Option<&SondesByFlag>,
        legacy_good: Option<usize>,
        bounds: Option<(UnixTime, UnixTime)>,
        sondes: &SondeCatalogue,
        report: &mut Report,
    ) {
        let Some((start, end)) = bounds else {
            return;
        };
        let listed_good = listed
            .and_then(|l| l.get(&SondeFlag::Good))
            .map(Vec::len)
            .or(legacy_good)
            .unwrap_or(0);
        let catalogue_good = sondes.count(SondeFlag::Good, start, end, Some(&self.header.platform));
        if listed_good != catalogue_good {
            report.error(format!(
                "segment lists {listed_good} GOOD sondes but the catalogue has {catalogue_good}"
            ));
        }
    }

    fn check_first_sonde(
        &self,
        bounds: Option<(UnixTime, UnixTime)>,
        irregularities: &[String],
        sondes: &SondeCatalogue,
        report: &mut Report,
    ) {
        let Some((start, end)) = bounds else {
            return;
        };
        let Some(first) = sondes.first_launch(start, end, Some(&self.header.platform)) else {
            return;
        };

        let delay = first.launch_time - start;
        let expected = self.params.first_sonde_offset;
        let tolerance = self.params.first_sonde_tolerance;
        if (delay - expected).abs() <= tolerance {
            return;
        }
        if !irregularities.is_empty() {
            debug!(
                scope = %report.scope,
                delay,
                "first sonde timing waived by recorded irregularities"
            );
            return;
        }
        report.error(format!(
            "first sonde {} launched {delay:.2} s after circle start, expected {expected:.2} s ± {tolerance:.2} s",
            first.sonde_id
        ));
    }
}

fn segment_scope(segment: &Map<String, Value>) -> Scope {
    let label = decode::string(segment, "segment_id")
        .valid()
        .or_else(|| {
            decode::string(segment, "name")
                .valid()
                .map(|name| format!("<{name}>"))
        })
        .unwrap_or_else(|| "<unnamed segment>".to_string());
    Scope::Segment(label)
}

fn check_kinds(segment: &Map<String, Value>, report: &mut Report) -> Vec<String> {
    let kinds = decode::string_list(segment, "kinds");
    match &kinds {
        Field::Missing => report.error("segment has no kinds"),
        Field::WrongType => report.error("kinds must be a list of strings"),
        Field::Valid(k) if k.is_empty() => report.error("kinds must not be empty"),
        Field::Valid(_) => {}
    }
    kinds.valid_or_default()
}

fn check_bounds(
    segment: &Map<String, Value>,
    series: &TimeSeries,
    report: &mut Report,
) -> Option<(UnixTime, UnixTime)> {
    let mut decode_bound = |key: &str| {
        let field = decode::timestamp(segment, key);
        match field {
            Field::Missing => report.error(format!("segment has no {key}")),
            Field::WrongType => report.error(format!("{key} must be a timestamp")),
            Field::Valid(_) => {}
        }
        field.valid()
    };
    let start = decode_bound("start");
    let end = decode_bound("end");

    let (start, end) = start.zip(end)?;
    if end <= start {
        report.error(format!(
            "segment end ({end}) is not after its start ({start})"
        ));
    } else if !series.is_empty() && series.slice(start, end).is_empty() {
        report.warning(format!("no instrument data between start ({start}) and end ({end})"));
    }
    Some((start, end))
}

fn check_irregularities(segment: &Map<String, Value>, report: &mut Report) -> Vec<String> {
    let irregularities = decode::string_list(segment, "irregularities");
    match &irregularities {
        Field::Missing => report.warning("segment has no irregularities list"),
        Field::WrongType => report.error("irregularities must be a list of strings"),
        Field::Valid(_) => {}
    }
    irregularities.valid_or_default()
}

fn check_legacy_good(segment: &Map<String, Value>, report: &mut Report) -> Option<usize> {
    let legacy = decode::count_or_list(segment, "good_dropsondes");
    match &legacy {
        Field::Missing => {}
        Field::WrongType => {
            report.warning("good_dropsondes is deprecated, use dropsondes.GOOD");
            report.error("good_dropsondes must be a count or a list of sonde ids");
        }
        Field::Valid(_) => report.warning("good_dropsondes is deprecated, use dropsondes.GOOD"),
    }
    legacy.valid()
}

fn non_empty(by_flag: &SondesByFlag) -> SondesByFlag {
    by_flag
        .iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(flag, ids)| (*flag, ids.clone()))
        .collect()
}

fn describe(by_flag: &SondesByFlag) -> String {
    let entries = by_flag
        .iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(flag, ids)| format!("{flag}: [{}]", ids.join(", ")))
        .join(", ");
    format!("{{{entries}}}")
}

/// Flight-level checks.
///
/// Arguments
/// ---------
/// * `flight`: the flight descriptor, a mapping
/// * `sonde_info_available`: whether an external sonde catalogue was supplied
/// * `params`: the validation parameters, for the default platform
///
/// Return
/// ------
/// * the flight header with defaults applied, and the flight-level diagnostics
pub fn check_flight(
    flight: &Value,
    sonde_info_available: bool,
    params: &ValidationParams,
) -> (FlightHeader, Vec<Diagnostic>) {
    let mut report = Report::new(Scope::Global);
    let empty = Map::new();
    let flight = flight.as_object().unwrap_or_else(|| {
        report.error("flight descriptor is not a mapping");
        &empty
    });

    let flight_id = match decode::string(flight, "flight_id") {
        Field::Valid(id) => id,
        Field::Missing => {
            warn!("flight has no flight_id");
            report.warning("flight has no flight_id, using an empty prefix");
            String::new()
        }
        Field::WrongType => {
            report.error("flight_id must be a string");
            String::new()
        }
    };

    let platform = match decode::string(flight, "platform") {
        Field::Valid(platform) => platform,
        Field::Missing => {
            warn!(platform = %params.default_platform, "flight has no platform");
            report.warning(format!(
                "flight has no platform, assuming {}",
                params.default_platform
            ));
            params.default_platform.clone()
        }
        Field::WrongType => {
            report.error(format!(
                "platform must be a string, assuming {}",
                params.default_platform
            ));
            params.default_platform.clone()
        }
    };

    if !sonde_info_available {
        warn!("no sonde info catalogue, using the sondes of the dataset");
        report.warning(
            "no sonde info catalogue given, falling back to the sondes embedded in the dataset",
        );
    }

    (
        FlightHeader {
            flight_id,
            platform,
        },
        report.diagnostics,
    )
}

/// Every diagnostic of a flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightDiagnostics {
    pub global: Vec<Diagnostic>,
    /// One entry per segment, in flight order
    pub segments: Vec<Vec<Diagnostic>>,
}

impl FlightDiagnostics {
    pub fn all(&self) -> impl Iterator<Item = &Diagnostic> {
        self.global.iter().chain(self.segments.iter().flatten())
    }

    pub fn is_clean(&self) -> bool {
        self.all().next().is_none()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.all().filter(|d| d.severity == severity).count()
    }
}

/// Validate a whole flight in one pass.
///
/// The external sonde catalogue (`sonde_info`) is authoritative when given; otherwise the
/// sondes embedded in the dataset are used and a warning is emitted.
pub fn validate_flight(
    flight: &Value,
    series: &TimeSeries,
    dataset_sondes: &SondeCatalogue,
    sonde_info: Option<&SondeCatalogue>,
    params: &ValidationParams,
) -> FlightDiagnostics {
    let (header, mut global) = check_flight(flight, sonde_info.is_some(), params);
    let catalogue = sonde_info.unwrap_or(dataset_sondes);

    let mut validator = SegmentValidator::new(header, params.clone());
    let segments = match flight.get("segments") {
        Some(Value::Array(segments)) => segments
            .iter()
            .map(|segment| validator.check_segment(segment, series, catalogue))
            .collect(),
        Some(_) => {
            let mut report = Report::new(Scope::Global);
            report.error("segments must be a list");
            global.append(&mut report.diagnostics);
            Vec::new()
        }
        None => {
            let mut report = Report::new(Scope::Global);
            report.error("flight has no segments");
            global.append(&mut report.diagnostics);
            Vec::new()
        }
    };

    FlightDiagnostics { global, segments }
}

#[cfg(test)]
mod validation_test {
    use super::*;
    use crate::constants::HEADING;
    use crate::events::SondeRecord;
    use crate::timeseries::circle::HeadingComparison;
    use approx::assert_relative_eq;
    use serde_json::json;

    const T0: f64 = 1_000.0;

    fn series() -> TimeSeries {
        TimeSeries::new((0..2000).map(|i| i as f64).collect()).unwrap()
    }

    fn validator() -> SegmentValidator {
        SegmentValidator::new(
            FlightHeader {
                flight_id: "HALO-0119".into(),
                platform: "HALO".into(),
            },
            ValidationParams::default(),
        )
    }

    fn circle(id: &str, good: &[&str]) -> Value {
        json!({
            "segment_id": id,
            "kinds": ["circle"],
            "name": "c1",
            "start": T0,
            "end": T0 + 300.0,
            "irregularities": [],
            "dropsondes": {"GOOD": good, "BAD": [], "UGLY": []},
        })
    }

    fn texts(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.text.as_str()).collect()
    }

    #[test]
    fn test_consistent_circle() {
        let sondes = SondeCatalogue::new(vec![SondeRecord::new("D1", T0 + 60.2, SondeFlag::Good)]);
        let diagnostics = validator().check_segment(&circle("HALO-0119_c1", &["D1"]), &series(), &sondes);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_duplicate_id_only_on_second_call() {
        let sondes = SondeCatalogue::default();
        let mut validator = validator();
        let first = validator.check_segment(&circle("HALO-0119_c1", &[]), &series(), &sondes);
        let second = validator.check_segment(&circle("HALO-0119_c1", &[]), &series(), &sondes);
        assert!(first.is_empty(), "{first:?}");
        assert_eq!(texts(&second), vec!["segment_id 'HALO-0119_c1' is not unique"]);
        assert_eq!(validator.used_segment_ids().count(), 1);
    }

    #[test]
    fn test_prefix_and_scope() {
        let diagnostics =
            validator().check_segment(&circle("P3-0119_c1", &[]), &series(), &SondeCatalogue::default());
        assert_eq!(
            diagnostics,
            vec![Diagnostic {
                scope: Scope::Segment("P3-0119_c1".into()),
                severity: Severity::Error,
                text: "segment_id 'P3-0119_c1' does not start with flight_id 'HALO-0119'".into(),
            }]
        );
    }

    #[test]
    fn test_end_equal_start() {
        let mut segment = circle("HALO-0119_c1", &[]);
        segment["end"] = json!(T0);
        let diagnostics = validator().check_segment(&segment, &series(), &SondeCatalogue::default());
        assert_eq!(
            texts(&diagnostics),
            vec!["segment end (1000) is not after its start (1000)"]
        );
    }

    #[test]
    fn test_malformed_fields_do_not_stop_checks() {
        let segment = json!({
            "name": "odd",
            "kinds": "circle",
            "start": "soon",
            "end": T0,
            "irregularities": "none",
            "dropsondes": {"GOOD": "D1", "MEH": []},
        });
        let diagnostics = validator().check_segment(&segment, &series(), &SondeCatalogue::default());
        assert!(diagnostics
            .iter()
            .all(|d| d.scope == Scope::Segment("<odd>".into())));
        assert_eq!(
            texts(&diagnostics),
            vec![
                "segment has no segment_id",
                "kinds must be a list of strings",
                "start must be a timestamp",
                "irregularities must be a list of strings",
                "dropsondes.GOOD must be a list of sonde ids",
                "unknown sonde flag 'MEH' in dropsondes",
            ]
        );
    }

    #[test]
    fn test_dropsonde_mismatch_and_legacy_count() {
        let sondes = SondeCatalogue::new(vec![
            SondeRecord::new("D1", T0 + 60.0, SondeFlag::Good),
            SondeRecord::new("D2", T0 + 120.0, SondeFlag::Good),
            SondeRecord::new("X9", T0 + 130.0, SondeFlag::Good).with_platform("P3"),
        ]);
        let segment = json!({
            "segment_id": "HALO-0119_s1",
            "kinds": ["straight_leg"],
            "name": "s1",
            "start": T0,
            "end": T0 + 300.0,
            "irregularities": [],
            "good_dropsondes": 2,
        });
        let diagnostics = validator().check_segment(&segment, &series(), &sondes);
        assert_eq!(
            texts(&diagnostics),
            vec![
                "good_dropsondes is deprecated, use dropsondes.GOOD",
                "segment has no dropsondes",
                "dropsondes do not match the sonde catalogue: segment lists {}, catalogue has {GOOD: [D1, D2]}",
            ]
        );
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_good_count_mismatch() {
        let sondes = SondeCatalogue::new(vec![SondeRecord::new("D1", T0 + 60.0, SondeFlag::Good)]);
        let mut segment = circle("HALO-0119_c1", &["D1", "D7"]);
        segment["kinds"] = json!(["straight_leg"]);
        let diagnostics = validator().check_segment(&segment, &series(), &sondes);
        assert_eq!(
            texts(&diagnostics),
            vec![
                "dropsondes do not match the sonde catalogue: segment lists {GOOD: [D1, D7]}, catalogue has {GOOD: [D1]}",
                "segment lists 2 GOOD sondes but the catalogue has 1",
            ]
        );
    }

    #[test]
    fn test_first_sonde_timing_and_waiver() {
        let sondes = SondeCatalogue::new(vec![SondeRecord::new("D1", T0 + 58.0, SondeFlag::Good)]);
        let mut segment = circle("HALO-0119_c1", &["D1"]);
        let diagnostics = validator().check_segment(&segment, &series(), &sondes);
        assert_eq!(
            texts(&diagnostics),
            vec!["first sonde D1 launched 58.00 s after circle start, expected 60.00 s ± 0.75 s"]
        );

        segment["irregularities"] = json!(["late circle entry"]);
        assert!(validator().check_segment(&segment, &series(), &sondes).is_empty());
    }

    #[test]
    fn test_circle_metrics_follow_heading_comparison() {
        let heading = (0..2000)
            .map(|i| (350.0 + (i as f64 - T0) * 0.1).rem_euclid(360.0))
            .collect();
        let series = series().with_channel(HEADING, heading).unwrap();
        let sondes = SondeCatalogue::new(vec![
            SondeRecord::new("D1", T0 + 60.0, SondeFlag::Good).with_platform("HALO"),
            SondeRecord::new("X1", T0 + 10.0, SondeFlag::Good).with_platform("P3"),
        ]);
        let header = validator().header().clone();

        let wrap = SegmentValidator::new(
            header,
            ValidationParams::builder()
                .heading_comparison(HeadingComparison::Wraparound)
                .build()
                .unwrap(),
        );
        let metrics = wrap.circle_metrics(T0, T0 + 300.0, &series, &sondes).unwrap();
        assert_relative_eq!(metrics.heading_delta, 30.0, epsilon = 1e-9);
        assert_eq!(metrics.time_to_first_sonde, Some(60.0));

        let legacy = validator()
            .circle_metrics(T0, T0 + 300.0, &series, &sondes)
            .unwrap();
        assert_relative_eq!(legacy.heading_delta, -330.0, epsilon = 1e-9);

        // metrics never add diagnostics
        let segment = circle("HALO-0119_c1", &["D1"]);
        assert!(wrap.clone().check_segment(&segment, &series, &sondes).is_empty());
    }

    #[test]
    fn test_segment_outside_record() {
        let mut segment = circle("HALO-0119_c1", &[]);
        segment["start"] = json!(5000.0);
        segment["end"] = json!(5300.0);
        let diagnostics = validator().check_segment(&segment, &series(), &SondeCatalogue::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_check_flight_defaults() {
        let params = ValidationParams::default();
        let (header, diagnostics) = check_flight(&json!({"segments": []}), false, &params);
        assert_eq!(
            header,
            FlightHeader {
                flight_id: String::new(),
                platform: "HALO".into()
            }
        );
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d.scope == Scope::Global));
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Warning));

        let (_, diagnostics) = check_flight(
            &json!({"flight_id": "HALO-0119", "platform": "HALO"}),
            true,
            &params,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            scope: Scope::Global,
            severity: Severity::Warning,
            text: "flight has no platform, assuming HALO".into(),
        };
        assert_eq!(d.to_string(), "[WARNING] flight: flight has no platform, assuming HALO");
    }
}
