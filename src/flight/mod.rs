//! # Research flights and their segments
//!
//! Typed in-memory model of a flight description: a [`ResearchFlight`] owns an ordered list of
//! [`FlightSegment`]s. The textual encoding (YAML on disk) is handled by the caller; this
//! module converts to and from the generic tree ([`serde_json::Value`]) that the
//! [`validation`](crate::validation) engine reads.
//!
//! Derived circle quantities are never stored on a segment, see [`CircleMetrics`].
//!
//! Modules
//! -----------------
//! * [`summary`](crate::flight::summary) – Per-segment report data (sondes, context bands, extents).
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    constants::{Degree, Seconds, SondeFlag, SondesByFlag, UnixTime, HEADING},
    events::SondeCatalogue,
    flightphase_errors::FlightPhaseError,
    timeseries::{circle::HeadingComparison, TimeSeries},
};

pub mod summary;

/// A contiguous time interval of a flight tagged with maneuver kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub segment_id: String,
    pub kinds: Vec<String>,
    pub name: String,
    pub start: UnixTime,
    pub end: UnixTime,
    #[serde(default)]
    pub irregularities: Vec<String>,
    #[serde(default)]
    pub dropsondes: SondesByFlag,
    /// Deprecated count of good sondes, superseded by `dropsondes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_dropsondes: Option<usize>,
}

impl FlightSegment {
    pub fn new(
        segment_id: impl Into<String>,
        kinds: Vec<String>,
        name: impl Into<String>,
        start: UnixTime,
        end: UnixTime,
    ) -> Self {
        FlightSegment {
            segment_id: segment_id.into(),
            kinds,
            name: name.into(),
            start,
            end,
            irregularities: Vec::new(),
            dropsondes: SondesByFlag::new(),
            good_dropsondes: None,
        }
    }

    pub fn duration(&self) -> Seconds {
        self.end - self.start
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// Replace the sonde lists of the segment with the ones found in the catalogue.
    ///
    /// All three flags are written, empty ones included, and the deprecated
    /// `good_dropsondes` count is dropped.
    pub fn attach_sondes(&mut self, catalogue: &SondeCatalogue, platform: &str) {
        self.good_dropsondes = None;
        self.dropsondes = catalogue.ids_by_flag(self.start, self.end, Some(platform));
        debug!(
            segment_id = %self.segment_id,
            good = self.dropsondes.get(&SondeFlag::Good).map_or(0, Vec::len),
            "attached sondes"
        );
    }

    /// Circle quantities recomputed from the raw data
    pub fn circle_metrics(
        &self,
        series: &TimeSeries,
        catalogue: &SondeCatalogue,
        platform: Option<&str>,
        comparison: HeadingComparison,
    ) -> Result<CircleMetrics, FlightPhaseError> {
        CircleMetrics::compute(self.start, self.end, series, catalogue, platform, comparison)
    }
}

/// Quantities of a circle segment derived from its bounds and the raw data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMetrics {
    /// Heading change between the samples closest to start and end
    pub heading_delta: Degree,
    /// Time between the segment start and its first sonde launch, if any
    pub time_to_first_sonde: Option<Seconds>,
}

impl CircleMetrics {
    pub fn compute(
        start: UnixTime,
        end: UnixTime,
        series: &TimeSeries,
        catalogue: &SondeCatalogue,
        platform: Option<&str>,
        comparison: HeadingComparison,
    ) -> Result<Self, FlightPhaseError> {
        let headings = series.channel(HEADING)?;
        let first = headings[series.nearest_index(start)?];
        let last = headings[series.nearest_index(end)?];

        Ok(CircleMetrics {
            heading_delta: comparison.delta(first, last),
            time_to_first_sonde: catalogue
                .first_launch(start, end, platform)
                .map(|sonde| sonde.launch_time - start),
        })
    }
}

/// A research flight and its ordered segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchFlight {
    pub name: String,
    pub mission: String,
    pub flight_id: String,
    pub platform: String,
    #[serde(default)]
    pub contacts: Vec<String>,
    /// Date of the flight, YYYY-MM-DD
    pub date: String,
    pub takeoff: UnixTime,
    pub landing: UnixTime,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub remarks: Vec<String>,
    #[serde(default)]
    pub segments: Vec<FlightSegment>,
}

impl ResearchFlight {
    pub fn append_segment(&mut self, segment: FlightSegment) {
        self.segments.push(segment);
    }

    pub fn append_segments(&mut self, segments: impl IntoIterator<Item = FlightSegment>) {
        self.segments.extend(segments);
    }

    /// Attach the catalogue sondes to every segment, for the flight platform
    pub fn attach_sondes(&mut self, catalogue: &SondeCatalogue) {
        let platform = self.platform.clone();
        for segment in &mut self.segments {
            segment.attach_sondes(catalogue, &platform);
        }
    }

    /// Generic tree representation, as read by the validation engine
    pub fn to_descriptor(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decode a flight from its generic tree representation
    pub fn from_descriptor(descriptor: &Value) -> Result<Self, serde_json::Error> {
        ResearchFlight::deserialize(descriptor)
    }
}

#[cfg(test)]
mod flight_test {
    use super::*;
    use crate::events::SondeRecord;
    use approx::assert_relative_eq;

    fn catalogue() -> SondeCatalogue {
        SondeCatalogue::new(vec![
            SondeRecord::new("D1", 1060.0, SondeFlag::Good).with_platform("HALO"),
            SondeRecord::new("D2", 1200.0, SondeFlag::Ugly).with_platform("HALO"),
            SondeRecord::new("X1", 1100.0, SondeFlag::Good).with_platform("P3"),
        ])
    }

    #[test]
    fn test_attach_sondes() {
        let mut segment = FlightSegment::new("RF01_c1", vec!["circle".into()], "c1", 1000.0, 1300.0);
        segment.good_dropsondes = Some(4);
        segment.attach_sondes(&catalogue(), "HALO");

        assert_eq!(segment.good_dropsondes, None);
        assert_eq!(segment.dropsondes[&SondeFlag::Good], vec!["D1"]);
        assert!(segment.dropsondes[&SondeFlag::Bad].is_empty());
        assert_eq!(segment.dropsondes[&SondeFlag::Ugly], vec!["D2"]);
    }

    #[test]
    fn test_circle_metrics() {
        let time: Vec<f64> = (0..400).map(|i| 1000.0 + i as f64).collect();
        let heading: Vec<f64> = (0..400).map(|i| (350.0 + i as f64 * 0.1) % 360.0).collect();
        let series = TimeSeries::new(time)
            .unwrap()
            .with_channel(HEADING, heading)
            .unwrap();
        let segment = FlightSegment::new("RF01_c1", vec!["circle".into()], "c1", 1000.0, 1300.0);

        let metrics = segment
            .circle_metrics(&series, &catalogue(), Some("HALO"), HeadingComparison::Wraparound)
            .unwrap();
        assert_relative_eq!(metrics.heading_delta, 30.0, epsilon = 1e-9);
        assert_eq!(metrics.time_to_first_sonde, Some(60.0));

        let legacy = segment
            .circle_metrics(&series, &catalogue(), Some("HALO"), HeadingComparison::Legacy)
            .unwrap();
        assert_relative_eq!(legacy.heading_delta, -330.0, epsilon = 1e-9);
    }

    #[test]
    fn test_descriptor_roundtrip() -> Result<(), serde_json::Error> {
        let mut flight = ResearchFlight {
            name: "RF01".into(),
            flight_id: "HALO-0119".into(),
            platform: "HALO".into(),
            ..Default::default()
        };
        flight.append_segment(FlightSegment::new(
            "HALO-0119_c1",
            vec!["circle".into()],
            "c1",
            1000.0,
            1300.0,
        ));
        flight.attach_sondes(&catalogue());

        let descriptor = flight.to_descriptor()?;
        assert_eq!(descriptor["segments"][0]["dropsondes"]["GOOD"][0], "D1");
        assert!(descriptor["segments"][0].get("good_dropsondes").is_none());
        assert_eq!(ResearchFlight::from_descriptor(&descriptor)?, flight);
        Ok(())
    }

    #[test]
    fn test_non_finite_time_does_not_roundtrip() {
        let flight = ResearchFlight {
            takeoff: f64::NAN,
            ..Default::default()
        };
        let descriptor = flight.to_descriptor().unwrap();
        assert!(descriptor["takeoff"].is_null());
        assert!(ResearchFlight::from_descriptor(&descriptor).is_err());
    }
}
