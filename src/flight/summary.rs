//! Data behind a per-segment report: what the segment covers in the instrument record,
//! the context just before and after it, and the sondes launched inside it.
//!
//! Nothing here renders; the plotting/HTML side consumes these numbers.
use std::ops::Range;

use crate::{
    constants::{Degree, SondeId, UnixTime, LATITUDE, LONGITUDE},
    events::SondeCatalogue,
    flight::FlightSegment,
    flightphase_errors::FlightPhaseError,
    timeseries::TimeSeries,
    validation::params::ValidationParams,
};

/// Latitude/longitude box used to zoom on a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomExtent {
    pub lat: (Degree, Degree),
    pub lon: (Degree, Degree),
}

impl ZoomExtent {
    /// Square box centred between the first and last position, half-width equal to the
    /// distance (in degrees) between them.
    pub fn from_endpoints(lat: (Degree, Degree), lon: (Degree, Degree)) -> Self {
        let (lat_min, lat_max) = (lat.0.min(lat.1), lat.0.max(lat.1));
        let (lon_min, lon_max) = (lon.0.min(lon.1), lon.0.max(lon.1));
        let delta = (lat_max - lat_min).hypot(lon_max - lon_min);
        let lat_center = (lat_min + lat_max) / 2.0;
        let lon_center = (lon_min + lon_max) / 2.0;
        ZoomExtent {
            lat: (lat_center - delta, lat_center + delta),
            lon: (lon_center - delta, lon_center + delta),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub segment_id: String,
    /// Sample index range of the segment, `[start, end]` inclusive in time
    pub samples: Range<usize>,
    /// Samples within `border` seconds before the segment start
    pub before: Range<usize>,
    /// Samples within `border` seconds after the segment end
    pub after: Range<usize>,
    pub sonde_ids: Vec<SondeId>,
    pub sonde_times: Vec<UnixTime>,
    /// Series index closest to each sonde launch
    pub sonde_indices: Vec<usize>,
    /// `None` when the segment holds no position sample
    pub zoom: Option<ZoomExtent>,
}

impl SegmentSummary {
    /// Gather the report data of one segment.
    ///
    /// The context bands extend `params.border` seconds on each side of the segment.
    pub fn compute(
        segment: &FlightSegment,
        series: &TimeSeries,
        catalogue: &SondeCatalogue,
        platform: Option<&str>,
        params: &ValidationParams,
    ) -> Result<Self, FlightPhaseError> {
        let border = params.border;
        let window = series.slice(segment.start, segment.end);
        let before = series.slice(segment.start - border, segment.start).range();
        let after = series.slice(segment.end, segment.end + border).range();

        let zoom = match (window.endpoints(LATITUDE)?, window.endpoints(LONGITUDE)?) {
            (Some(lat), Some(lon)) => Some(ZoomExtent::from_endpoints(lat, lon)),
            _ => None,
        };

        let sondes: Vec<_> = catalogue
            .in_range_for(segment.start, segment.end, platform)
            .collect();
        let sonde_indices = if series.is_empty() {
            Vec::new()
        } else {
            sondes
                .iter()
                .map(|s| series.sonde_index(s))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SegmentSummary {
            segment_id: segment.segment_id.clone(),
            samples: window.range(),
            before,
            after,
            sonde_ids: sondes.iter().map(|s| s.sonde_id.clone()).collect(),
            sonde_times: sondes.iter().map(|s| s.launch_time).collect(),
            sonde_indices,
            zoom,
        })
    }

    pub fn sonde_count(&self) -> usize {
        self.sonde_ids.len()
    }
}
