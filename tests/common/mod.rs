#![allow(dead_code)]

use flightphase::constants::{ALTITUDE, HEADING, LATITUDE, LONGITUDE, PITCH, ROLL};
use flightphase::{SondeCatalogue, SondeFlag, SondeRecord, TimeSeries};

/// Start of the synthetic flight record (2020-01-19T12:00:00Z)
pub const T_START: f64 = 1_579_435_200.0;
/// Index of the circle entry in the synthetic record
pub const ENTRY: usize = 600;
/// Index of the circle exit in the synthetic record
pub const EXIT: usize = 960;

/// 1 Hz record of a straight leg, a 360 s clockwise circle banked at 20°, and a straight leg.
///
/// The heading is symmetric around the circle: it drifts slowly away from the entry
/// heading on both straight legs and matches it exactly only at `ENTRY` and `EXIT`.
pub fn circle_flight(entry_heading: f64) -> TimeSeries {
    let n = 1800;
    let time: Vec<f64> = (0..n).map(|i| T_START + i as f64).collect();

    let heading = (0..n)
        .map(|i| {
            let h = if i < ENTRY {
                entry_heading - (ENTRY - i) as f64 * 0.01
            } else if i <= EXIT {
                entry_heading + (i - ENTRY) as f64
            } else {
                entry_heading + (i - EXIT) as f64 * 0.01
            };
            h.rem_euclid(360.0)
        })
        .collect();

    let roll = (0..n)
        .map(|i| {
            if (ENTRY..=EXIT).contains(&i) {
                // smooth bank in and out, peaking mid-circle
                let phase = (i - ENTRY) as f64 / (EXIT - ENTRY) as f64;
                20.0 * (std::f64::consts::PI * phase).sin()
            } else {
                0.0
            }
        })
        .collect();

    TimeSeries::new(time)
        .unwrap()
        .with_channel(HEADING, heading)
        .unwrap()
        .with_channel(ROLL, roll)
        .unwrap()
        .with_channel(PITCH, vec![2.0; n])
        .unwrap()
        .with_channel(ALTITUDE, vec![10_000.0; n])
        .unwrap()
        .with_channel(LATITUDE, (0..n).map(|i| 13.0 + i as f64 * 1e-3).collect())
        .unwrap()
        .with_channel(LONGITUDE, vec![-57.0; n])
        .unwrap()
}

/// Unix time of sample `index` of [`circle_flight`]
pub fn t(index: usize) -> f64 {
    T_START + index as f64
}

pub fn sondes(records: &[(&str, f64, SondeFlag)]) -> SondeCatalogue {
    records
        .iter()
        .map(|&(id, time, flag)| SondeRecord::new(id, time, flag).with_platform("HALO"))
        .collect()
}
