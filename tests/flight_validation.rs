mod common;

use common::{circle_flight, sondes, t, ENTRY, EXIT};
use flightphase::flight::summary::SegmentSummary;
use flightphase::timeseries::circle::HeadingComparison;
use flightphase::validation::params::ValidationParams;
use flightphase::validation::{validate_flight, Scope, Severity};
use flightphase::{FlightSegment, ResearchFlight, SondeCatalogue, SondeFlag};
use serde_json::json;

fn flight_with_circle(first_sonde_delay: f64) -> (ResearchFlight, SondeCatalogue) {
    let catalogue = sondes(&[
        ("D1", t(ENTRY) + first_sonde_delay, SondeFlag::Good),
        ("D2", t(ENTRY) + 150.0, SondeFlag::Ugly),
        ("D3", t(EXIT) + 200.0, SondeFlag::Good),
    ]);

    let mut flight = ResearchFlight {
        name: "RF02".into(),
        mission: "EUREC4A".into(),
        flight_id: "HALO-0119".into(),
        platform: "HALO".into(),
        date: "2020-01-19".into(),
        takeoff: t(0),
        landing: t(1799),
        ..Default::default()
    };
    flight.append_segments([
        FlightSegment::new(
            "HALO-0119_c1",
            vec!["circle".into()],
            "circle 1",
            t(ENTRY),
            t(EXIT),
        ),
        FlightSegment::new(
            "HALO-0119_sl1",
            vec!["straight_leg".into()],
            "leg 1",
            t(EXIT),
            t(1700),
        ),
    ]);
    flight.attach_sondes(&catalogue);
    (flight, catalogue)
}

#[test]
fn test_consistent_flight_is_clean() {
    let (flight, catalogue) = flight_with_circle(60.2);
    let diagnostics = validate_flight(
        &flight.to_descriptor().unwrap(),
        &circle_flight(120.0),
        &SondeCatalogue::default(),
        Some(&catalogue),
        &ValidationParams::default(),
    );
    assert!(diagnostics.is_clean(), "{diagnostics:?}");
    assert_eq!(diagnostics.segments.len(), 2);
}

#[test]
fn test_early_first_sonde_and_waiver() {
    let (mut flight, catalogue) = flight_with_circle(58.0);
    let series = circle_flight(120.0);
    let params = ValidationParams::default();

    let descriptor = flight.to_descriptor().unwrap();
    let diagnostics = validate_flight(&descriptor, &series, &catalogue, Some(&catalogue), &params);
    assert!(diagnostics.global.is_empty());
    assert_eq!(diagnostics.segments[0].len(), 1);
    let d = &diagnostics.segments[0][0];
    assert_eq!(d.scope, Scope::Segment("HALO-0119_c1".into()));
    assert_eq!(d.severity, Severity::Error);
    assert!(d.text.starts_with("first sonde D1 launched 58.00 s"));
    assert!(diagnostics.segments[1].is_empty());

    flight.segments[0].irregularities.push("sonde launched early".into());
    let descriptor = flight.to_descriptor().unwrap();
    let diagnostics = validate_flight(&descriptor, &series, &catalogue, Some(&catalogue), &params);
    assert!(diagnostics.is_clean(), "{diagnostics:?}");
}

#[test]
fn test_missing_metadata_falls_back() {
    let (flight, catalogue) = flight_with_circle(60.0);
    let mut descriptor = flight.to_descriptor().unwrap();
    let object = descriptor.as_object_mut().unwrap();
    object.remove("platform");

    // the dataset sondes carry the same launches
    let diagnostics = validate_flight(
        &descriptor,
        &circle_flight(120.0),
        &catalogue,
        None,
        &ValidationParams::default(),
    );
    assert_eq!(diagnostics.global.len(), 2);
    assert_eq!(diagnostics.count(Severity::Warning), 2);
    assert!(diagnostics.segments.iter().all(Vec::is_empty));
}

#[test]
fn test_inconsistent_segment_list() {
    let (flight, catalogue) = flight_with_circle(60.0);
    let mut descriptor = flight.to_descriptor().unwrap();
    // second segment reuses the first id and forgets its sondes
    descriptor["segments"][1]["segment_id"] = json!("HALO-0119_c1");
    descriptor["segments"][1]["dropsondes"] = json!({"GOOD": []});
    descriptor["segments"].as_array_mut().unwrap().push(json!({"segment_id": "HALO-0119_x"}));

    let diagnostics = validate_flight(
        &descriptor,
        &circle_flight(120.0),
        &catalogue,
        Some(&catalogue),
        &ValidationParams::default(),
    );

    assert!(diagnostics.segments[0].is_empty());
    let second: Vec<_> = diagnostics.segments[1].iter().map(|d| d.text.as_str()).collect();
    assert_eq!(
        second,
        vec![
            "segment_id 'HALO-0119_c1' is not unique",
            "dropsondes do not match the sonde catalogue: segment lists {}, catalogue has {GOOD: [D3]}",
            "segment lists 0 GOOD sondes but the catalogue has 1",
        ]
    );
    let third: Vec<_> = diagnostics.segments[2].iter().map(|d| d.text.as_str()).collect();
    assert_eq!(
        third,
        vec![
            "segment has no kinds",
            "segment has no start",
            "segment has no end",
            "segment has no irregularities list",
            "segment has no dropsondes",
        ]
    );
}

#[test]
fn test_missing_segments() {
    let diagnostics = validate_flight(
        &json!({"flight_id": "HALO-0119", "platform": "HALO"}),
        &circle_flight(120.0),
        &SondeCatalogue::default(),
        Some(&SondeCatalogue::default()),
        &ValidationParams::default(),
    );
    assert_eq!(diagnostics.global.len(), 1);
    assert_eq!(diagnostics.global[0].text, "flight has no segments");
}

#[test]
fn test_circle_metrics_and_summary() {
    let (flight, catalogue) = flight_with_circle(60.0);
    let series = circle_flight(120.0);
    let circle = &flight.segments[0];

    let metrics = circle
        .circle_metrics(&series, &catalogue, Some("HALO"), HeadingComparison::Wraparound)
        .unwrap();
    assert!(metrics.heading_delta.abs() < 1e-9);
    assert_eq!(metrics.time_to_first_sonde, Some(60.0));

    let params = ValidationParams::default();
    let summary = SegmentSummary::compute(circle, &series, &catalogue, Some("HALO"), &params).unwrap();
    assert_eq!(summary.samples, ENTRY..EXIT + 1);
    assert_eq!(summary.before, ENTRY - 180..ENTRY + 1);
    assert_eq!(summary.sonde_ids, vec!["D1", "D2"]);
    assert_eq!(summary.sonde_indices, vec![ENTRY + 60, ENTRY + 150]);
}
