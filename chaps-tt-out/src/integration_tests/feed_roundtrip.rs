//! Write feeds, read them back, merge them.
use super::record;
use crate::tables::*;
use crate::{read_table_rows, write_feed, write_table_rows, FeedMerger, TransportCategory};

use std::path::Path;

fn read_feed_table<T: serde::de::DeserializeOwned>(dir: &Path, name: &str) -> Vec<T> {
    read_table_rows(dir, name).unwrap()
}

#[test]
fn write_feed_and_read_back() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let decoded = record(
        "Praha.tt",
        &["Andel", "Brno hl.n.", "Chodov"],
        vec![vec![(0, 480), (1, 485), (2, 492)], vec![(0, 600), (2, 615)]],
    );

    let summary = write_feed(&decoded, TransportCategory::CityTransit, dir.path()).unwrap();
    assert_eq!(summary.stops, 3);
    assert_eq!(summary.trips, 2);
    assert_eq!(summary.stop_times, 5);

    for name in GTFS_FILES.iter() {
        assert!(dir.path().join(name).exists(), "missing {}", name);
    }

    let agencies: Vec<AgencyRow> = read_feed_table(dir.path(), "agency.txt");
    assert_eq!(agencies.len(), 1);
    assert_eq!(agencies[0].agency_id, "MHD_Praha");
    assert_eq!(agencies[0].agency_timezone, "Europe/Prague");

    let stops: Vec<StopRow> = read_feed_table(dir.path(), "stops.txt");
    assert_eq!(stops.len(), 3);
    assert_eq!(stops[0].stop_id, "S1");
    assert_eq!(stops[1].stop_name, "Brno hl.n.");
    assert_eq!(stops[2].lat_or_default(), "0.0");

    let routes: Vec<RouteRow> = read_feed_table(dir.path(), "routes.txt");
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].route_short_name, "Praha");
    assert_eq!(routes[0].route_type, 3);

    let trips: Vec<TripRow> = read_feed_table(dir.path(), "trips.txt");
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].trip_id, "T1");
    assert!(trips.iter().all(|t| t.route_id == "R1" && t.service_id == "SV1"));

    let stop_times: Vec<StopTimeRow> = read_feed_table(dir.path(), "stop_times.txt");
    assert_eq!(stop_times.len(), 5);
    assert_eq!(stop_times[0].arrival_time, "08:00:00");
    assert_eq!(stop_times[0].departure_time, "08:00:00");
    assert_eq!(stop_times[0].stop_id, "S1");
    assert_eq!(stop_times[0].stop_sequence, 1);
    assert_eq!(stop_times[2].stop_id, "S3");
    assert_eq!(stop_times[2].stop_sequence, 3);
    assert_eq!(stop_times[3].trip_id, "T2");
    assert_eq!(stop_times[3].stop_sequence, 1);

    let calendars: Vec<CalendarRow> = read_feed_table(dir.path(), "calendar.txt");
    assert_eq!(calendars.len(), 1);
    assert_eq!(calendars[0].service_id, "SV1");
    assert_eq!(calendars[0].monday, 1);
    assert_eq!(calendars[0].sunday, 1);
}

#[test]
fn rail_feeds_use_rail_route_type() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    let decoded = record(
        "Vlak26.tt",
        &["Praha hl.n.", "Kolin"],
        vec![vec![(0, 300), (1, 350)]],
    );
    write_feed(&decoded, TransportCategory::Rail, dir.path()).unwrap();

    let agencies: Vec<AgencyRow> = read_feed_table(dir.path(), "agency.txt");
    assert_eq!(agencies[0].agency_id, "VL_Vlak26");

    let routes: Vec<RouteRow> = read_feed_table(dir.path(), "routes.txt");
    assert_eq!(routes[0].route_type, 2);
}

#[test]
fn merge_dedups_stops_by_name_and_remaps_ids() {
    let root = tempfile::tempdir().expect("Couldn't get tempfile.");
    let dir_a = root.path().join("a");
    let dir_b = root.path().join("b");

    let feed_a = record(
        "Praha.tt",
        &["Brno hl.n.", "Adamov"],
        vec![vec![(0, 480), (1, 490)]],
    );
    let feed_b = record(
        "Brno.tt",
        &["Brno hl.n.", "Jihlava"],
        vec![vec![(0, 500), (1, 505)]],
    );
    write_feed(&feed_a, TransportCategory::CityTransit, &dir_a).unwrap();
    write_feed(&feed_b, TransportCategory::RegionalBus, &dir_b).unwrap();

    let mut merger = FeedMerger::new();
    merger.add_feed(&dir_a, "MHD/Praha").unwrap();
    merger.add_feed(&dir_b, "BUS/Brno").unwrap();

    // "Brno hl.n." appears in both feeds and is merged into one stop.
    let stops = merger.get_stops();
    assert_eq!(stops.len(), 3);
    assert_eq!(stops[0].stop_id, "ST_1");
    assert_eq!(stops[0].stop_name, "Brno hl.n.");
    assert_eq!(stops[1].stop_name, "Adamov");
    assert_eq!(stops[2].stop_name, "Jihlava");

    assert_eq!(merger.get_agencies().len(), 2);
    assert_eq!(merger.get_agencies()[0].agency_id, "AG_1");
    assert_eq!(merger.get_routes().len(), 2);
    assert_eq!(merger.get_trips().len(), 2);
    assert_eq!(merger.get_trips()[0].trip_id, "TR_1");
    assert_eq!(merger.get_calendars().len(), 2);

    // Feed B's stop times land on the deduplicated stop and the remapped
    // trip.
    let stop_times = merger.get_stop_times();
    assert_eq!(stop_times.len(), 4);
    assert_eq!(stop_times[2].trip_id, "TR_2");
    assert_eq!(stop_times[2].stop_id, "ST_1");
    assert_eq!(stop_times[3].stop_id, "ST_3");

    let merged_dir = root.path().join("merged");
    merger.export(&merged_dir).unwrap();

    let exported: Vec<StopRow> = read_feed_table(&merged_dir, "stops.txt");
    assert_eq!(exported.len(), 3);
    let exported_times: Vec<StopTimeRow> = read_feed_table(&merged_dir, "stop_times.txt");
    assert_eq!(exported_times.len(), 4);
}

#[test]
fn rows_with_unknown_references_are_dropped() {
    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");

    write_table_rows(
        dir.path(),
        "trips.txt",
        &[TripRow {
            route_id: "RX".to_string(),
            service_id: "SX".to_string(),
            trip_id: "TX".to_string(),
        }],
    )
    .unwrap();
    write_table_rows(
        dir.path(),
        "stop_times.txt",
        &[StopTimeRow {
            trip_id: "TX".to_string(),
            arrival_time: "08:00:00".to_string(),
            departure_time: "08:00:00".to_string(),
            stop_id: "SX".to_string(),
            stop_sequence: 1,
        }],
    )
    .unwrap();

    let mut merger = FeedMerger::new();
    merger.add_feed(dir.path(), "broken").unwrap();
    assert!(merger.get_trips().is_empty());
    assert!(merger.get_stop_times().is_empty());
}

#[test]
fn decoded_binary_flows_through_to_a_feed() {
    use chaps_tt_core::text::TimeWord;
    use chaps_tt_in::TtFile;

    // A minimal synthetic container: header, one stop table, one
    // departure section padded with words whose stop index lies beyond
    // the table (the scan accepts them, the trip decoder skips them).
    let mut data = vec![0u8; 0x40];
    data[..18].copy_from_slice(b"TT TimeTable CHAPS");

    let names = [
        "Adamov", "Brno", "Ceska", "Doubravice", "Edrovice", "Frydek", "Golcuv", "Hranice",
        "Ivancice", "Jihlava",
    ];
    let mut blob: Vec<u8> = Vec::new();
    let mut offsets: Vec<u32> = vec![0];
    for name in &names {
        blob.extend_from_slice(name.as_bytes());
        offsets.push(blob.len() as u32);
    }
    let item_count = offsets.len() as u32;
    data.extend_from_slice(&(item_count * 4).to_le_bytes());
    data.extend_from_slice(&item_count.to_le_bytes());
    for off in &offsets {
        data.extend_from_slice(&off.to_le_bytes());
    }
    let blob_size = blob.len() as u32;
    data.extend_from_slice(&blob_size.to_le_bytes());
    data.extend_from_slice(&blob_size.to_le_bytes());
    data.extend_from_slice(&blob);

    data.resize(0x500, 0);
    let mut words: Vec<(u8, u16)> = vec![(0, 480), (1, 485), (2, 492), (3, 500)];
    words.extend((0..26).map(|i| (200 + i as u8, 600 + i as u16)));
    for (stop, minutes) in words {
        data.extend_from_slice(&TimeWord::pack(stop, minutes).to_le_bytes());
    }

    let decoded = TtFile::from_bytes(&data, "Synthetic.tt", Default::default())
        .unwrap()
        .into_record();

    let dir = tempfile::tempdir().expect("Couldn't get tempfile.");
    write_feed(&decoded, TransportCategory::CityTransit, dir.path()).unwrap();

    let stops: Vec<StopRow> = read_feed_table(dir.path(), "stops.txt");
    assert_eq!(stops.len(), 4);
    assert_eq!(stops[0].stop_name, "Adamov");

    let stop_times: Vec<StopTimeRow> = read_feed_table(dir.path(), "stop_times.txt");
    assert_eq!(stop_times.len(), 4);
    assert_eq!(stop_times[0].arrival_time, "08:00:00");
}
